/// Filesystem abstraction consumed by the aggregator.
///
/// The aggregator only ever asks four questions of the outside world —
/// stat (following links or not), list a directory, and canonicalize — so
/// they are collected here behind one trait. [`OsFileSystem`] answers them
/// from the real disk; [`MemoryFileSystem`] from an in-memory tree.
pub mod memory;
pub mod os;

pub use memory::{ListingOrder, MemoryFileSystem};
pub use os::OsFileSystem;

use crate::model::EntryStat;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

pub trait FileSystem {
    /// Metadata for `path`, following symbolic links.
    fn stat(&self, path: &Path) -> io::Result<EntryStat>;

    /// Metadata for `path` itself; a symlink reports [`EntryKind::Symlink`](crate::model::EntryKind::Symlink).
    fn symlink_stat(&self, path: &Path) -> io::Result<EntryStat>;

    /// Names of the immediate entries of the directory at `path`.
    ///
    /// The returned vector is an owned snapshot; later changes to the
    /// directory are not reflected in it.
    fn list_directory(&self, path: &Path) -> io::Result<Vec<OsString>>;

    /// Absolute path with every symlink resolved.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn stat(&self, path: &Path) -> io::Result<EntryStat> {
        (**self).stat(path)
    }

    fn symlink_stat(&self, path: &Path) -> io::Result<EntryStat> {
        (**self).symlink_stat(path)
    }

    fn list_directory(&self, path: &Path) -> io::Result<Vec<OsString>> {
        (**self).list_directory(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        (**self).canonicalize(path)
    }
}
