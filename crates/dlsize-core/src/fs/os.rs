/// The real filesystem, via `std::fs`.
use super::FileSystem;
use crate::model::EntryStat;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn stat(&self, path: &Path) -> io::Result<EntryStat> {
        std::fs::metadata(path).map(|meta| EntryStat::from(&meta))
    }

    fn symlink_stat(&self, path: &Path) -> io::Result<EntryStat> {
        std::fs::symlink_metadata(path).map(|meta| EntryStat::from(&meta))
    }

    fn list_directory(&self, path: &Path) -> io::Result<Vec<OsString>> {
        std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}
