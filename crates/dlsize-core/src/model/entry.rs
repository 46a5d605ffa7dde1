/// Metadata returned by a [`FileSystem`](crate::fs::FileSystem) query.
use serde::Serialize;

/// Classification of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    /// FIFOs, sockets, devices — anything that is none of the above.
    Other,
}

impl EntryKind {
    /// Short label used in text and CSV output.
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Other => "other",
        }
    }
}

/// Size and kind of a single path, as of one metadata query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStat {
    /// Logical length in bytes.
    pub size: u64,
    pub kind: EntryKind,
}

impl EntryStat {
    pub fn file(size: u64) -> Self {
        Self {
            size,
            kind: EntryKind::File,
        }
    }

    pub fn directory() -> Self {
        Self {
            size: 0,
            kind: EntryKind::Directory,
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

impl From<std::fs::FileType> for EntryKind {
    fn from(ft: std::fs::FileType) -> Self {
        if ft.is_dir() {
            Self::Directory
        } else if ft.is_file() {
            Self::File
        } else if ft.is_symlink() {
            Self::Symlink
        } else {
            Self::Other
        }
    }
}

impl From<&std::fs::Metadata> for EntryStat {
    fn from(meta: &std::fs::Metadata) -> Self {
        Self {
            size: meta.len(),
            kind: meta.file_type().into(),
        }
    }
}
