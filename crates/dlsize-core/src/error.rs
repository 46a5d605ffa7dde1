/// Errors raised while sizing a directory tree.
///
/// Every variant carries the path that failed so the operator can see
/// exactly where the walk stopped.
use std::io;
use std::path::{Path, PathBuf};

/// Coarse classification of a [`SizeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    Other,
}

#[derive(Debug, thiserror::Error)]
pub enum SizeError {
    #[error("no such file or directory: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// A followed symlink led back to a directory already on the descent chain.
    #[error("symlink cycle detected at {}", path.display())]
    SymlinkCycle { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SizeError {
    /// Wrap an `io::Error` raised while touching `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source: err },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::NotADirectory { .. } | Self::SymlinkCycle { .. } | Self::Io { .. } => {
                ErrorKind::Other
            }
        }
    }

    /// The path the failure was raised on.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::PermissionDenied { path }
            | Self::NotADirectory { path }
            | Self::SymlinkCycle { path }
            | Self::Io { path, .. } => path,
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, SizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_kinds_are_classified() {
        let p = Path::new("/tmp/x");
        let nf = SizeError::from_io(p, io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(nf.kind(), ErrorKind::NotFound);
        assert_eq!(nf.path(), p);

        let pd = SizeError::from_io(p, io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(pd.kind(), ErrorKind::PermissionDenied);

        let other = SizeError::from_io(p, io::Error::other("boom"));
        assert_eq!(other.kind(), ErrorKind::Other);
        assert!(matches!(other, SizeError::Io { .. }));
    }

    #[test]
    fn test_display_includes_path() {
        let err = SizeError::NotFound {
            path: PathBuf::from("downloads/album"),
        };
        assert_eq!(err.to_string(), "no such file or directory: downloads/album");
    }
}
