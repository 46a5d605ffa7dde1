/// State shared by both traversal strategies for the duration of one walk:
/// entry classification, symlink-cycle tracking and the error policy.
use super::{recursive, worklist, ErrorPolicy, ScanOptions, SymlinkPolicy, Traversal};
use crate::error::{Result, SizeError};
use crate::fs::FileSystem;
use crate::model::{EntryKind, EntryStat, SkippedEntry, Tally};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, warn};

/// One link in the chain of canonical directory paths from the root down to
/// the directory being walked. Only built when symlinks are followed.
#[derive(Debug)]
pub struct Ancestor {
    path: PathBuf,
    parent: Chain,
}

pub type Chain = Option<Rc<Ancestor>>;

fn chain_contains(chain: &Chain, path: &Path) -> bool {
    let mut current = chain.as_deref();
    while let Some(ancestor) = current {
        if ancestor.path == path {
            return true;
        }
        current = ancestor.parent.as_deref();
    }
    false
}

/// What a single directory entry turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Descend,
    /// A non-directory entry and the bytes it contributes.
    Leaf(EntryKind, u64),
    /// Contributes nothing (a symlink under [`SymlinkPolicy::Skip`]).
    Ignore,
}

pub struct Walk<'a, F> {
    fs: &'a F,
    options: ScanOptions,
    /// Entries left out under [`ErrorPolicy::SkipAndWarn`].
    pub skipped: Vec<SkippedEntry>,
}

impl<'a, F: FileSystem> Walk<'a, F> {
    pub fn new(fs: &'a F, options: ScanOptions) -> Self {
        Self {
            fs,
            options,
            skipped: Vec::new(),
        }
    }

    /// The chain holding only `root`, canonicalized, when links are followed.
    pub fn root_chain(&self, root: &Path) -> Result<Chain> {
        if self.options.symlinks != SymlinkPolicy::Follow {
            return Ok(None);
        }
        let path = self
            .fs
            .canonicalize(root)
            .map_err(|e| SizeError::from_io(root, e))?;
        Ok(Some(Rc::new(Ancestor { path, parent: None })))
    }

    pub fn list(&self, dir: &Path) -> Result<Vec<OsString>> {
        debug!("Listing {}", dir.display());
        self.fs
            .list_directory(dir)
            .map_err(|e| SizeError::from_io(dir, e))
    }

    /// Metadata for `path`, following links only under [`SymlinkPolicy::Follow`].
    pub fn stat_entry(&self, path: &Path) -> Result<EntryStat> {
        match self.options.symlinks {
            SymlinkPolicy::Follow => self.fs.stat(path),
            SymlinkPolicy::Measure | SymlinkPolicy::Skip => self.fs.symlink_stat(path),
        }
        .map_err(|e| SizeError::from_io(path, e))
    }

    /// Byte length of a single entry; the link itself unless links are followed.
    pub fn size_of_file(&self, path: &Path) -> Result<u64> {
        self.stat_entry(path).map(|stat| stat.size)
    }

    /// One metadata query on `path`. A non-directory's size comes from the
    /// same query [`size_of_file`](Self::size_of_file) makes.
    pub fn classify(&self, path: &Path) -> Result<Step> {
        let policy = self.options.symlinks;
        let stat = self.stat_entry(path)?;

        Ok(match stat.kind {
            EntryKind::Directory => Step::Descend,
            EntryKind::Symlink if policy == SymlinkPolicy::Skip => Step::Ignore,
            kind => Step::Leaf(kind, stat.size),
        })
    }

    /// Extend `chain` with `dir` before descending into it.
    pub fn enter(&self, dir: &Path, chain: &Chain) -> Result<Chain> {
        if self.options.symlinks != SymlinkPolicy::Follow {
            return Ok(None);
        }
        let canonical = self
            .fs
            .canonicalize(dir)
            .map_err(|e| SizeError::from_io(dir, e))?;
        if chain_contains(chain, &canonical) {
            return Err(SizeError::SymlinkCycle {
                path: dir.to_path_buf(),
            });
        }
        Ok(Some(Rc::new(Ancestor {
            path: canonical,
            parent: chain.clone(),
        })))
    }

    /// Sum everything beneath `dir` with the configured traversal.
    /// A failure to list `dir` itself is always returned as an error.
    pub fn descend(&mut self, dir: &Path, chain: &Chain) -> Result<Tally> {
        match self.options.traversal {
            Traversal::Recursive => recursive::sum_tree(self, dir, chain),
            Traversal::WorkList => worklist::sum_tree(self, dir, chain),
        }
    }

    /// Classify `path` and, if it is a directory, size it completely.
    ///
    /// Returns `None` for ignored entries. For a directory the returned tally
    /// covers its contents only; the caller counts the directory itself.
    pub fn child_usage(&mut self, path: &Path, chain: &Chain) -> Result<Option<(EntryKind, Tally)>> {
        match self.classify(path)? {
            Step::Descend => {
                let inner = self.enter(path, chain)?;
                let sub = self.descend(path, &inner)?;
                Ok(Some((EntryKind::Directory, sub)))
            }
            Step::Leaf(kind, size) => {
                let mut tally = Tally::default();
                tally.add_file(size);
                Ok(Some((kind, tally)))
            }
            Step::Ignore => Ok(None),
        }
    }

    /// Apply the error policy to a failed entry: propagate it, or record it
    /// and let the walk continue.
    pub fn skip_or_abort(&mut self, err: SizeError) -> Result<()> {
        match self.options.errors {
            ErrorPolicy::Abort => Err(err),
            ErrorPolicy::SkipAndWarn => {
                warn!("Skipping {}: {err}", err.path().display());
                self.skipped.push(SkippedEntry {
                    path: err.path().to_path_buf(),
                    reason: err.to_string(),
                });
                Ok(())
            }
        }
    }
}
