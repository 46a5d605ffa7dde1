/// Scanner module — the directory size aggregator.
///
/// Provides two interchangeable traversal strategies:
/// - **Recursive:** ordinary function recursion, one frame per directory.
/// - **Work-list:** an explicit stack of pending directories, for trees deep
///   enough to threaten the call stack.
///
/// Both are strictly sequential: each directory is listed, and each entry
/// classified and summed, before the next sibling is touched. Every frame
/// owns its own [`Tally`]; nothing is shared or cached between calls.
mod recursive;
mod walk;
mod worklist;

use crate::error::{Result, SizeError};
use crate::fs::FileSystem;
use crate::model::{ChildUsage, DirReport, EntryKind, Tally};
use chrono::Local;
use compact_str::CompactString;
use std::path::Path;
use std::time::Instant;
use tracing::info;
use walk::Walk;

/// How the tree is descended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    #[default]
    Recursive,
    WorkList,
}

/// What to do with symbolic links found while walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymlinkPolicy {
    /// Count the link's own size; never descend through it.
    #[default]
    Measure,
    /// Ignore links entirely.
    Skip,
    /// Size whatever the link points at, descending into linked directories.
    /// Revisiting a directory already on the current descent chain fails with
    /// [`SizeError::SymlinkCycle`].
    Follow,
}

/// What to do when a single entry cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the whole aggregation on the first failure.
    #[default]
    Abort,
    /// Log the failure, leave the entry out of the total, and carry on.
    /// The root directory itself must still be readable.
    SkipAndWarn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    pub traversal: Traversal,
    pub symlinks: SymlinkPolicy,
    pub errors: ErrorPolicy,
}

/// Sums file sizes beneath a directory using a [`FileSystem`] backend.
#[derive(Debug, Clone)]
pub struct Aggregator<F> {
    fs: F,
    options: ScanOptions,
}

impl<F: FileSystem> Aggregator<F> {
    /// An aggregator with default options: recursive, symlinks measured,
    /// all-or-nothing failures.
    pub fn new(fs: F) -> Self {
        Self::with_options(fs, ScanOptions::default())
    }

    pub fn with_options(fs: F, options: ScanOptions) -> Self {
        Self { fs, options }
    }

    /// Byte length of the entry at `path`, per the symlink policy
    /// (the link itself unless links are followed).
    pub fn size_of_file(&self, path: &Path) -> Result<u64> {
        Walk::new(&self.fs, self.options).size_of_file(path)
    }

    /// Total bytes of every file reachable beneath the directory at `path`.
    pub fn size_of_directory(&self, path: &Path) -> Result<u64> {
        self.tally_directory(path).map(|t| t.bytes)
    }

    /// Like [`size_of_directory`](Self::size_of_directory) but also returns
    /// file and directory counts.
    pub fn tally_directory(&self, path: &Path) -> Result<Tally> {
        let mut walk = Walk::new(&self.fs, self.options);
        let chain = walk.root_chain(path)?;
        walk.descend(path, &chain)
    }

    /// Size `root` and report a per-child breakdown alongside the total.
    ///
    /// Fails with [`SizeError::NotADirectory`] if `root` is not a directory.
    /// `report.total_bytes` equals [`size_of_directory`](Self::size_of_directory)
    /// for the same snapshot.
    pub fn scan(&self, root: &Path) -> Result<DirReport> {
        let start = Instant::now();
        let scanned_at = Local::now();

        let root_stat = self
            .fs
            .stat(root)
            .map_err(|e| SizeError::from_io(root, e))?;
        if !root_stat.is_dir() {
            return Err(SizeError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        info!("Scanning {}", root.display());

        let mut walk = Walk::new(&self.fs, self.options);
        let chain = walk.root_chain(root)?;

        let mut tally = Tally::default();
        let mut children = Vec::new();
        for name in walk.list(root)? {
            let path = root.join(&name);
            match walk.child_usage(&path, &chain) {
                Ok(Some((kind, sub))) => {
                    children.push(ChildUsage {
                        name: CompactString::new(name.to_string_lossy()),
                        kind,
                        bytes: sub.bytes,
                        files: sub.files,
                    });
                    if kind == EntryKind::Directory {
                        tally.add_directory(sub);
                    } else {
                        tally += sub;
                    }
                }
                Ok(None) => {}
                Err(err) => walk.skip_or_abort(err)?,
            }
        }

        let duration = start.elapsed();
        info!(
            "Scan complete: {} files, {} dirs, {} bytes in {:?} ({} skipped)",
            crate::model::size::format_count(tally.files),
            crate::model::size::format_count(tally.directories),
            tally.bytes,
            duration,
            walk.skipped.len()
        );

        Ok(DirReport::new(
            root.to_path_buf(),
            tally,
            children,
            walk.skipped,
            scanned_at,
            duration.as_millis() as u64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::fs::{ListingOrder, MemoryFileSystem};

    const BOTH: [Traversal; 2] = [Traversal::Recursive, Traversal::WorkList];

    fn aggregator(fs: &MemoryFileSystem, traversal: Traversal) -> Aggregator<&MemoryFileSystem> {
        Aggregator::with_options(
            fs,
            ScanOptions {
                traversal,
                ..ScanOptions::default()
            },
        )
    }

    #[test]
    fn test_empty_directory_is_zero() {
        let fs = MemoryFileSystem::new();
        fs.add_dir("/downloads");
        for t in BOTH {
            assert_eq!(aggregator(&fs, t).size_of_directory(Path::new("/downloads")).unwrap(), 0);
        }
    }

    #[test]
    fn test_flat_directory_sums_files() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/d/a", 100).add_file("/d/b", 250).add_file("/d/c", 0);
        for t in BOTH {
            assert_eq!(aggregator(&fs, t).size_of_directory(Path::new("/d")).unwrap(), 350);
        }
    }

    #[test]
    fn test_recursion_composes_with_siblings() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/d/sub/inner.bin", 500).add_file("/d/top.bin", 10);
        for t in BOTH {
            let tally = aggregator(&fs, t).tally_directory(Path::new("/d")).unwrap();
            assert_eq!(tally.bytes, 510);
            assert_eq!(tally.files, 2);
            assert_eq!(tally.directories, 1);
        }
    }

    #[test]
    fn test_size_of_file() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/d/song.mp3", 4_096);
        let agg = Aggregator::new(&fs);
        assert_eq!(agg.size_of_file(Path::new("/d/song.mp3")).unwrap(), 4_096);
        let err = agg.size_of_file(Path::new("/d/missing.mp3")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_size_of_file_respects_symlink_policy() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/music/a.mp3", 1_000)
            .add_symlink("/d/fav.mp3", "/music/a.mp3");
        let with = |symlinks| {
            Aggregator::with_options(
                &fs,
                ScanOptions {
                    symlinks,
                    ..ScanOptions::default()
                },
            )
        };
        let link = Path::new("/d/fav.mp3");
        assert_eq!(with(SymlinkPolicy::Measure).size_of_file(link).unwrap(), 12);
        assert_eq!(with(SymlinkPolicy::Skip).size_of_file(link).unwrap(), 12);
        assert_eq!(with(SymlinkPolicy::Follow).size_of_file(link).unwrap(), 1_000);
    }

    #[test]
    fn test_listing_order_does_not_matter() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/d/a", 1)
            .add_file("/d/b/x", 20)
            .add_file("/d/b/y", 300)
            .add_file("/d/c/d/e", 4_000)
            .add_file("/d/f", 50_000);

        let expected = 54_321;
        let mut orders = vec![ListingOrder::Ascending, ListingOrder::Descending];
        orders.extend((0..5).map(ListingOrder::Rotated));
        for order in orders {
            fs.set_listing_order(order);
            for t in BOTH {
                assert_eq!(
                    aggregator(&fs, t).size_of_directory(Path::new("/d")).unwrap(),
                    expected,
                    "order {order:?}, traversal {t:?}"
                );
            }
        }
    }

    #[test]
    fn test_repeated_calls_agree() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/d/x/1", 7).add_file("/d/2", 11);
        let agg = Aggregator::new(&fs);
        let first = agg.size_of_directory(Path::new("/d")).unwrap();
        let second = agg.size_of_directory(Path::new("/d")).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, 18);
    }

    #[test]
    fn test_directory_vanishing_mid_walk_is_not_found() {
        for t in BOTH {
            let fs = MemoryFileSystem::new();
            fs.add_file("/d/album/track.mp3", 500).add_file("/d/top.bin", 10);
            fs.remove_after_listing("/d", "/d/album");

            let err = aggregator(&fs, t)
                .size_of_directory(Path::new("/d"))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound, "traversal {t:?}");
            assert_eq!(err.path(), Path::new("/d/album"));
        }
    }

    #[test]
    fn test_unreadable_subdirectory_aborts() {
        for t in BOTH {
            let fs = MemoryFileSystem::new();
            fs.add_file("/d/locked/x", 5).add_file("/d/ok", 1);
            fs.deny("/d/locked");
            let err = aggregator(&fs, t)
                .size_of_directory(Path::new("/d"))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        }
    }

    #[test]
    fn test_skip_and_warn_returns_partial_sum() {
        for traversal in BOTH {
            let fs = MemoryFileSystem::new();
            fs.add_file("/d/locked/x", 5)
                .add_file("/d/open/deep/y", 7)
                .add_file("/d/open/secret.bin", 100)
                .add_file("/d/ok", 1);
            fs.deny("/d/locked");
            fs.deny("/d/open/secret.bin");

            let agg = Aggregator::with_options(
                &fs,
                ScanOptions {
                    traversal,
                    errors: ErrorPolicy::SkipAndWarn,
                    ..ScanOptions::default()
                },
            );
            let report = agg.scan(Path::new("/d")).unwrap();
            assert_eq!(report.total_bytes, 8);
            assert_eq!(report.files, 2);
            assert_eq!(report.directories, 2, "open and open/deep");
            assert!(!report.is_complete());

            let mut skipped: Vec<_> = report.skipped.iter().map(|s| s.path.clone()).collect();
            skipped.sort();
            assert_eq!(
                skipped,
                [
                    Path::new("/d/locked").to_path_buf(),
                    Path::new("/d/open/secret.bin").to_path_buf()
                ]
            );
        }
    }

    #[test]
    fn test_unreadable_grandchild_directory() {
        for traversal in BOTH {
            let fs = MemoryFileSystem::new();
            fs.add_file("/d/open/locked/x", 5)
                .add_file("/d/open/y", 7)
                .add_file("/d/ok", 1);
            fs.deny("/d/open/locked");

            let strict = aggregator(&fs, traversal)
                .size_of_directory(Path::new("/d"))
                .unwrap_err();
            assert_eq!(strict.kind(), ErrorKind::PermissionDenied, "traversal {traversal:?}");
            assert_eq!(strict.path(), Path::new("/d/open/locked"));

            let lenient = ScanOptions {
                traversal,
                errors: ErrorPolicy::SkipAndWarn,
                ..ScanOptions::default()
            };
            let agg = Aggregator::with_options(&fs, lenient);
            let tally = agg.tally_directory(Path::new("/d")).unwrap();
            assert_eq!(tally.bytes, 8);
            assert_eq!(tally.files, 2);
            assert_eq!(tally.directories, 1, "locked is not counted");

            let report = agg.scan(Path::new("/d")).unwrap();
            assert_eq!(report.total_bytes, 8);
            assert_eq!(report.directories, 1);
            assert_eq!(report.skipped.len(), 1);
            assert_eq!(report.skipped[0].path, Path::new("/d/open/locked"));
        }
    }

    #[test]
    fn test_unreadable_root_always_aborts() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/d/x", 1);
        fs.deny("/d");
        let agg = Aggregator::with_options(
            &fs,
            ScanOptions {
                errors: ErrorPolicy::SkipAndWarn,
                ..ScanOptions::default()
            },
        );
        assert_eq!(
            agg.scan(Path::new("/d")).unwrap_err().kind(),
            ErrorKind::PermissionDenied
        );
        assert!(agg.size_of_directory(Path::new("/d")).is_err());
    }

    #[test]
    fn test_scan_rejects_files_and_missing_roots() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/song.mp3", 10);
        let agg = Aggregator::new(&fs);
        assert!(matches!(
            agg.scan(Path::new("/song.mp3")),
            Err(SizeError::NotADirectory { .. })
        ));
        assert_eq!(
            agg.scan(Path::new("/downloads")).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_scan_breakdown_matches_total() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/d/album/1.mp3", 3_000)
            .add_file("/d/album/2.mp3", 4_000)
            .add_file("/d/single.mp3", 2_500)
            .add_dir("/d/empty");

        for t in BOTH {
            let agg = aggregator(&fs, t);
            let report = agg.scan(Path::new("/d")).unwrap();
            assert_eq!(report.total_bytes, agg.size_of_directory(Path::new("/d")).unwrap());
            assert_eq!(report.total_bytes, 9_500);
            assert_eq!(report.files, 3);
            assert_eq!(report.directories, 2);

            let rows: Vec<(&str, EntryKind, u64)> = report
                .children
                .iter()
                .map(|c| (c.name.as_str(), c.kind, c.bytes))
                .collect();
            assert_eq!(
                rows,
                [
                    ("album", EntryKind::Directory, 7_000),
                    ("single.mp3", EntryKind::File, 2_500),
                    ("empty", EntryKind::Directory, 0),
                ]
            );
        }
    }

    fn linked_tree() -> MemoryFileSystem {
        let fs = MemoryFileSystem::new();
        fs.add_file("/music/a.mp3", 1_000)
            .add_file("/d/own.mp3", 10)
            .add_symlink("/d/music", "/music")
            .add_symlink("/d/fav.mp3", "/music/a.mp3");
        fs
    }

    #[test]
    fn test_symlinks_measured_by_default() {
        let fs = linked_tree();
        let agg = Aggregator::new(&fs);
        // Link sizes are the length of their target strings.
        let expected = 10 + "/music".len() as u64 + "/music/a.mp3".len() as u64;
        assert_eq!(agg.size_of_directory(Path::new("/d")).unwrap(), expected);
    }

    #[test]
    fn test_symlinks_skipped() {
        let fs = linked_tree();
        let agg = Aggregator::with_options(
            &fs,
            ScanOptions {
                symlinks: SymlinkPolicy::Skip,
                ..ScanOptions::default()
            },
        );
        assert_eq!(agg.size_of_directory(Path::new("/d")).unwrap(), 10);
    }

    #[test]
    fn test_symlinks_followed() {
        let fs = linked_tree();
        for traversal in BOTH {
            let agg = Aggregator::with_options(
                &fs,
                ScanOptions {
                    traversal,
                    symlinks: SymlinkPolicy::Follow,
                    ..ScanOptions::default()
                },
            );
            assert_eq!(agg.size_of_directory(Path::new("/d")).unwrap(), 2_010);
        }
    }

    #[test]
    fn test_followed_cycle_is_detected() {
        for traversal in BOTH {
            let fs = MemoryFileSystem::new();
            fs.add_file("/d/sub/x", 3).add_symlink("/d/sub/back", "/d");

            let options = ScanOptions {
                traversal,
                symlinks: SymlinkPolicy::Follow,
                ..ScanOptions::default()
            };
            let err = Aggregator::with_options(&fs, options)
                .size_of_directory(Path::new("/d"))
                .unwrap_err();
            assert!(matches!(err, SizeError::SymlinkCycle { .. }), "{err}");
            assert_eq!(err.path(), Path::new("/d/sub/back"));

            let lenient = ScanOptions {
                errors: ErrorPolicy::SkipAndWarn,
                ..options
            };
            let report = Aggregator::with_options(&fs, lenient)
                .scan(Path::new("/d"))
                .unwrap();
            assert_eq!(report.total_bytes, 3);
            assert_eq!(report.skipped.len(), 1);
        }
    }
}
