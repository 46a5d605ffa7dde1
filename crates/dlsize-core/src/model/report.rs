/// Scan results: the per-frame accumulator and the final report.
use super::entry::EntryKind;
use super::size;
use chrono::{DateTime, Local};
use compact_str::CompactString;
use serde::Serialize;
use std::ops::AddAssign;
use std::path::PathBuf;

/// Running totals owned by one traversal frame and handed back to its caller.
///
/// `bytes` is the size accumulator proper; the counters only feed the
/// report and logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub bytes: u64,
    /// Non-directory entries counted (files, measured symlinks, other).
    pub files: u64,
    /// Directories descended into, not counting the frame's own directory.
    pub directories: u64,
}

impl Tally {
    /// Record one non-directory entry of `size` bytes.
    #[inline]
    pub fn add_file(&mut self, size: u64) {
        self.bytes = self.bytes.saturating_add(size);
        self.files += 1;
    }

    /// Fold a fully-walked subdirectory into this frame.
    #[inline]
    pub fn add_directory(&mut self, sub: Tally) {
        *self += sub;
        self.directories += 1;
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.bytes = self.bytes.saturating_add(rhs.bytes);
        self.files += rhs.files;
        self.directories += rhs.directories;
    }
}

/// Size of one immediate child of the scan root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildUsage {
    pub name: CompactString,
    pub kind: EntryKind,
    pub bytes: u64,
    /// Files beneath this child (1 for a plain file).
    pub files: u64,
}

/// An entry that failed and was left out of the totals (skip-and-warn mode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything the CLI needs to print about one scan.
#[derive(Debug, Clone, Serialize)]
pub struct DirReport {
    pub root: PathBuf,
    pub total_bytes: u64,
    /// `total_bytes` in megabytes, rounded to two decimals.
    pub total_mb: String,
    pub files: u64,
    pub directories: u64,
    /// Immediate children, largest first.
    pub children: Vec<ChildUsage>,
    pub skipped: Vec<SkippedEntry>,
    pub scanned_at: DateTime<Local>,
    pub duration_ms: u64,
}

impl DirReport {
    /// Assemble a report, sorting `children` by size descending (ties by name).
    pub fn new(
        root: PathBuf,
        tally: Tally,
        mut children: Vec<ChildUsage>,
        skipped: Vec<SkippedEntry>,
        scanned_at: DateTime<Local>,
        duration_ms: u64,
    ) -> Self {
        children.sort_unstable_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.name.cmp(&b.name)));
        Self {
            root,
            total_bytes: tally.bytes,
            total_mb: size::format_megabytes(tally.bytes),
            files: tally.files,
            directories: tally.directories,
            children,
            skipped,
            scanned_at,
            duration_ms,
        }
    }

    /// `true` when nothing was skipped, i.e. the total is complete.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}
