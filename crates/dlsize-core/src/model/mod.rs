/// Data model for dlsize.
///
/// Re-exports entry metadata, the scan report, and supporting types.
pub mod entry;
pub mod report;
pub mod size;

pub use entry::{EntryKind, EntryStat};
pub use report::{ChildUsage, DirReport, SkippedEntry, Tally};
