/// dlsize Core — directory size aggregation and reporting.
///
/// This crate contains all business logic with zero CLI dependencies.
/// The binary in the workspace root only parses arguments and renders output.
///
/// # Modules
///
/// - [`fs`] — Filesystem abstraction: the real OS backend and an in-memory tree.
/// - [`model`] — Entry metadata, scan reports, and size formatting.
/// - [`scanner`] — The recursive / work-list directory size aggregator.
/// - [`error`] — Error type shared by every fallible operation.
pub mod error;
pub mod fs;
pub mod model;
pub mod scanner;

pub use error::{ErrorKind, SizeError};
pub use scanner::{Aggregator, ErrorPolicy, ScanOptions, SymlinkPolicy, Traversal};
