//! Command-line arguments and the configuration derived from them.

use clap::{ArgAction, Parser, ValueEnum};
use dlsize_core::{ErrorPolicy, ScanOptions, SymlinkPolicy, Traversal};
use std::path::PathBuf;

/// Root used when neither the argument nor `DLSIZE_ROOT` is given.
pub const DEFAULT_ROOT: &str = "downloads";

#[derive(Debug, Parser)]
#[clap(
    name = "dlsize",
    about = "Report the total size of a downloads folder.",
    version
)]
pub struct Cli {
    /// Directory to measure
    #[clap(env = "DLSIZE_ROOT", default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Output format
    #[clap(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// List each immediate child before the total (text format only)
    #[clap(long)]
    pub breakdown: bool,

    /// How the tree is descended
    #[clap(long, value_enum, default_value_t = TraversalArg::Recursive)]
    pub traversal: TraversalArg,

    /// What to do with symbolic links
    #[clap(long, value_enum, default_value_t = SymlinkArg::Measure)]
    pub symlinks: SymlinkArg,

    /// Leave unreadable entries out of the total instead of failing
    #[clap(long)]
    pub skip_errors: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[clap(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraversalArg {
    Recursive,
    WorkList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SymlinkArg {
    Measure,
    Skip,
    Follow,
}

/// Everything `main` needs, resolved from the command line and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub root: PathBuf,
    pub format: Format,
    pub breakdown: bool,
    pub options: ScanOptions,
    pub log_level: tracing::Level,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let traversal = match cli.traversal {
            TraversalArg::Recursive => Traversal::Recursive,
            TraversalArg::WorkList => Traversal::WorkList,
        };
        let symlinks = match cli.symlinks {
            SymlinkArg::Measure => SymlinkPolicy::Measure,
            SymlinkArg::Skip => SymlinkPolicy::Skip,
            SymlinkArg::Follow => SymlinkPolicy::Follow,
        };
        let errors = if cli.skip_errors {
            ErrorPolicy::SkipAndWarn
        } else {
            ErrorPolicy::Abort
        };
        let log_level = if cli.quiet {
            tracing::Level::ERROR
        } else {
            match cli.verbose {
                0 => tracing::Level::WARN,
                1 => tracing::Level::INFO,
                2 => tracing::Level::DEBUG,
                _ => tracing::Level::TRACE,
            }
        };

        Self {
            root: cli.root,
            format: cli.format,
            breakdown: cli.breakdown,
            options: ScanOptions {
                traversal,
                symlinks,
                errors,
            },
            log_level,
        }
    }
}
