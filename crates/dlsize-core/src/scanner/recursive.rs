/// Recursive traversal: one stack frame per directory.
///
/// Each frame lists its directory once, sizes every entry in listing order
/// and hands its [`Tally`] back to the caller. Depth is bounded only by the
/// call stack; see [`worklist`](super::worklist) for trees that may exceed it.
use super::walk::{Chain, Walk};
use crate::error::Result;
use crate::fs::FileSystem;
use crate::model::{EntryKind, Tally};
use std::path::Path;

pub(crate) fn sum_tree<F: FileSystem>(ctx: &mut Walk<'_, F>, dir: &Path, chain: &Chain) -> Result<Tally> {
    let mut tally = Tally::default();
    for name in ctx.list(dir)? {
        let path = dir.join(&name);
        match ctx.child_usage(&path, chain) {
            Ok(Some((EntryKind::Directory, sub))) => tally.add_directory(sub),
            Ok(Some((_, leaf))) => tally += leaf,
            Ok(None) => {}
            Err(err) => ctx.skip_or_abort(err)?,
        }
    }
    Ok(tally)
}
