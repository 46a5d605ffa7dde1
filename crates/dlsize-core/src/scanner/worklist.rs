/// Work-list traversal: an explicit stack of pending directories.
///
/// Produces the same totals as [`recursive`](super::recursive) but keeps
/// pending directories on the heap, so arbitrarily deep trees cannot
/// exhaust the call stack. Since the sum is order-independent, one
/// accumulator covers the whole subtree.
use super::walk::{Chain, Step, Walk};
use crate::error::Result;
use crate::fs::FileSystem;
use crate::model::Tally;
use std::path::{Path, PathBuf};

struct Pending {
    path: PathBuf,
    chain: Chain,
    /// The directory the walk started from; failing to list it is fatal.
    is_start: bool,
}

pub(crate) fn sum_tree<F: FileSystem>(ctx: &mut Walk<'_, F>, dir: &Path, chain: &Chain) -> Result<Tally> {
    let mut tally = Tally::default();
    let mut stack = vec![Pending {
        path: dir.to_path_buf(),
        chain: chain.clone(),
        is_start: true,
    }];

    while let Some(current) = stack.pop() {
        let names = match ctx.list(&current.path) {
            Ok(names) => names,
            Err(err) if current.is_start => return Err(err),
            Err(err) => {
                ctx.skip_or_abort(err)?;
                continue;
            }
        };
        if !current.is_start {
            tally.directories += 1;
        }

        for name in names {
            let path = current.path.join(&name);
            if let Err(err) = visit(ctx, &mut tally, &mut stack, path, &current.chain) {
                ctx.skip_or_abort(err)?;
            }
        }
    }

    Ok(tally)
}

/// Classify one entry: sum it now, or queue it for listing.
fn visit<F: FileSystem>(
    ctx: &Walk<'_, F>,
    tally: &mut Tally,
    stack: &mut Vec<Pending>,
    path: PathBuf,
    chain: &Chain,
) -> Result<()> {
    match ctx.classify(&path)? {
        Step::Descend => {
            let chain = ctx.enter(&path, chain)?;
            stack.push(Pending {
                path,
                chain,
                is_start: false,
            });
        }
        Step::Leaf(_, size) => tally.add_file(size),
        Step::Ignore => {}
    }
    Ok(())
}
