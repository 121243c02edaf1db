//! Algorithm-indexed chain walker

use crate::error::{PowError, Result};
use crate::ports::BlockIndexReader;
use shared_types::{BlockIndexNode, NodeKey, PowAlgorithm};

/// Fetch a node, reporting dangling keys.
pub fn lookup<R>(index: &R, key: NodeKey) -> Result<&BlockIndexNode>
where
    R: BlockIndexReader + ?Sized,
{
    index.node(key).ok_or(PowError::UnknownNode(key))
}

/// Nearest ancestor of `from` (inclusive) mined with `algo`.
///
/// Returns `None` when `from` is `None` or the walk passes genesis without a
/// match. The parent chain is finite and acyclic, so the walk terminates.
pub fn last_block_for_algo<R>(
    index: &R,
    from: Option<NodeKey>,
    algo: PowAlgorithm,
) -> Result<Option<(NodeKey, &BlockIndexNode)>>
where
    R: BlockIndexReader + ?Sized,
{
    let mut cursor = from;
    while let Some(key) = cursor {
        let node = lookup(index, key)?;
        if node.algo == algo {
            return Ok(Some((key, node)));
        }
        cursor = index.parent(key);
    }
    Ok(None)
}
