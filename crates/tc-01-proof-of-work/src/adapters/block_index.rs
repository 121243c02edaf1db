//! Block index adapter
//!
//! Binds the arena from `shared-types` to the [`BlockIndexReader`] port.
//! For a [`shared_types::SharedBlockIndex`], hold one read guard for the
//! duration of a consensus call and pass `&*guard`.

use crate::ports::BlockIndexReader;
use shared_types::{BlockIndex, BlockIndexNode, NodeKey};

impl BlockIndexReader for BlockIndex {
    fn node(&self, key: NodeKey) -> Option<&BlockIndexNode> {
        self.get(key)
    }

    fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        BlockIndex::parent(self, key)
    }
}
