//! Outbound ports (driven side - SPI)

use shared_types::{BlockIndexNode, NodeKey};

/// Port: read-only access to the block index
///
/// Implementations must only hand out nodes that are already committed;
/// a node returned once must never change afterwards.
pub trait BlockIndexReader {
    /// Node stored under `key`
    fn node(&self, key: NodeKey) -> Option<&BlockIndexNode>;

    /// Parent of `key`, `None` for genesis or unknown keys
    fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.node(key).and_then(|node| node.parent)
    }
}
