//! # Block Index Arena
//!
//! Append-only arena of [`BlockIndexNode`]s. Every node stores the key of its
//! parent, so walking a chain is a sequence of arena lookups.
//!
//! ## Invariants
//!
//! - INVARIANT-1: a node's parent is already in the arena when it is inserted.
//! - INVARIANT-2: height is parent height + 1 (genesis is height 0).
//! - INVARIANT-3: block hashes are unique.
//! - INVARIANT-4: nodes are never mutated or removed after insertion.

use crate::entities::{BlockIndexNode, Hash, NodeKey, PowAlgorithm};
use crate::errors::IndexError;
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Arena owning all indexed nodes.
#[derive(Debug, Default)]
pub struct BlockIndex {
    nodes: Vec<BlockIndexNode>,
    by_hash: HashMap<Hash, NodeKey>,
}

impl BlockIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully described node.
    pub fn insert(&mut self, node: BlockIndexNode) -> Result<NodeKey, IndexError> {
        let expected_height = match node.parent {
            None if !self.nodes.is_empty() => return Err(IndexError::GenesisExists),
            None => 0,
            Some(parent) => {
                self.get(parent)
                    .ok_or(IndexError::ParentNotFound(parent))?
                    .height
                    + 1
            }
        };
        if node.height != expected_height {
            return Err(IndexError::InvalidHeight {
                expected: expected_height,
                actual: node.height,
            });
        }
        if let Some(&existing) = self.by_hash.get(&node.hash) {
            return Err(IndexError::DuplicateHash { existing });
        }

        let key = NodeKey(u32::try_from(self.nodes.len()).map_err(|_| IndexError::IndexFull)?);
        trace!(
            key = %key,
            height = node.height,
            algo = %node.algo,
            bits = %format_args!("{:08x}", node.bits),
            "indexed block"
        );
        self.by_hash.insert(node.hash, key);
        self.nodes.push(node);
        Ok(key)
    }

    /// Append a block on top of `parent`, deriving its height.
    pub fn append(
        &mut self,
        parent: Option<NodeKey>,
        hash: Hash,
        time: u32,
        bits: u32,
        algo: PowAlgorithm,
    ) -> Result<NodeKey, IndexError> {
        let height = match parent {
            Some(key) => self.get(key).ok_or(IndexError::ParentNotFound(key))?.height + 1,
            None => 0,
        };
        self.insert(BlockIndexNode {
            hash,
            height,
            time,
            bits,
            algo,
            parent,
        })
    }

    /// Look up a node by key.
    pub fn get(&self, key: NodeKey) -> Option<&BlockIndexNode> {
        self.nodes.get(key.index())
    }

    /// Key of the node with this block hash.
    pub fn key_of(&self, hash: &Hash) -> Option<NodeKey> {
        self.by_hash.get(hash).copied()
    }

    /// Parent key of `key`, `None` for genesis or unknown keys.
    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.get(key).and_then(|node| node.parent)
    }

    /// Walk from `key` (inclusive) towards genesis.
    pub fn ancestors(&self, key: NodeKey) -> Ancestors<'_> {
        Ancestors {
            index: self,
            next: self.get(key).map(|_| key),
        }
    }

    /// Ancestor of `key` at `height`, `None` if `height` is above the node.
    pub fn ancestor_at_height(&self, key: NodeKey, height: u64) -> Option<NodeKey> {
        let node = self.get(key)?;
        if height > node.height {
            return None;
        }
        self.ancestors(key)
            .find(|(_, node)| node.height == height)
            .map(|(key, _)| key)
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no genesis has been inserted.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Iterator over a node and its ancestors, newest first.
pub struct Ancestors<'a> {
    index: &'a BlockIndex,
    next: Option<NodeKey>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (NodeKey, &'a BlockIndexNode);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.next?;
        let node = self.index.get(key)?;
        self.next = node.parent;
        Some((key, node))
    }
}

/// Index shared between the appending side and concurrent readers.
///
/// Readers take a read guard for the duration of one consensus call; the
/// writer only ever appends, so a key obtained under one guard stays valid
/// under every later guard.
#[derive(Debug, Clone, Default)]
pub struct SharedBlockIndex {
    inner: Arc<RwLock<BlockIndex>>,
}

impl SharedBlockIndex {
    /// Create an empty shared index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing index.
    pub fn from_index(index: BlockIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Acquire a read guard.
    pub fn read(&self) -> RwLockReadGuard<'_, BlockIndex> {
        self.inner.read()
    }

    /// Insert a node under the write lock.
    pub fn insert(&self, node: BlockIndexNode) -> Result<NodeKey, IndexError> {
        self.inner.write().insert(node)
    }

    /// Append a block under the write lock.
    pub fn append(
        &self,
        parent: Option<NodeKey>,
        hash: Hash,
        time: u32,
        bits: u32,
        algo: PowAlgorithm,
    ) -> Result<NodeKey, IndexError> {
        self.inner.write().append(parent, hash, time, bits, algo)
    }
}
