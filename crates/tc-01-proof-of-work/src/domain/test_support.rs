//! Hand-built block index for domain tests
//!
//! Unlike the arena in `shared-types`, the first node may sit at any height,
//! which lets tests reach far-away rule boundaries with a handful of nodes.

use crate::ports::BlockIndexReader;
use shared_types::{BlockIndexNode, Hash, NodeKey, PowAlgorithm};

/// Timestamp of the first node.
pub(crate) const START_TIME: u32 = 1_400_000_000;

#[derive(Debug, Default)]
pub(crate) struct MockIndex {
    nodes: Vec<BlockIndexNode>,
}

impl BlockIndexReader for MockIndex {
    fn node(&self, key: NodeKey) -> Option<&BlockIndexNode> {
        self.nodes.get(key.index())
    }
}

/// Appends a single linear chain.
pub(crate) struct ChainBuilder {
    index: MockIndex,
    bits: u32,
    spacing: u32,
    start_height: u64,
}

impl ChainBuilder {
    pub(crate) fn new(bits: u32) -> Self {
        Self::starting_at(0, bits)
    }

    pub(crate) fn starting_at(height: u64, bits: u32) -> Self {
        Self {
            index: MockIndex::default(),
            bits,
            spacing: 90,
            start_height: height,
        }
    }

    pub(crate) fn spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub(crate) fn set_bits(&mut self, bits: u32) {
        self.bits = bits;
    }

    pub(crate) fn index(&self) -> &MockIndex {
        &self.index
    }

    pub(crate) fn tip(&self) -> Option<NodeKey> {
        self.index.nodes.len().checked_sub(1).map(|i| NodeKey(i as u32))
    }

    pub(crate) fn tip_node(&self) -> &BlockIndexNode {
        self.index.nodes.last().expect("chain has a tip")
    }

    pub(crate) fn push(&mut self, algo: PowAlgorithm) -> NodeKey {
        let time = self
            .index
            .nodes
            .last()
            .map_or(START_TIME, |node| node.time + self.spacing);
        self.push_at(algo, time)
    }

    pub(crate) fn push_at(&mut self, algo: PowAlgorithm, time: u32) -> NodeKey {
        let parent = self.tip();
        let height = self
            .index
            .nodes
            .last()
            .map_or(self.start_height, |node| node.height + 1);
        let n = self.index.nodes.len() as u32;
        let mut hash: Hash = [0u8; 32];
        hash[..4].copy_from_slice(&n.to_le_bytes());
        self.index.nodes.push(BlockIndexNode {
            hash,
            height,
            time,
            bits: self.bits,
            algo,
            parent,
        });
        NodeKey(n)
    }

    pub(crate) fn push_n(&mut self, algo: PowAlgorithm, count: usize) -> NodeKey {
        for _ in 1..count {
            self.push(algo);
        }
        self.push(algo)
    }

    pub(crate) fn push_all(&mut self, algos: &[PowAlgorithm]) -> NodeKey {
        let mut tip = None;
        for &algo in algos {
            tip = Some(self.push(algo));
        }
        tip.expect("no algorithms given")
    }
}
