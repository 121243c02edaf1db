//! # Shared Types Crate
//!
//! This crate contains the block-index entities consumed by the proof-of-work
//! consensus core and produced by the indexing side of the node.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: node, key and algorithm types are defined here.
//! - **Arena Ownership**: the [`BlockIndex`] owns every [`BlockIndexNode`];
//!   readers address nodes through stable [`NodeKey`]s and never hold
//!   references into the arena across a write.
//! - **Append Only**: a node is immutable once inserted and is never removed.

pub mod block_index;
pub mod entities;
pub mod errors;

pub use block_index::{BlockIndex, SharedBlockIndex};
pub use entities::*;
pub use errors::*;
