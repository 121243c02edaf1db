//! Adapters binding the ports to concrete collaborators

pub mod block_index;
