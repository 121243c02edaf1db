//! # Trinity-Chain Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Criterion benchmark bodies per subsystem
//! │   └── tc_01_proof_of_work.rs
//! │
//! └── integration/      # Cross-crate scenarios
//!     ├── fixtures.rs   # Shared block index builders
//!     ├── retarget_flows.rs
//!     └── chain_selection.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p tc-tests
//!
//! # With retarget logs
//! RUST_LOG=tc_01_proof_of_work=debug cargo test -p tc-tests -- --nocapture
//!
//! # Benchmarks
//! cargo bench -p tc-tests
//! ```
