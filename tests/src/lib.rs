//! # TrustVote Test Suite
//!
//! Unified test crate for flows that span more than one crate.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── ballot_benchmarks.rs   # Cast throughput, shared vs distinct polls
//! └── src/integration/
//!     ├── lifecycle.rs           # Poll status over time, through the engine
//!     └── history_pipeline.rs    # Engine → bus → projector → reporting
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p tv-tests
//!
//! # Benchmarks
//! cargo bench -p tv-tests
//! ```

#![allow(dead_code)]

pub mod integration;
