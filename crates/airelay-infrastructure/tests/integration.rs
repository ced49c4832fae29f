//! Integration test suite for airelay-infrastructure
//!
//! Run with: `cargo test -p airelay-infrastructure --test integration`

mod engine;
