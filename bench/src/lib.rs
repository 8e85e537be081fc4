//! Benchmark utilities for the entity identity and component storage core.
//!
//! This crate holds the shared fixtures the criterion benches are built on:
//!
//! - **Components**: Representative component types, from zero-sized markers to a 40 byte transform
//! - **Keys**: Seeded key patterns (sequential, shuffled, sparse) for driving sparse storage
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p rusty_ecs_bench
//!
//! # Run specific benchmark group
//! cargo bench -p rusty_ecs_bench -- sparse_erase
//! ```
//!
//! # Benchmark Results
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod components;
pub mod keys;
