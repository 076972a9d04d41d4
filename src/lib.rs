//! Local File Search Engine Library
//!
//! This library crate holds everything the `file-search` binary (`main.rs`) wires together.
//!
//! ## Architecture Modules
//! - **`query`**: Splits a prompt into `name:value` qualifiers and leftover free text.
//! - **`search`**: The dispatcher that routes parsed prompts to store strategies with AND
//!   semantics, the strategy registry, and the expiring result cache in front of both.
//! - **`store`**: The Search Store contract, an in-memory implementation, and the indexer
//!   that fills it from disk.
//! - **`distributed`**: Indexless search. A manager partitions a directory tree across a
//!   fixed pool of worker processes that walk the filesystem directly.
//! - **`context`**: The shared state of the index-backed service, built once at startup.
//! - **`config`**: Command-line and environment configuration for each role.
//! - **`error`**: Named error kinds surfaced at the dispatcher and manager boundaries.
//! - **`shutdown`**: The Ctrl+C / SIGTERM future every server role shuts down on.

pub mod config;
pub mod context;
pub mod distributed;
pub mod error;
pub mod query;
pub mod search;
pub mod shutdown;
pub mod store;
