//! Distributed Indexless Search Module
//!
//! Searches a directory tree that was never indexed by fanning the walk out to a
//! fixed pool of stateless worker processes.
//!
//! ## Architecture Overview
//! 1. **Partitioning**: The manager lists the immediate subdirectories of the requested root,
//!    adds the root itself as one more work unit, and deals the units round-robin across workers.
//! 2. **Fan-out**: One task per worker queries that worker for each of its directories in turn.
//!    Workers are queried in parallel; a failed or timed-out call is logged and skipped.
//! 3. **Merge**: All matches are concatenated, sorted by filename (then path), and repeated
//!    paths dropped, since the root unit walks every subdirectory again.
//!
//! Workers match on filenames only and never read file contents.
//!
//! ## Submodules
//! - **`manager`**: Fan-out, merge, and the manager's HTTP handler.
//! - **`partitioner`**: Work-unit enumeration and round-robin assignment.
//! - **`pool`**: Spawns and terminates the worker processes.
//! - **`protocol`**: Endpoint constants and wire DTOs shared by manager and worker.
//! - **`worker`**: Recursive filename search and the worker's HTTP handler.

pub mod manager;
pub mod partitioner;
pub mod pool;
pub mod protocol;
pub mod worker;

#[cfg(test)]
mod tests;
