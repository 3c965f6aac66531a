//! # RcuMap
//!
//! A sharded read-copy-update concurrent map for read-heavy workloads.
//!
//! RcuMap splits your data across a fixed number of shards. Each shard keeps
//! an immutable snapshot of its entries behind an atomic pointer. Readers load
//! the pointer and look the key up without taking any lock. Writers take the
//! shard's lock, copy the snapshot, change the copy and publish it with one
//! atomic swap, so a reader sees either the old or the new snapshot in full.
//! Retired snapshots are reclaimed with epoch-based reclamation once no reader
//! can still see them.
//!
//! Writes cost O(shard size) because of the copy. Pick more shards to make
//! writes cheaper and more parallel.
//!
//! ## Example
//!
//! ```rust
//! use rcumap::RcuMap;
//!
//! let map = RcuMap::new();
//!
//! map.set("key1", "value1");
//! map.set("key2", "value2");
//!
//! // Lock-free read, values shared via Arc
//! if let Some(value) = map.get(&"key1") {
//!     println!("Found: {}", *value);
//! }
//!
//! map.delete(&"key2");
//! assert!(map.get(&"key2").is_none());
//!
//! // Exact count vs. the approximate counter
//! assert_eq!(map.len(), 1);
//! assert_eq!(map.size(), 1);
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use rcumap::{RcuMapBuilder, HashFunction};
//!
//! let map = RcuMapBuilder::new()
//!     .shard_count(10)?
//!     .hash_function(HashFunction::AHash)
//!     .seed(42)
//!     .build::<String, i32>()?;
//! # Ok::<(), rcumap::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

/// Configuration and builder types.
pub mod config;
/// Error types.
pub mod error;
mod hash;
/// Iterator implementations.
pub mod iter;
/// Main RcuMap implementation.
pub mod rcumap;
/// Key to shard routing.
pub mod router;
mod shard;
mod snapshot;
/// Statistics and metrics collection.
pub mod stats;

// Re-export main types
pub use config::{Config, HashFunction, RcuMapBuilder};
pub use error::Error;
pub use rcumap::RcuMap;
pub use router::{ModuloRouter, RoutingConfig, ShardRouter};
pub use stats::{Diagnostics, ShardDiagnostics, ShardOps, Stats};
