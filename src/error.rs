use thiserror::Error;

/// Errors that can occur when configuring an RcuMap.
///
/// Map operations themselves never fail; only construction is fallible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The shard count is invalid (must be greater than 0).
    #[error("shard count must be greater than 0")]
    InvalidShardCount,
}
