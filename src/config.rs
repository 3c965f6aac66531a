use crate::error::Error;
use crate::hash::ShardHasher;
use crate::router::{Router, RoutingConfig};

/// Which hash function to use for shard assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashFunction {
    /// Use ahash (default, fast and well-distributed).
    #[default]
    AHash,
    /// Use fxhash (faster but potentially less distributed).
    #[cfg(feature = "fxhash")]
    FxHash,
}

/// Configuration for an RcuMap instance.
#[derive(Debug)]
pub struct Config {
    pub(crate) shard_count: usize,
    pub(crate) hash_function: HashFunction,
    pub(crate) seed: Option<u64>,
    pub(crate) capacity_per_shard: Option<usize>,
    pub(crate) routing: RoutingConfig,
}

impl Config {
    /// Create a new config with defaults (16 shards, ahash, random seed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of shards. Must be greater than 0.
    pub fn shard_count(mut self, count: usize) -> Result<Self, Error> {
        if count == 0 {
            return Err(Error::InvalidShardCount);
        }
        self.shard_count = count;
        Ok(self)
    }

    /// Set the hash function to use.
    pub fn hash_function(mut self, hash_fn: HashFunction) -> Self {
        self.hash_function = hash_fn;
        self
    }

    /// Fix the hash seed instead of drawing a random one.
    ///
    /// Two maps built with the same seed, shard count and hash function
    /// route every key identically.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the initial snapshot capacity per shard.
    pub fn capacity_per_shard(mut self, capacity: usize) -> Self {
        self.capacity_per_shard = Some(capacity);
        self
    }

    pub(crate) fn into_router(self) -> (Router, Option<usize>) {
        let hasher = create_hasher(self.hash_function, self.seed);
        (
            Router::new(hasher, self.routing, self.shard_count),
            self.capacity_per_shard,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: 16,
            hash_function: HashFunction::AHash,
            seed: None,
            capacity_per_shard: None,
            routing: RoutingConfig::Default,
        }
    }
}

/// Builder for creating an RcuMap with custom configuration.
pub struct RcuMapBuilder {
    config: Config,
}

impl RcuMapBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the number of shards. Must be greater than 0.
    pub fn shard_count(mut self, count: usize) -> Result<Self, Error> {
        self.config = self.config.shard_count(count)?;
        Ok(self)
    }

    /// Set the hash function to use.
    pub fn hash_function(mut self, hash_fn: HashFunction) -> Self {
        self.config = self.config.hash_function(hash_fn);
        self
    }

    /// Fix the hash seed for reproducible routing.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config = self.config.seed(seed);
        self
    }

    /// Set the initial snapshot capacity per shard.
    pub fn capacity_per_shard(mut self, capacity: usize) -> Self {
        self.config = self.config.capacity_per_shard(capacity);
        self
    }

    /// Use a custom shard router (e.g. for stateful or custom distribution).
    pub fn routing(mut self, routing: RoutingConfig) -> Self {
        self.config.routing = routing;
        self
    }

    /// Build an RcuMap with the configured settings.
    pub fn build<K, V>(self) -> Result<crate::RcuMap<K, V>, Error>
    where
        K: std::hash::Hash + Eq + Clone + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        crate::RcuMap::with_config(self.config)
    }
}

impl Default for RcuMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a hash function instance based on the configuration.
pub(crate) fn create_hasher(hash_fn: HashFunction, seed: Option<u64>) -> ShardHasher {
    match hash_fn {
        HashFunction::AHash => ShardHasher::ahash(seed),
        #[cfg(feature = "fxhash")]
        HashFunction::FxHash => ShardHasher::fxhash(seed),
    }
}
