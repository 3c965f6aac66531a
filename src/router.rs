use crate::hash::ShardHasher;
use std::hash::Hash;

/// User-provided shard selection. Enables stateful or custom routing.
pub trait ShardRouter: Send + Sync {
    /// Return the shard index in `[0, shard_count)` for the given key hash.
    fn route(&self, key_hash: u64, shard_count: usize) -> usize;
}

/// Default routing: `hash % shard_count`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuloRouter;

impl ShardRouter for ModuloRouter {
    #[inline]
    fn route(&self, key_hash: u64, shard_count: usize) -> usize {
        (key_hash % shard_count as u64) as usize
    }
}

/// Routing strategy for shard selection.
#[derive(Default)]
pub enum RoutingConfig {
    /// Default: hash % shard_count.
    #[default]
    Default,
    /// User-provided router (e.g. stateful or custom distribution).
    Custom(Box<dyn ShardRouter>),
}

impl std::fmt::Debug for RoutingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingConfig::Default => write!(f, "RoutingConfig::Default"),
            RoutingConfig::Custom(_) => write!(f, "RoutingConfig::Custom(...)"),
        }
    }
}

/// Maps keys to shard indices. Pure and fixed for the lifetime of a map.
pub(crate) struct Router {
    hasher: ShardHasher,
    routing: RoutingConfig,
    shard_count: usize,
}

impl Router {
    pub fn new(hasher: ShardHasher, routing: RoutingConfig, shard_count: usize) -> Self {
        debug_assert!(shard_count > 0);
        Self {
            hasher,
            routing,
            shard_count,
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shard_count
    }

    /// Figure out which shard this key belongs to.
    ///
    /// Indices returned by a custom router are wrapped into range.
    #[inline]
    pub fn shard_index<K: Hash + ?Sized>(&self, key: &K) -> usize {
        let hash = self.hasher.hash_key(key);
        match &self.routing {
            RoutingConfig::Default => ModuloRouter.route(hash, self.shard_count),
            RoutingConfig::Custom(router) => {
                router.route(hash, self.shard_count) % self.shard_count
            }
        }
    }
}
