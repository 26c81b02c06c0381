//! Cache provider configuration.

use serde::{Deserialize, Serialize};

/// Top-level cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache provider type: `"memory"` or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Default TTL for cached entries in seconds.
    #[serde(default = "default_ttl")]
    pub default_ttl_seconds: u64,
    /// Per-namespace TTL tiers.
    #[serde(default)]
    pub ttl: CacheTtlConfig,
    /// Redis-specific cache configuration.
    #[serde(default)]
    pub redis: RedisCacheConfig,
    /// In-memory cache configuration.
    #[serde(default)]
    pub memory: MemoryCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            default_ttl_seconds: default_ttl(),
            ttl: CacheTtlConfig::default(),
            redis: RedisCacheConfig::default(),
            memory: MemoryCacheConfig::default(),
        }
    }
}

/// TTL tiers for the different cached artifact kinds.
///
/// Cursors outlive the pages they anchor: a page cache entry can be
/// rebuilt cheaply from its cursor, while a lost cursor forces the
/// skip/limit fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheTtlConfig {
    /// TTL for single-entity entries in seconds.
    #[serde(default = "default_entity_ttl")]
    pub entity_seconds: u64,
    /// TTL for list/query/options entries in seconds.
    #[serde(default = "default_list_ttl")]
    pub list_seconds: u64,
    /// TTL for materialized page results in seconds.
    #[serde(default = "default_page_ttl")]
    pub page_seconds: u64,
    /// TTL for seek cursors in seconds.
    #[serde(default = "default_cursor_ttl")]
    pub cursor_seconds: u64,
    /// TTL for scalar counts in seconds.
    #[serde(default = "default_count_ttl")]
    pub count_seconds: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            entity_seconds: default_entity_ttl(),
            list_seconds: default_list_ttl(),
            page_seconds: default_page_ttl(),
            cursor_seconds: default_cursor_ttl(),
            count_seconds: default_count_ttl(),
        }
    }
}

/// Redis cache backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisCacheConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Redis connection pool size.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// Key prefix for all Kanri cache keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            pool_size: default_pool_size(),
            key_prefix: default_key_prefix(),
        }
    }
}

/// In-memory cache backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries in the cache.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// TTL for in-memory entries in seconds.
    #[serde(default = "default_memory_ttl")]
    pub time_to_live_seconds: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            time_to_live_seconds: default_memory_ttl(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_ttl() -> u64 {
    300
}

fn default_entity_ttl() -> u64 {
    1800
}

fn default_list_ttl() -> u64 {
    600
}

fn default_page_ttl() -> u64 {
    600
}

fn default_cursor_ttl() -> u64 {
    1800
}

fn default_count_ttl() -> u64 {
    600
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_key_prefix() -> String {
    "kanri:".to_string()
}

fn default_max_capacity() -> u64 {
    10000
}

fn default_memory_ttl() -> u64 {
    300
}
