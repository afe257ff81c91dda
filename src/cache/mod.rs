//! 缓存层
//!
//! 对象缓存以字符串形式存储 JSON 序列化后的值，具体实现见 `object_cache`。

pub mod object_cache;

use async_trait::async_trait;

pub use object_cache::moka::MokaCacheWrapper;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    /// 读取原始字符串
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// 写入原始字符串，ttl 为 0 表示使用默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
}
