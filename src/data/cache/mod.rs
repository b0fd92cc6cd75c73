//! 缓存层实现
//!
//! - `lru`: 通用 LRU 缓存（容量限制，非线程安全）
//! - `bounded`: 线程安全的有界缓存（映射表、保存查询、解析结果共用）

pub mod bounded;
pub mod lru;

pub use bounded::{BoundedCache, CacheStats};
pub use lru::LruCache;
