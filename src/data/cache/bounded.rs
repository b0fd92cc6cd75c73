//! 线程安全的有界缓存
//!
//! 在 [`LruCache`] 外包一层 `Arc<Mutex<_>>`，供映射表、保存查询、解析结果三处复用：
//! - 值以 `Arc<V>` 形式存取，命中时只克隆指针
//! - 锁只覆盖 LRU 结构本身的读写，值的计算始终在锁外完成
//! - 同一键的并发未命中可能重复计算，后写入者覆盖先写入者
//!
//! # 使用示例
//!
//! ```rust
//! use crate::data::cache::BoundedCache;
//!
//! let cache = BoundedCache::new("mappings", 100);
//! cache.put("default".to_string(), 42);
//! assert_eq!(cache.get(&"default".to_string()).as_deref(), Some(&42));
//! ```

use super::LruCache;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// 缓存命中统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

/// 有界缓存
///
/// `Clone` 得到的是同一份存储的共享句柄。
#[derive(Debug)]
pub struct BoundedCache<K: Eq + Hash, V> {
    name: &'static str,
    inner: Arc<Mutex<LruCache<K, Arc<V>>>>,
    counters: Arc<Counters>,
}

impl<K: Eq + Hash, V> Clone for BoundedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: Arc::clone(&self.inner),
            counters: Arc::clone(&self.counters),
        }
    }
}

impl<K: Eq + Hash, V> BoundedCache<K, V> {
    /// 创建有界缓存
    ///
    /// - `name`: 缓存实例名（用于日志）
    /// - `max_size`: 最大条目数
    pub fn new(name: &'static str, max_size: usize) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(LruCache::new(max_size))),
            counters: Arc::new(Counters::default()),
        }
    }

    // 持锁期间只做 LinkedHashMap 操作，不会留下半更新的结构，中毒后直接继续使用
    fn lock(&self) -> MutexGuard<'_, LruCache<K, Arc<V>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 获取缓存值，命中时刷新 LRU 位置
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let found = self.lock().get(key).cloned();
        match found {
            Some(value) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(cache = self.name, "缓存命中");
                Some(value)
            }
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(cache = self.name, "缓存未命中");
                None
            }
        }
    }

    /// 无条件插入或替换，返回共享的值
    pub fn put(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.put_arc(key, Arc::clone(&value));
        value
    }

    /// 插入已共享的值
    pub fn put_arc(&self, key: K, value: Arc<V>) {
        let evicted = self.lock().insert(key, value);
        if evicted.is_some() {
            self.counters.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(cache = self.name, "缓存已满，淘汰最久未使用的条目");
        }
    }

    /// 当前条目数
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 最大条目数
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// 命中统计快照
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }
}
