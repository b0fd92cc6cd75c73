//! 通用 LRU 缓存实现
//!
//! 提供基于 LRU (Least Recently Used) 淘汰策略的缓存，支持：
//! - 容量限制：超过容量自动淘汰最久未使用的项
//! - 淘汰回报：插入时返回被淘汰的键值对，便于统计
//!
//! 本类型本身不做同步，多线程场景请使用 [`super::BoundedCache`]。
//!
//! # 使用示例
//!
//! ```rust
//! use crate::data::cache::LruCache;
//!
//! let mut cache = LruCache::new(100);
//! cache.insert("key", "value");
//! assert_eq!(cache.get(&"key"), Some(&"value"));
//! ```

use linked_hash_map::LinkedHashMap;
use std::hash::Hash;

/// LRU 缓存实现
///
/// 使用 `LinkedHashMap` 维护访问顺序：队首为最久未使用，队尾为最近使用。
///
/// # 泛型参数
///
/// - `K`: 键类型，必须实现 `Eq + Hash`
/// - `V`: 值类型
#[derive(Debug)]
pub struct LruCache<K: Eq + Hash, V> {
    entries: LinkedHashMap<K, V>,
    capacity: usize,
}

impl<K: Eq + Hash, V> LruCache<K, V> {
    /// 创建新的 LRU 缓存
    ///
    /// 容量至少为 1。
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LinkedHashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// 获取缓存值
    ///
    /// 命中时将该项移至最近使用位置。
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.entries.get_refresh(key).map(|value| &*value)
    }

    /// 插入缓存值
    ///
    /// 已存在的键会被无条件替换并移至最近使用位置。
    /// 如果插入新键会超过容量，先淘汰最久未使用的项并将其返回。
    ///
    /// # 示例
    ///
    /// ```rust
    /// let mut cache = LruCache::new(2);
    /// cache.insert("a", 1);
    /// cache.insert("b", 2);
    /// assert_eq!(cache.insert("c", 3), Some(("a", 1)));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.entries.contains_key(&key) {
            self.entries.remove(&key);
            self.entries.insert(key, value);
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };

        self.entries.insert(key, value);
        evicted
    }

    /// 获取当前缓存项数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 检查缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 获取缓存容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_insert_and_get() {
        let mut cache = LruCache::new(10);
        cache.insert("key1", "value1");
        assert_eq!(cache.get(&"key1"), Some(&"value1"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_nonexistent_key() {
        let mut cache = LruCache::<String, i32>::new(10);
        assert_eq!(cache.get(&"missing".to_string()), None);
    }

    #[test]
    fn test_capacity_limit() {
        let mut cache = LruCache::new(3);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);
        assert_eq!(cache.len(), 3);

        // 插入第 4 个元素，应该淘汰最旧的 "a"
        assert_eq!(cache.insert("d", 4), Some(("a", 1)));
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(&2));
        assert_eq!(cache.get(&"c"), Some(&3));
        assert_eq!(cache.get(&"d"), Some(&4));
    }

    #[test]
    fn test_lru_eviction_order() {
        let mut cache = LruCache::new(3);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);

        // 访问 "a"，使其成为最近使用
        cache.get(&"a");

        // 插入 "d"，应该淘汰 "b"（最久未使用）
        assert_eq!(cache.insert("d", 4), Some(("b", 2)));
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"b"), None);
    }

    #[test]
    fn test_replace_existing_key_does_not_evict() {
        let mut cache = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);

        assert_eq!(cache.insert("a", 10), None);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), Some(&10));

        // 替换后 "a" 为最近使用，"b" 先被淘汰
        assert_eq!(cache.insert("c", 3), Some(("b", 2)));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut cache = LruCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"b"), Some(&2));
    }
}
