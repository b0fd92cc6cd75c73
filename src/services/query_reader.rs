// 带缓存的保存查询读取器：按 命名空间 + 名称 + 版本 缓存数据库中的查询文本

use super::deadline::guarded;
use crate::data::cache::{BoundedCache, CacheStats};
use crate::data::sources::Database;
use crate::data::{DataError, Result};
use crate::models::{QueryKey, SavedQuery};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 保存查询读取器
///
/// `NotFound` 与数据库错误都不写缓存；数据库故障统一报告为 `SourceUnavailable`。
#[derive(Clone)]
pub struct QueryReader {
    database: Arc<dyn Database>,
    database_timeout: Duration,
    cache: BoundedCache<QueryKey, SavedQuery>,
}

impl QueryReader {
    /// - `max_size`: 对应 `cache.query.maxSize`
    pub fn new(database: Arc<dyn Database>, database_timeout: Duration, max_size: usize) -> Self {
        Self {
            database,
            database_timeout,
            cache: BoundedCache::new("query", max_size),
        }
    }

    /// 获取保存的查询
    pub async fn from_query(
        &self,
        namespace: &str,
        name: &str,
        revision: u32,
        cancel: &CancellationToken,
    ) -> Result<Arc<SavedQuery>> {
        let key = QueryKey::new(namespace, name, revision);
        if let Some(query) = self.cache.get(&key) {
            tracing::debug!(query = %key, "保存查询缓存命中");
            return Ok(query);
        }

        let query = guarded(
            self.database.find_query(namespace, name, revision),
            cancel,
            self.database_timeout,
            || format!("保存查询 {}", key),
        )
        .await
        .map_err(|e| match e {
            e @ (DataError::NotFound(_)
            | DataError::Cancelled(_)
            | DataError::Timeout { .. }
            | DataError::SourceUnavailable(_)) => e,
            other => DataError::SourceUnavailable(other.to_string()),
        })?;

        tracing::debug!(query = %key, deprecated = query.deprecated, "保存查询已加载");
        Ok(self.cache.put(key, query))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sources::SqliteDatabase;
    use crate::services::test_support::StubDatabase;

    fn saved(name: &str, revision: u32) -> SavedQuery {
        SavedQuery {
            namespace: "heroes".to_string(),
            name: name.to_string(),
            revision,
            text: format!("from hero as {}", name),
            deprecated: false,
        }
    }

    fn reader(db: Arc<StubDatabase>, max_size: usize) -> QueryReader {
        QueryReader::new(db, Duration::from_secs(1), max_size)
    }

    #[tokio::test]
    async fn test_from_query_caches() {
        let db = Arc::new(StubDatabase::with_queries(vec![saved("list", 1)]));
        let reader = reader(db.clone(), 10);
        let cancel = CancellationToken::new();

        let first = reader.from_query("heroes", "list", 1, &cancel).await.unwrap();
        let second = reader.from_query("heroes", "list", 1, &cancel).await.unwrap();

        assert_eq!(*first, saved("list", 1));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(db.query_calls(), 1);
    }

    #[tokio::test]
    async fn test_revisions_are_distinct_keys() {
        let db = Arc::new(StubDatabase::with_queries(vec![saved("list", 1), saved("list", 2)]));
        let reader = reader(db.clone(), 10);
        let cancel = CancellationToken::new();

        let r1 = reader.from_query("heroes", "list", 1, &cancel).await.unwrap();
        let r2 = reader.from_query("heroes", "list", 2, &cancel).await.unwrap();
        assert_eq!(r1.revision, 1);
        assert_eq!(r2.revision, 2);
        assert_eq!(db.query_calls(), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let db = Arc::new(StubDatabase::default());
        let reader = reader(db.clone(), 10);
        let cancel = CancellationToken::new();

        for _ in 0..2 {
            let err = reader
                .from_query("heroes", "missing", 1, &cancel)
                .await
                .unwrap_err();
            assert!(matches!(err, DataError::NotFound(_)));
        }
        assert_eq!(db.query_calls(), 2);
    }

    #[tokio::test]
    async fn test_eviction() {
        let db = Arc::new(StubDatabase::with_queries(vec![
            saved("a", 1),
            saved("b", 1),
            saved("c", 1),
        ]));
        let reader = reader(db.clone(), 2);
        let cancel = CancellationToken::new();

        for name in ["a", "b", "c", "a"] {
            reader.from_query("heroes", name, 1, &cancel).await.unwrap();
        }
        assert_eq!(db.query_calls(), 4);
        assert_eq!(reader.cache_stats().evictions, 2);
    }

    #[tokio::test]
    async fn test_cancelled_call_is_not_cached() {
        let db = Arc::new(StubDatabase::with_queries(vec![saved("list", 1)]));
        let reader = reader(db.clone(), 10);

        let cancelled = CancellationToken::new();
        cancelled.cancel();
        let err = reader
            .from_query("heroes", "list", 1, &cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Cancelled(_)));

        reader
            .from_query("heroes", "list", 1, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(db.query_calls(), 1);
        assert_eq!(reader.cache_stats().hits, 0);
    }

    #[tokio::test]
    async fn test_timeout_is_not_cached() {
        let db = Arc::new(StubDatabase {
            delay: Some(Duration::from_secs(5)),
            ..StubDatabase::with_queries(vec![saved("list", 1)])
        });
        let reader = QueryReader::new(db.clone(), Duration::from_millis(20), 10);
        let cancel = CancellationToken::new();

        for _ in 0..2 {
            let err = reader
                .from_query("heroes", "list", 1, &cancel)
                .await
                .unwrap_err();
            assert!(matches!(err, DataError::Timeout { millis: 20, .. }));
        }
        assert_eq!(db.query_calls(), 2);
        assert_eq!(reader.cache_stats().hits, 0);
    }

    #[tokio::test]
    async fn test_database_error_is_source_unavailable() {
        // 未建表的数据库：查询返回 rusqlite 错误
        let db = Arc::new(SqliteDatabase::in_memory().unwrap());
        let reader = QueryReader::new(db, Duration::from_secs(1), 10);

        let err = reader
            .from_query("heroes", "list", 1, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::SourceUnavailable(_)));
    }
}
