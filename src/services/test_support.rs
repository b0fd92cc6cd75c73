// 测试用的数据源桩

use crate::data::sources::Database;
use crate::data::{DataError, Result};
use crate::models::{Mapping, SavedQuery};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// 可计数、可注入故障的数据库桩
#[derive(Default)]
pub(crate) struct StubDatabase {
    pub mappings: Mutex<HashMap<String, Vec<Mapping>>>,
    pub queries: Mutex<Vec<SavedQuery>>,
    pub mapping_calls: AtomicUsize,
    pub query_calls: AtomicUsize,
    pub fail: AtomicBool,
    pub delay: Option<Duration>,
}

impl StubDatabase {
    pub fn with_mappings(tenant: &str, mappings: Vec<Mapping>) -> Self {
        let db = Self::default();
        db.mappings
            .lock()
            .unwrap()
            .insert(tenant.to_string(), mappings);
        db
    }

    pub fn with_queries(queries: Vec<SavedQuery>) -> Self {
        let db = Self::default();
        *db.queries.lock().unwrap() = queries;
        db
    }

    pub fn mapping_calls(&self) -> usize {
        self.mapping_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    async fn before_call(&self) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(DataError::SourceUnavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Database for StubDatabase {
    async fn find_mappings_for_tenant(&self, tenant: &str) -> Result<Vec<Mapping>> {
        self.mapping_calls.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;
        Ok(self
            .mappings
            .lock()
            .unwrap()
            .get(tenant)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_query(&self, namespace: &str, name: &str, revision: u32) -> Result<SavedQuery> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;
        self.queries
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.namespace == namespace && q.name == name && q.revision == revision)
            .cloned()
            .ok_or_else(|| DataError::NotFound(format!("{}/{}/{}", namespace, name, revision)))
    }
}

pub(crate) fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
