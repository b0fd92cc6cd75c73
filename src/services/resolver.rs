//! 映射解析引擎
//!
//! 按资源名合并三个数据源，得到租户的有效映射表。优先级（后者覆盖前者）：
//!
//! 1. 本地映射表（拆解 URL）
//! 2. 数据库记录（已结构化，原样写入）
//! 3. 环境变量 `RESTQL_MAPPING_<NAME>`（拆解 URL）
//!
//! 三个数据源全部读取完成后才开始合并。单个资源的 URL 格式错误只记录在该资源上，
//! 数据库故障、取消或超时则使整个解析失败。

use super::deadline::guarded;
use super::url::decompose;
use crate::data::sources::{mapping_resource_name, Database, EnvironmentSource, LocalSource};
use crate::data::{DataError, Result};
use crate::models::{Mapping, TenantMappings};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 映射解析引擎
///
/// 不持有可变状态，同一租户的并发解析互不影响。
#[derive(Clone)]
pub struct MappingResolver {
    env: Arc<dyn EnvironmentSource>,
    local: LocalSource,
    database: Arc<dyn Database>,
    database_timeout: Duration,
}

impl MappingResolver {
    pub fn new(
        env: Arc<dyn EnvironmentSource>,
        local: LocalSource,
        database: Arc<dyn Database>,
        database_timeout: Duration,
    ) -> Self {
        Self {
            env,
            local,
            database,
            database_timeout,
        }
    }

    /// 解析租户映射表
    ///
    /// # 错误
    ///
    /// - `SourceUnavailable`: 数据库调用失败
    /// - `Cancelled` / `Timeout`: 数据库调用被取消或超时
    pub async fn resolve(&self, tenant: &str, cancel: &CancellationToken) -> Result<TenantMappings> {
        let records = guarded(
            self.database.find_mappings_for_tenant(tenant),
            cancel,
            self.database_timeout,
            || format!("租户 '{}' 的映射", tenant),
        )
        .await
        .map_err(|e| match e {
            e @ (DataError::Cancelled(_)
            | DataError::Timeout { .. }
            | DataError::SourceUnavailable(_)) => e,
            other => DataError::SourceUnavailable(other.to_string()),
        })?;

        let env_vars = self.env.get_all();
        let table = merge(tenant, self.local.entries(), records, &env_vars);

        tracing::debug!(
            tenant = %tenant,
            resources = table.len(),
            failures = table.failures().len(),
            "租户映射解析完成"
        );

        Ok(table)
    }
}

/// 按优先级合并：本地 < 数据库 < 环境变量
fn merge(
    tenant: &str,
    local: &HashMap<String, String>,
    records: Vec<Mapping>,
    env_vars: &HashMap<String, String>,
) -> TenantMappings {
    let mut table = TenantMappings::new(tenant);

    for (name, url) in local {
        apply_url(&mut table, name, url);
    }

    tracing::trace!(tenant = %tenant, count = records.len(), "应用数据库映射");
    for mapping in records {
        table.insert(mapping);
    }

    // 多个变量映射到同一资源时，全大写的规范写法最后写入，其余按变量名排序
    let mut overrides: Vec<(&str, String, &str)> = env_vars
        .iter()
        .filter_map(|(key, url)| {
            mapping_resource_name(key).map(|name| (key.as_str(), name, url.as_str()))
        })
        .collect();
    overrides.sort_by_key(|(key, _, _)| (is_canonical_env_key(key), *key));

    for (_, name, url) in overrides {
        apply_url(&mut table, &name, url);
    }

    table
}

fn is_canonical_env_key(key: &str) -> bool {
    key == key.to_uppercase()
}

fn apply_url(table: &mut TenantMappings, name: &str, url: &str) {
    match decompose(name, url) {
        Ok(mapping) => table.insert(mapping),
        Err(failure) => table.record_failure(failure),
    }
}
