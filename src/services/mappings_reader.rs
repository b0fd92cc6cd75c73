//! 带缓存的租户映射读取器
//!
//! 查询执行器获取映射的唯一入口：
//! - 命中：直接返回缓存中的映射表（`Arc` 共享）
//! - 未命中：调用解析引擎，写入缓存后返回
//!
//! 含单资源解析失败的映射表同样缓存；整体失败（数据库故障、取消、超时）不写缓存。
//! 同一租户的并发未命中可能重复解析，结果相同，后写入者覆盖先写入者。

use super::resolver::MappingResolver;
use crate::data::cache::{BoundedCache, CacheStats};
use crate::data::Result;
use crate::models::TenantMappings;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// 带缓存的映射读取器
#[derive(Clone)]
pub struct MappingsReader {
    resolver: MappingResolver,
    cache: BoundedCache<String, TenantMappings>,
}

impl MappingsReader {
    /// 创建读取器
    ///
    /// - `max_size`: 对应 `cache.mappings.maxSize`
    pub fn new(resolver: MappingResolver, max_size: usize) -> Self {
        Self {
            resolver,
            cache: BoundedCache::new("mappings", max_size),
        }
    }

    /// 获取租户的有效映射表
    pub async fn from_tenant(
        &self,
        tenant: &str,
        cancel: &CancellationToken,
    ) -> Result<Arc<TenantMappings>> {
        let key = tenant.to_string();
        if let Some(table) = self.cache.get(&key) {
            tracing::debug!(tenant = %tenant, "映射表缓存命中");
            return Ok(table);
        }

        tracing::debug!(tenant = %tenant, "映射表缓存未命中，重新解析");
        let table = self.resolver.resolve(tenant, cancel).await?;
        Ok(self.cache.put(key, table))
    }

    /// 缓存统计
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
