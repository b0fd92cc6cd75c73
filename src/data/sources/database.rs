//! 数据库数据源
//!
//! 按租户提供已结构化的映射记录，并存储命名空间下的保存查询：
//! - `Database`: 解析引擎与查询读取器消费的能力接口
//! - `NoDatabase`: 未配置数据库时使用，不贡献任何记录
//! - `SqliteDatabase`: SQLite 实现（单连接 + Arc<Mutex>，阻塞调用放入 `spawn_blocking`）
//!
//! 重试与超时之外的连接策略属于本模块，解析引擎不做重试。
//!
//! # 使用示例
//!
//! ```rust
//! use std::path::Path;
//! use crate::data::sources::{Database, SqliteDatabase};
//!
//! let db = SqliteDatabase::open(Path::new("restql.db"))?;
//! db.init_schema()?;
//! let mappings = db.find_mappings_for_tenant("default").await?;
//! ```

use crate::data::{DataError, Result};
use crate::models::{Mapping, SavedQuery};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// 数据库能力接口
#[async_trait]
pub trait Database: Send + Sync {
    /// 查询租户的映射记录，可能为空
    async fn find_mappings_for_tenant(&self, tenant: &str) -> Result<Vec<Mapping>>;

    /// 查询保存的查询，不存在时返回 `NotFound`
    async fn find_query(&self, namespace: &str, name: &str, revision: u32) -> Result<SavedQuery>;
}

/// 空数据库：未配置数据库时使用
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDatabase;

#[async_trait]
impl Database for NoDatabase {
    async fn find_mappings_for_tenant(&self, _tenant: &str) -> Result<Vec<Mapping>> {
        Ok(Vec::new())
    }

    async fn find_query(&self, namespace: &str, name: &str, revision: u32) -> Result<SavedQuery> {
        Err(DataError::NotFound(format!(
            "保存查询 {}/{}/{}（未配置数据库）",
            namespace, name, revision
        )))
    }
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tenant_mappings (
    tenant        TEXT NOT NULL,
    resource_name TEXT NOT NULL,
    schema        TEXT NOT NULL,
    host          TEXT NOT NULL,
    path          TEXT NOT NULL,
    path_params   TEXT NOT NULL DEFAULT '[]',
    PRIMARY KEY (tenant, resource_name)
);
CREATE TABLE IF NOT EXISTS saved_queries (
    namespace  TEXT NOT NULL,
    name       TEXT NOT NULL,
    revision   INTEGER NOT NULL,
    text       TEXT NOT NULL,
    deprecated INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (namespace, name, revision)
);
";

/// 映射表原始行
type MappingRow = (String, String, String, String, String);

/// SQLite 数据库数据源
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    /// 数据库连接
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDatabase {
    /// 打开数据库文件，自动创建父目录
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DataError::io(parent.to_path_buf(), e))?;
            }
        }

        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 打开内存数据库（用于测试）
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 创建映射表和保存查询表
    pub fn init_schema(&self) -> Result<()> {
        self.with_conn(|conn| Ok(conn.execute_batch(SCHEMA)?))
    }

    /// 写入（或覆盖）租户映射
    pub fn insert_mapping(&self, tenant: &str, mapping: &Mapping) -> Result<()> {
        let path_params = serde_json::to_string(mapping.path_params())?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO tenant_mappings
                    (tenant, resource_name, schema, host, path, path_params)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    tenant,
                    mapping.resource_name(),
                    mapping.schema(),
                    mapping.host(),
                    mapping.path(),
                    path_params
                ],
            )?;
            Ok(())
        })
    }

    /// 写入（或覆盖）保存查询
    pub fn insert_query(&self, query: &SavedQuery) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO saved_queries (namespace, name, revision, text, deprecated)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    query.namespace,
                    query.name,
                    query.revision,
                    query.text,
                    query.deprecated
                ],
            )?;
            Ok(())
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DataError::Concurrency(e.to_string()))?;
        f(&conn)
    }

    fn query_mappings(&self, tenant: &str) -> Result<Vec<Mapping>> {
        let rows: Vec<MappingRow> = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT resource_name, schema, host, path, path_params
                 FROM tenant_mappings WHERE tenant = ?1 ORDER BY resource_name",
            )?;
            let rows = stmt
                .query_map([tenant], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        rows.into_iter()
            .map(|(resource_name, schema, host, path, path_params)| {
                let path_params: Vec<String> = serde_json::from_str(&path_params)?;
                Ok(Mapping::new(resource_name, schema, host, path, path_params))
            })
            .collect()
    }

    fn query_saved(&self, namespace: &str, name: &str, revision: u32) -> Result<SavedQuery> {
        let found = self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT text, deprecated FROM saved_queries
                     WHERE namespace = ?1 AND name = ?2 AND revision = ?3",
                    params![namespace, name, revision],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?)),
                )
                .optional()?)
        })?;

        match found {
            Some((text, deprecated)) => Ok(SavedQuery {
                namespace: namespace.to_string(),
                name: name.to_string(),
                revision,
                text,
                deprecated,
            }),
            None => Err(DataError::NotFound(format!(
                "保存查询 {}/{}/{}",
                namespace, name, revision
            ))),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn find_mappings_for_tenant(&self, tenant: &str) -> Result<Vec<Mapping>> {
        let db = self.clone();
        let tenant = tenant.to_string();
        tokio::task::spawn_blocking(move || db.query_mappings(&tenant))
            .await
            .map_err(|e| DataError::Concurrency(e.to_string()))?
    }

    async fn find_query(&self, namespace: &str, name: &str, revision: u32) -> Result<SavedQuery> {
        let db = self.clone();
        let (namespace, name) = (namespace.to_string(), name.to_string());
        tokio::task::spawn_blocking(move || db.query_saved(&namespace, &name, revision))
            .await
            .map_err(|e| DataError::Concurrency(e.to_string()))?
    }
}
