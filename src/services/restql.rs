//! 映射与查询缓存的统一入口
//!
//! 由启动时加载的 `AppConfig` 一次性组装三个读取器：
//! - `from_tenant`: 租户映射表
//! - `from_query`: 保存查询
//! - `from_text`: 解析结果
//!
//! # 使用示例
//!
//! ```rust
//! let config = AppConfig::load(Path::new("restql.toml"))?;
//! let restql = Restql::from_config(&config, parser)?;
//! let mappings = restql.from_tenant("default", &CancellationToken::new()).await?;
//! ```

use super::mappings_reader::MappingsReader;
use super::parser_cache::{ParserCache, QueryParser};
use super::query_reader::QueryReader;
use super::resolver::MappingResolver;
use crate::data::sources::{
    Database, EnvSource, EnvironmentSource, LocalSource, NoDatabase, SqliteDatabase,
};
use crate::data::Result;
use crate::models::{AppConfig, SavedQuery, TenantMappings};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// 统一入口
pub struct Restql<P: QueryParser> {
    mappings: MappingsReader,
    queries: QueryReader,
    parser: ParserCache<P>,
}

impl<P: QueryParser> Restql<P> {
    /// 使用显式提供的数据源组装
    pub fn new(
        config: &AppConfig,
        env: Arc<dyn EnvironmentSource>,
        database: Arc<dyn Database>,
        parser: P,
    ) -> Self {
        let timeout = config.database.timeout();
        let resolver = MappingResolver::new(
            env,
            LocalSource::new(config.mappings.clone()),
            Arc::clone(&database),
            timeout,
        );

        Self {
            mappings: MappingsReader::new(resolver, config.cache.mappings.max_size),
            queries: QueryReader::new(database, timeout, config.cache.query.max_size),
            parser: ParserCache::new(parser, config.cache.parser.max_size),
        }
    }

    /// 按配置打开数据源后组装
    ///
    /// - 配置了 `database.path` 时使用 SQLite，否则不启用数据库数据源
    /// - 配置了 `envFile` 时以该文件补充进程环境变量
    pub fn from_config(config: &AppConfig, parser: P) -> Result<Self> {
        config.validate()?;

        let env = match &config.env_file {
            Some(path) => EnvSource::from_file(path)?,
            None => EnvSource::new(),
        };

        let database: Arc<dyn Database> = match &config.database.path {
            Some(path) => {
                let db = SqliteDatabase::open(path)?;
                db.init_schema()?;
                tracing::info!(path = %path.display(), "已启用 SQLite 映射数据源");
                Arc::new(db)
            }
            None => {
                tracing::info!("未配置数据库，仅使用本地与环境变量映射");
                Arc::new(NoDatabase)
            }
        };

        Ok(Self::new(config, Arc::new(env), database, parser))
    }

    /// 租户映射表
    pub async fn from_tenant(
        &self,
        tenant: &str,
        cancel: &CancellationToken,
    ) -> Result<Arc<TenantMappings>> {
        self.mappings.from_tenant(tenant, cancel).await
    }

    /// 保存查询
    pub async fn from_query(
        &self,
        namespace: &str,
        name: &str,
        revision: u32,
        cancel: &CancellationToken,
    ) -> Result<Arc<SavedQuery>> {
        self.queries
            .from_query(namespace, name, revision, cancel)
            .await
    }

    /// 查询文本解析结果
    pub fn from_text(&self, text: &str) -> Result<Arc<P::Ast>> {
        self.parser.from_text(text)
    }

    pub fn mappings(&self) -> &MappingsReader {
        &self.mappings
    }

    pub fn queries(&self) -> &QueryReader {
        &self.queries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataError;
    use crate::models::{Mapping, DEFAULT_TENANT};
    use serial_test::serial;
    use tempfile::TempDir;

    struct EchoParser;

    impl QueryParser for EchoParser {
        type Ast = String;

        fn parse(&self, text: &str) -> Result<Self::Ast> {
            Ok(text.to_uppercase())
        }
    }

    fn config_with_db(dir: &TempDir) -> AppConfig {
        let mut config = AppConfig::default();
        config.database.path = Some(dir.path().join("restql.db"));
        config
            .mappings
            .insert("hero".to_string(), "http://hero.api/".to_string());
        config
            .mappings
            .insert("villain".to_string(), "http://villain.api/".to_string());
        config
    }

    #[tokio::test]
    #[serial]
    async fn test_from_config_with_sqlite() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_with_db(&temp_dir);

        // 预先写入数据库记录
        let db = SqliteDatabase::open(config.database.path.as_ref().unwrap()).unwrap();
        db.init_schema().unwrap();
        db.insert_mapping(
            DEFAULT_TENANT,
            &Mapping::new("villain", "https", "villain.com", "/v2", vec![]),
        )
        .unwrap();
        db.insert_query(&SavedQuery {
            namespace: "heroes".to_string(),
            name: "list".to_string(),
            revision: 1,
            text: "from hero".to_string(),
            deprecated: false,
        })
        .unwrap();

        let restql = Restql::from_config(&config, EchoParser).unwrap();
        let cancel = CancellationToken::new();

        let table = restql.from_tenant(DEFAULT_TENANT, &cancel).await.unwrap();
        assert_eq!(table.get("hero").unwrap().host(), "hero.api");
        assert_eq!(table.get("villain").unwrap().host(), "villain.com");

        let query = restql.from_query("heroes", "list", 1, &cancel).await.unwrap();
        assert_eq!(query.text, "from hero");

        let ast = restql.from_text(&query.text).unwrap();
        assert_eq!(*ast, "FROM HERO");
    }

    #[tokio::test]
    #[serial]
    async fn test_from_config_without_database() {
        let temp_dir = TempDir::new().unwrap();
        let env_file = temp_dir.path().join(".env");
        std::fs::write(&env_file, "RESTQL_MAPPING_SIDEKICK=http://sidekick.api/\n").unwrap();

        let mut config = AppConfig::default();
        config.env_file = Some(env_file);

        let restql = Restql::from_config(&config, EchoParser).unwrap();
        let cancel = CancellationToken::new();

        let table = restql.from_tenant(DEFAULT_TENANT, &cancel).await.unwrap();
        assert_eq!(table.get("sidekick").unwrap().host(), "sidekick.api");

        let err = restql
            .from_query("heroes", "list", 1, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.cache.mappings.max_size = 0;
        assert!(matches!(
            Restql::from_config(&config, EchoParser),
            Err(DataError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_capacities_follow_config() {
        let mut config = AppConfig::default();
        config.cache.mappings.max_size = 1;
        let restql = Restql::new(
            &config,
            Arc::new(std::collections::HashMap::<String, String>::new()),
            Arc::new(NoDatabase),
            EchoParser,
        );
        let cancel = CancellationToken::new();

        restql.from_tenant("a", &cancel).await.unwrap();
        restql.from_tenant("b", &cancel).await.unwrap();
        assert_eq!(restql.mappings().cache_stats().evictions, 1);
        assert_eq!(restql.queries().cache_stats().evictions, 0);
    }
}
