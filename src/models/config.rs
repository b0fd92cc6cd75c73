// 进程级配置结构：启动时加载一次，显式传入解析引擎与缓存

use crate::data::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::DEFAULT_TENANT;

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// 日志输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
    Both,
}

/// 日志配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// 日志目录（文件输出时使用，缺省为 ~/.restql/logs）
    #[serde(rename = "filePath", alias = "file_path")]
    pub file_path: Option<String>,
}

fn default_max_size() -> usize {
    100
}

/// 单个缓存实例的容量配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSizeConfig {
    #[serde(rename = "maxSize", alias = "max_size", default = "default_max_size")]
    pub max_size: usize,
}

impl Default for CacheSizeConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
        }
    }
}

/// 三个有界缓存实例的容量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// `cache.mappings.maxSize`：租户映射表缓存
    pub mappings: CacheSizeConfig,
    /// `cache.query.maxSize`：保存查询缓存
    pub query: CacheSizeConfig,
    /// `cache.parser.maxSize`：解析结果缓存
    pub parser: CacheSizeConfig,
}

fn default_database_timeout() -> u64 {
    1000
}

/// 数据库数据源配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite 文件路径，缺省表示不启用数据库数据源
    pub path: Option<PathBuf>,
    /// 单次数据库调用超时（毫秒）
    #[serde(rename = "timeout", default = "default_database_timeout")]
    pub timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            timeout_ms: default_database_timeout(),
        }
    }
}

impl DatabaseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_tenant() -> String {
    DEFAULT_TENANT.to_string()
}

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 未指定租户时使用的租户标识
    #[serde(default = "default_tenant")]
    pub tenant: String,
    pub cache: CacheConfig,
    pub database: DatabaseConfig,
    pub logging: LogConfig,
    /// 本地映射表：资源名 -> URL
    pub mappings: HashMap<String, String>,
    /// 可选的 .env 文件，其中的映射变量位于进程环境变量之下
    #[serde(rename = "envFile", alias = "env_file")]
    pub env_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tenant: default_tenant(),
            cache: CacheConfig::default(),
            database: DatabaseConfig::default(),
            logging: LogConfig::default(),
            mappings: HashMap::new(),
            env_file: None,
        }
    }
}

impl AppConfig {
    /// 从 TOML 文本解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DataError::io(path.to_path_buf(), e))?;
        Self::from_toml_str(&content)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("cache.mappings.maxSize", self.cache.mappings.max_size),
            ("cache.query.maxSize", self.cache.query.max_size),
            ("cache.parser.maxSize", self.cache.parser.max_size),
        ];
        for (key, size) in sizes {
            if size == 0 {
                return Err(DataError::Config(format!("{} 必须大于 0", key)));
            }
        }

        if self.database.timeout_ms == 0 {
            return Err(DataError::Config("database.timeout 必须大于 0".to_string()));
        }

        if self.tenant.trim().is_empty() {
            return Err(DataError::Config("tenant 不能为空".to_string()));
        }

        Ok(())
    }
}
