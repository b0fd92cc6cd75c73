//! 统一错误类型定义
//!
//! 使用 `thiserror` 定义映射解析与缓存模块的所有错误类型。
//! 单个资源的 URL 解析失败使用可克隆的 [`MalformedUrl`]，以便保存在缓存的映射表中。

use std::path::PathBuf;
use thiserror::Error;

/// URL 无法拆解的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// 缺少 `://` 分隔符
    MissingScheme,
    /// schema 为空
    EmptyScheme,
    /// host 为空
    EmptyHost,
    /// 拼接后的完整 URL 无法解析
    Unparseable,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::MissingScheme => write!(f, "缺少 schema 分隔符 '://'"),
            MalformedReason::EmptyScheme => write!(f, "schema 为空"),
            MalformedReason::EmptyHost => write!(f, "host 为空"),
            MalformedReason::Unparseable => write!(f, "无法解析为合法 URL"),
        }
    }
}

/// 单个资源的映射 URL 格式错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("资源 '{resource}' 的映射 URL 无效: {url} ({reason})")]
pub struct MalformedUrl {
    pub resource: String,
    pub url: String,
    pub reason: MalformedReason,
}

/// 映射解析与缓存模块的统一错误类型
#[derive(Error, Debug)]
pub enum DataError {
    /// 映射 URL 无法拆解（仅影响单个资源）
    #[error(transparent)]
    MalformedMappingUrl(#[from] MalformedUrl),

    /// 数据库数据源不可用（整个租户解析失败）
    #[error("数据源不可用: {0}")]
    SourceUnavailable(String),

    /// 资源未找到
    #[error("未找到资源: {0}")]
    NotFound(String),

    /// 调用方取消了请求
    #[error("请求已取消: {0}")]
    Cancelled(String),

    /// 数据库调用超时
    #[error("数据库查询超时: {target} ({millis}ms)")]
    Timeout { target: String, millis: u64 },

    /// 数据库错误
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    /// 文件 I/O 错误
    #[error("文件 I/O 错误: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置无效
    #[error("配置无效: {0}")]
    Config(String),

    /// JSON 序列化/反序列化错误
    #[error("JSON 序列化错误: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// TOML 反序列化错误
    #[error("TOML 反序列化错误: {0}")]
    TomlDeserialization(#[from] toml::de::Error),

    /// 查询文本解析失败
    #[error("查询解析失败: {0}")]
    Parse(String),

    /// 构建请求路径时缺少路径参数
    #[error("资源 '{resource}' 缺少路径参数: {param}")]
    MissingPathParam { resource: String, param: String },

    /// 并发错误
    #[error("并发错误: {0}")]
    Concurrency(String),
}

/// 便于与现有代码集成的类型别名
pub type Result<T> = std::result::Result<T, DataError>;

impl DataError {
    /// 从 `std::io::Error` 和路径创建 I/O 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
