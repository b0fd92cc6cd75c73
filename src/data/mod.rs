//! 数据层
//!
//! 提供映射数据源、有界缓存与统一错误类型。
//!
//! # 模块组织
//!
//! - `error`: 统一错误类型定义
//! - `cache`: 缓存层实现（LRU + 线程安全包装）
//! - `sources`: 映射数据源（环境变量 / 本地配置 / 数据库）

pub mod cache;
pub mod error;
pub mod sources;

pub use error::{DataError, MalformedReason, MalformedUrl, Result};
