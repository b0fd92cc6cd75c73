// lib.rs - restQL 映射解析与缓存

pub mod core; // 核心基础设施层
pub mod data; // 数据源、缓存与错误类型
pub mod models;
pub mod services;

pub use models::*;

pub use data::{DataError, MalformedReason, MalformedUrl, Result};
pub use services::{
    decompose, MappingResolver, MappingsReader, ParserCache, QueryParser, QueryReader, Restql,
};

pub use self::core::{init_logger, update_log_level};
