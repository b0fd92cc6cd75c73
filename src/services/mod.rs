//! 服务层
//!
//! - `url`: 映射 URL 拆解
//! - `resolver`: 三数据源合并的映射解析引擎
//! - `mappings_reader` / `query_reader` / `parser_cache`: 带缓存的读取器
//! - `restql`: 按配置组装的统一入口

mod deadline;
pub mod mappings_reader;
pub mod parser_cache;
pub mod query_reader;
pub mod resolver;
pub mod restql;
pub mod url;

#[cfg(test)]
pub(crate) mod test_support;

pub use mappings_reader::MappingsReader;
pub use parser_cache::{ParserCache, QueryParser};
pub use query_reader::QueryReader;
pub use resolver::MappingResolver;
pub use restql::Restql;
pub use self::url::decompose;
