//! 查询解析结果缓存
//!
//! 以原始查询文本为键缓存解析器产出的 AST，避免重复解析相同文本。
//! 解析器本身由调用方提供；解析失败不写缓存。

use crate::data::cache::{BoundedCache, CacheStats};
use crate::data::Result;
use std::sync::Arc;

/// 查询解析器能力接口
pub trait QueryParser: Send + Sync {
    /// 解析产出的语法树
    type Ast: Send + Sync;

    /// 解析原始查询文本，失败时返回 `DataError::Parse`
    fn parse(&self, text: &str) -> Result<Self::Ast>;
}

/// 带缓存的解析器
pub struct ParserCache<P: QueryParser> {
    parser: P,
    cache: BoundedCache<String, P::Ast>,
}

impl<P: QueryParser> ParserCache<P> {
    /// - `max_size`: 对应 `cache.parser.maxSize`
    pub fn new(parser: P, max_size: usize) -> Self {
        Self {
            parser,
            cache: BoundedCache::new("parser", max_size),
        }
    }

    /// 获取查询文本的解析结果
    pub fn from_text(&self, text: &str) -> Result<Arc<P::Ast>> {
        let key = text.to_string();
        if let Some(ast) = self.cache.get(&key) {
            return Ok(ast);
        }

        let ast = self.parser.parse(text)?;
        tracing::trace!(length = text.len(), "查询文本已解析并缓存");
        Ok(self.cache.put(key, ast))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
