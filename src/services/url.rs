//! 映射 URL 拆解
//!
//! 将 `schema://host/path` 形式的字符串拆成结构化路由信息：
//! - schema：`://` 之前的部分（必填）
//! - host：第一个 `/` 之前的部分（可带端口，必填）
//! - path：剩余部分原样保留，缺省为 `/`
//! - path params：路径中 `:name` 形式的整段，按出现顺序

use crate::data::{MalformedReason, MalformedUrl};
use crate::models::mapping::extract_path_params;
use crate::models::Mapping;

const SCHEME_SEPARATOR: &str = "://";

/// 拆解单个资源的映射 URL
///
/// # 示例
///
/// ```rust
/// let mapping = decompose("hero", "http://hero.api/heroes/:id")?;
/// assert_eq!(mapping.host(), "hero.api");
/// assert_eq!(mapping.path_params(), ["id"]);
/// ```
pub fn decompose(resource_name: &str, raw_url: &str) -> Result<Mapping, MalformedUrl> {
    let malformed = |reason| MalformedUrl {
        resource: resource_name.to_lowercase(),
        url: raw_url.to_string(),
        reason,
    };

    let (schema, remainder) = raw_url
        .trim()
        .split_once(SCHEME_SEPARATOR)
        .ok_or_else(|| malformed(MalformedReason::MissingScheme))?;

    if schema.is_empty() {
        return Err(malformed(MalformedReason::EmptyScheme));
    }

    let (host, path) = match remainder.find(['/', '?']) {
        Some(idx) if remainder[idx..].starts_with('/') => {
            (&remainder[..idx], remainder[idx..].to_string())
        }
        // 没有路径但带查询串：补上根路径
        Some(idx) => (&remainder[..idx], format!("/{}", &remainder[idx..])),
        None => (remainder, "/".to_string()),
    };

    if host.is_empty() {
        return Err(malformed(MalformedReason::EmptyHost));
    }

    let path_params = extract_path_params(&path);
    Ok(Mapping::new(resource_name, schema, host, path, path_params))
}
