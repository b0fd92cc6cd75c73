//! 环境变量数据源
//!
//! 提供进程环境变量（以及可选的 .env 文件）的只读快照：
//! - 仅 `RESTQL_MAPPING_<NAME>` 形式的键会被映射解析引擎使用
//! - .env 文件中的值位于真实进程环境变量之下
//! - .env 文件忽略注释和空行，支持 `export` 前缀与成对引号
//!
//! # 使用示例
//!
//! ```rust
//! use std::path::Path;
//! use crate::data::sources::{EnvSource, EnvironmentSource};
//!
//! let source = EnvSource::from_file(Path::new(".env"))?;
//! let vars = source.get_all();
//! ```

use crate::data::{DataError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// 映射覆盖变量前缀
pub const MAPPING_ENV_PREFIX: &str = "RESTQL_MAPPING_";

/// 环境变量能力接口
pub trait EnvironmentSource: Send + Sync {
    /// 获取全部键值对（无顺序保证）
    fn get_all(&self) -> HashMap<String, String>;
}

impl EnvironmentSource for HashMap<String, String> {
    fn get_all(&self) -> HashMap<String, String> {
        self.clone()
    }
}

/// 进程环境变量数据源
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    /// 来自 .env 文件的变量
    file_vars: HashMap<String, String>,
}

impl EnvSource {
    /// 只读取进程环境变量
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取进程环境变量，并以 .env 文件作为补充
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| DataError::io(path.to_path_buf(), e))?;

        let file_vars = content.lines().filter_map(parse_env_line).collect();
        Ok(Self { file_vars })
    }
}

impl EnvironmentSource for EnvSource {
    fn get_all(&self) -> HashMap<String, String> {
        let mut vars = self.file_vars.clone();
        // 非 UTF-8 变量不可能是映射配置，直接跳过
        vars.extend(std::env::vars_os().filter_map(|(k, v)| {
            Some((k.into_string().ok()?, v.into_string().ok()?))
        }));
        vars
    }
}

/// 将映射变量名转换为资源名
///
/// `RESTQL_MAPPING_HERO_LIST` -> `hero-list`；不匹配前缀或名称为空时返回 `None`。
pub fn mapping_resource_name(key: &str) -> Option<String> {
    let name = key.strip_prefix(MAPPING_ENV_PREFIX)?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_lowercase().replace('_', "-"))
}

/// 解析 ENV 文件的一行
///
/// # 返回
///
/// - `Some((key, value))`: 成功解析
/// - `None`: 注释、空行或无效行
fn parse_env_line(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key.to_string(), unquote(value.trim()).to_string()))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
