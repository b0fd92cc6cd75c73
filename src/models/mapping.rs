//! 资源映射模型
//!
//! `Mapping` 是单个逻辑资源名解析后的路由信息，`TenantMappings` 是某个租户的完整映射表。
//! 映射表构建完成后以 `Arc` 共享，只读不改。

use crate::data::{DataError, MalformedReason, MalformedUrl, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// 默认租户标识（请求未携带租户时使用）
pub const DEFAULT_TENANT: &str = "default";

/// 路径参数占位符：以 `:` 开头的整段，例如 `/heroes/:id`
static PATH_PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:([A-Za-z0-9_\-]+)$").expect("路径参数正则无效"));

/// 若路径段是参数占位符，返回参数名
pub(crate) fn path_param_name(segment: &str) -> Option<&str> {
    PATH_PARAM_RE
        .captures(segment)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// 拆出路径中 `?` 之前的部分
fn route_part(path: &str) -> &str {
    path.split_once('?').map_or(path, |(route, _)| route)
}

/// 按路径段顺序提取参数名
pub(crate) fn extract_path_params(path: &str) -> Vec<String> {
    route_part(path)
        .split('/')
        .filter_map(path_param_name)
        .map(String::from)
        .collect()
}

/// 单个资源的路由映射
///
/// `path_params_set` 总是由 `path_params` 在构造时派生，不单独修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mapping {
    resource_name: String,
    schema: String,
    host: String,
    path: String,
    path_params: Vec<String>,
    #[serde(skip)]
    path_params_set: HashSet<String>,
}

impl Mapping {
    /// 创建映射，资源名统一转为小写
    pub fn new(
        resource_name: impl Into<String>,
        schema: impl Into<String>,
        host: impl Into<String>,
        path: impl Into<String>,
        path_params: Vec<String>,
    ) -> Self {
        let path_params_set = path_params.iter().cloned().collect();
        Self {
            resource_name: resource_name.into().to_lowercase(),
            schema: schema.into(),
            host: host.into(),
            path: path.into(),
            path_params,
            path_params_set,
        }
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 按路径顺序排列的参数名
    pub fn path_params(&self) -> &[String] {
        &self.path_params
    }

    /// 参数名集合
    pub fn path_params_set(&self) -> &HashSet<String> {
        &self.path_params_set
    }

    /// 判断某个参数是否为路径参数
    pub fn is_path_param(&self, name: &str) -> bool {
        self.path_params_set.contains(name)
    }

    /// 用给定取值替换路径参数，取值会做百分号编码
    ///
    /// 缺少任意参数时返回 `MissingPathParam`。
    pub fn complete_path(&self, values: &HashMap<String, String>) -> Result<String> {
        let (route, query) = match self.path.split_once('?') {
            Some((route, query)) => (route, Some(query)),
            None => (self.path.as_str(), None),
        };

        let mut segments = Vec::new();
        for segment in route.split('/') {
            match path_param_name(segment) {
                Some(param) => {
                    let value = values.get(param).ok_or_else(|| DataError::MissingPathParam {
                        resource: self.resource_name.clone(),
                        param: param.to_string(),
                    })?;
                    segments.push(urlencoding::encode(value).into_owned());
                }
                None => segments.push(segment.to_string()),
            }
        }

        let mut completed = segments.join("/");
        if let Some(query) = query {
            completed.push('?');
            completed.push_str(query);
        }
        Ok(completed)
    }

    /// 构建完整请求 URL
    pub fn url(&self, values: &HashMap<String, String>) -> Result<url::Url> {
        let raw = format!("{}://{}{}", self.schema, self.host, self.complete_path(values)?);
        url::Url::parse(&raw).map_err(|_| {
            DataError::MalformedMappingUrl(MalformedUrl {
                resource: self.resource_name.clone(),
                url: raw,
                reason: MalformedReason::Unparseable,
            })
        })
    }
}

/// 单个租户的有效映射表
///
/// 同时保存解析失败的资源，调用方可按资源决定降级策略。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantMappings {
    tenant: String,
    mappings: HashMap<String, Mapping>,
    failures: HashMap<String, MalformedUrl>,
}

impl TenantMappings {
    pub(crate) fn new(tenant: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            ..Self::default()
        }
    }

    /// 写入映射，覆盖同名资源此前的映射或失败记录
    pub(crate) fn insert(&mut self, mapping: Mapping) {
        self.failures.remove(mapping.resource_name());
        self.mappings
            .insert(mapping.resource_name().to_string(), mapping);
    }

    /// 记录解析失败，覆盖同名资源此前的映射
    pub(crate) fn record_failure(&mut self, failure: MalformedUrl) {
        self.mappings.remove(&failure.resource);
        self.failures.insert(failure.resource.clone(), failure);
    }

    /// 租户标识
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// 查找资源映射
    ///
    /// - 解析失败的资源返回 `MalformedMappingUrl`
    /// - 不存在的资源返回 `NotFound`
    pub fn get(&self, resource: &str) -> Result<&Mapping> {
        let key = resource.to_lowercase();
        if let Some(mapping) = self.mappings.get(&key) {
            return Ok(mapping);
        }
        match self.failures.get(&key) {
            Some(failure) => Err(DataError::MalformedMappingUrl(failure.clone())),
            None => Err(DataError::NotFound(format!(
                "租户 '{}' 下的资源 '{}'",
                self.tenant, resource
            ))),
        }
    }

    /// 成功解析的映射
    pub fn mappings(&self) -> &HashMap<String, Mapping> {
        &self.mappings
    }

    /// 解析失败的资源
    pub fn failures(&self) -> &HashMap<String, MalformedUrl> {
        &self.failures
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
