// 保存查询模型

use serde::{Deserialize, Serialize};

/// 保存查询的缓存键：命名空间 + 名称 + 版本
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct QueryKey {
    pub namespace: String,
    pub name: String,
    pub revision: u32,
}

impl QueryKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, revision: u32) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            revision,
        }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.name, self.revision)
    }
}

/// 数据库中保存的查询文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub namespace: String,
    pub name: String,
    pub revision: u32,
    /// 原始查询文本
    pub text: String,
    /// 该版本是否已弃用
    #[serde(default)]
    pub deprecated: bool,
}

impl SavedQuery {
    pub fn key(&self) -> QueryKey {
        QueryKey::new(self.namespace.clone(), self.name.clone(), self.revision)
    }
}
