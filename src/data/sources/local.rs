// 本地映射数据源：启动时由配置提供的静态表，对所有租户相同

use std::collections::HashMap;

/// 本地映射表（资源名 -> URL）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalSource {
    entries: HashMap<String, String>,
}

impl LocalSource {
    /// 创建本地数据源，资源名统一转为小写
    ///
    /// 多个键转小写后同名时，原本就是小写的键胜出，其余按原始键排序后写入。
    pub fn new(entries: HashMap<String, String>) -> Self {
        let mut pairs: Vec<(String, String)> = entries.into_iter().collect();
        pairs.sort_by(|(a, _), (b, _)| {
            (*a == a.to_lowercase(), a).cmp(&(*b == b.to_lowercase(), b))
        });

        let entries = pairs
            .into_iter()
            .map(|(name, url)| (name.to_lowercase(), url))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<HashMap<String, String>> for LocalSource {
    fn from(entries: HashMap<String, String>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_lowercased() {
        let mut entries = HashMap::new();
        entries.insert("Hero".to_string(), "http://hero.api/".to_string());
        let source = LocalSource::from(entries);

        assert_eq!(source.entries()["hero"], "http://hero.api/");
        assert!(!source.is_empty());
        assert!(LocalSource::default().is_empty());
    }

    #[test]
    fn test_colliding_names_resolve_to_lowercase_key() {
        for _ in 0..32 {
            let mut entries = HashMap::new();
            entries.insert("HERO".to_string(), "http://shout.api/".to_string());
            entries.insert("hero".to_string(), "http://lower.api/".to_string());
            entries.insert("Hero".to_string(), "http://title.api/".to_string());

            let source = LocalSource::new(entries);
            assert_eq!(source.entries().len(), 1);
            assert_eq!(source.entries()["hero"], "http://lower.api/");
        }
    }
}
