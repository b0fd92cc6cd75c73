// restql-mappings <config.toml> [tenant]
//
// 解析指定租户的有效映射表并以 JSON 输出到标准输出。

use anyhow::Context;
use restql_mappings::{init_logger, AppConfig, QueryParser, Restql};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// 命令行工具不解析查询文本，原样保留
struct RawText;

impl QueryParser for RawText {
    type Ast = String;

    fn parse(&self, text: &str) -> restql_mappings::Result<Self::Ast> {
        Ok(text.to_string())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .map(PathBuf::from)
        .context("用法: restql-mappings <config.toml> [tenant]")?;

    let config = AppConfig::load(&config_path)
        .with_context(|| format!("加载配置失败: {}", config_path.display()))?;
    init_logger(&config.logging)?;

    let tenant = args.next().unwrap_or_else(|| config.tenant.clone());
    let restql = Restql::from_config(&config, RawText)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let table = restql
        .from_tenant(&tenant, &cancel)
        .await
        .with_context(|| format!("解析租户映射失败: {}", tenant))?;

    let mappings: BTreeMap<_, _> = table.mappings().iter().collect();
    let failures: BTreeMap<_, _> = table
        .failures()
        .iter()
        .map(|(name, failure)| (name, failure.to_string()))
        .collect();

    let output = serde_json::json!({
        "tenant": table.tenant(),
        "mappings": mappings,
        "failures": failures,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
