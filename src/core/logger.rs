use crate::models::config::{LogConfig, LogFormat, LogLevel, LogOutput};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt,
    layer::{Layered, SubscriberExt},
    reload::{self, Handle},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type FilterLayer = reload::Layer<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Layered<FilterLayer, Registry>> + Send + Sync + 'static>;

/// 全局日志级别 reload handle
static LOG_LEVEL_HANDLE: OnceLock<Handle<EnvFilter, Registry>> = OnceLock::new();

/// 文件输出的后台写线程 guard（进程内常驻）
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// 初始化日志系统
///
/// 支持基于配置的日志输出，包括：
/// - 日志级别（trace/debug/info/warn/error）
/// - 输出格式（JSON/纯文本）
/// - 输出目标（控制台/文件/both）
///
/// 日志级别可以通过 `update_log_level` 动态调整，其余配置需重启后生效。
/// 设置了 `RUST_LOG` 时以环境变量为准。
pub fn init_logger(config: &LogConfig) -> anyhow::Result<()> {
    let (filter_layer, reload_handle) = reload::Layer::new(create_env_filter(&config.level));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if matches!(config.output, LogOutput::Console | LogOutput::Both) {
        layers.push(create_console_layer(config.format));
    }
    if matches!(config.output, LogOutput::File | LogOutput::Both) {
        layers.push(create_file_layer(config.format, config.file_path.as_deref())?);
    }

    // 订阅器注册成功后才保存 handle，失败时 update_log_level 仍报告未初始化
    Registry::default()
        .with(filter_layer)
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("注册日志订阅器失败: {}", e))?;

    if LOG_LEVEL_HANDLE.set(reload_handle).is_err() {
        anyhow::bail!("日志系统已初始化，不能重复初始化");
    }

    tracing::info!(
        level = config.level.as_str(),
        format = ?config.format,
        output = ?config.output,
        file_path = ?config.file_path,
        "日志系统初始化完成"
    );

    Ok(())
}

/// 创建环境过滤器
fn create_env_filter(level: &LogLevel) -> EnvFilter {
    // 格式：RUST_LOG=debug 或 RUST_LOG=restql_mappings=trace,rusqlite=warn
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "restql_mappings={},rusqlite=warn,tokio=warn",
            level.as_str()
        ))
    })
}

/// 创建控制台输出层
fn create_console_layer(format: LogFormat) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(cfg!(debug_assertions))
        .with_thread_ids(false);

    match format {
        LogFormat::Text => layer.with_ansi(true).boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// 创建文件输出层（按天滚动，非阻塞写入）
fn create_file_layer(format: LogFormat, file_path: Option<&str>) -> anyhow::Result<BoxedLayer> {
    let log_dir = get_log_dir(file_path)?;
    let (writer, guard) = non_blocking(rolling::daily(log_dir, "restql"));
    // 重复初始化会在上层被拒绝，这里忽略第二个 guard
    let _ = FILE_GUARD.set(guard);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    Ok(match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().with_thread_ids(true).boxed(),
    })
}

/// 获取日志目录
fn get_log_dir(file_path: Option<&str>) -> anyhow::Result<PathBuf> {
    let dir = match file_path {
        Some(path) => PathBuf::from(path),
        None => dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("无法获取用户主目录"))?
            .join(".restql")
            .join("logs"),
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// 动态更新日志级别（热重载）
pub fn update_log_level(new_level: LogLevel) -> anyhow::Result<()> {
    let handle = LOG_LEVEL_HANDLE
        .get()
        .ok_or_else(|| anyhow::anyhow!("日志系统未初始化"))?;

    handle
        .reload(create_env_filter(&new_level))
        .map_err(|e| anyhow::anyhow!("重载日志级别失败: {}", e))?;

    tracing::info!(new_level = new_level.as_str(), "日志级别已动态更新");
    Ok(())
}
