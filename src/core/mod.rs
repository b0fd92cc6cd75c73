// 核心基础设施层
pub mod logger;

pub use logger::{init_logger, update_log_level};
