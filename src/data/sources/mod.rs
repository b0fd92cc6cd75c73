//! 映射数据源
//!
//! 三种相互独立的数据源，可缺省（缺省时不贡献任何映射）：
//! - `env`: 进程环境变量（`RESTQL_MAPPING_<NAME>`）
//! - `local`: 启动时加载的静态映射表
//! - `database`: 按租户持久化的映射记录与保存查询

pub mod database;
pub mod env;
pub mod local;

pub use database::{Database, NoDatabase, SqliteDatabase};
pub use env::{mapping_resource_name, EnvSource, EnvironmentSource, MAPPING_ENV_PREFIX};
pub use local::LocalSource;
