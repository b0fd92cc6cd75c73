pub mod config;
pub mod mapping;
pub mod query;

pub use config::*;
pub use mapping::{Mapping, TenantMappings, DEFAULT_TENANT};
pub use query::{QueryKey, SavedQuery};
