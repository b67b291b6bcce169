mod r#impl;
mod structs;

pub use r#impl::{get_config, init_config};
pub use structs::{
    DEFAULT_CONFIG_FILE, DraftConfig, ENV_PREFIX, LinkingConfig, LoggingConfig, StaticConfig,
    StorageConfig,
};
