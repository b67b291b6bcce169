use serde::{Deserialize, Serialize};

use crate::errors::{LinkerError, Result};
use crate::link::ResetPolicy;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "symlinker.toml";
/// Environment prefix, e.g. `SYMLINKER__STORAGE__DB_FILE=links.json`
pub const ENV_PREFIX: &str = "SYMLINKER";

/// 静态配置（从 TOML 和环境变量加载，启动时使用）
///
/// - storage: 链接记录文件
/// - linking: 建立链接时的行为
/// - draft: 草稿在创建成功后的处理
/// - logging: 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub linking: LinkingConfig,
    #[serde(default)]
    pub draft: DraftConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// Load from a TOML file and the environment.
    ///
    /// Priority: ENV > file > defaults. An explicitly given file must
    /// exist; the default file is optional.
    pub fn try_load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let (path, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_FILE, false),
        };

        let settings = Config::builder()
            .add_source(File::with_name(path).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| LinkerError::config(format!("Failed to build config: {}", e)))?;

        settings
            .try_deserialize::<StaticConfig>()
            .map_err(|e| LinkerError::config(format!("Failed to deserialize config: {}", e)))
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> Result<String> {
        let body = toml::to_string_pretty(&Self::default())
            .map_err(|e| LinkerError::serialization(e.to_string()))?;
        Ok(format!(
            "# symlinker configuration\n# Environment variables override these values, e.g. {}__STORAGE__DB_FILE\n\n{}",
            ENV_PREFIX, body
        ))
    }
}

/// 链接记录存储配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_file")]
    pub db_file: String,
}

/// 链接行为配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkingConfig {
    /// Link symlinks found inside source directories instead of skipping them
    #[serde(default)]
    pub include_symlinks: bool,
}

/// 草稿配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftConfig {
    #[serde(default)]
    pub reset_on_success: bool,
}

impl DraftConfig {
    pub fn reset_policy(&self) -> ResetPolicy {
        ResetPolicy::from_reset_flag(self.reset_on_success)
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Log file; stderr when unset or empty
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_db_file() -> String {
    "symlinks.json".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file: default_db_file(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.storage.db_file, "symlinks.json");
        assert!(!config.linking.include_symlinks);
        assert_eq!(config.draft.reset_policy(), ResetPolicy::Keep);
        assert_eq!(config.logging.format, "text");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[storage]
db_file = "/tmp/links.json"

[draft]
reset_on_success = true

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let config = StaticConfig::try_load(path.to_str()).unwrap();
        assert_eq!(config.storage.db_file, "/tmp/links.json");
        assert_eq!(config.draft.reset_policy(), ResetPolicy::ResetOnSuccess);
        assert_eq!(config.logging.level, "debug");
        // 未配置的部分使用默认值
        assert_eq!(config.logging.max_backups, 5);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            StaticConfig::try_load(path.to_str()),
            Err(LinkerError::Config(_))
        ));
    }

    #[test]
    fn test_sample_config_parses_back() {
        let sample = StaticConfig::generate_sample_config().unwrap();
        assert!(sample.starts_with("# symlinker configuration"));
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed, StaticConfig::default());
    }
}
