//! API 层配置
//!
//! 包含运行配置 RunConfig 和全局单例（供 CLI 使用）

use hearth_config::HostConfig;
use once_cell::sync::OnceCell;
use thiserror::Error;

/// Run configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Host configuration (cache policy, logging)
    pub host: HostConfig,
    /// Report every tried candidate, not only the match
    pub show_candidates: bool,
}

impl RunConfig {
    pub fn new(host: HostConfig) -> Self {
        Self {
            host,
            show_candidates: false,
        }
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("run config already initialized")]
    AlreadyInitialized,
}

// Global config singleton for CLI convenience
static GLOBAL_CONFIG: OnceCell<RunConfig> = OnceCell::new();

/// Initialize global configuration (once per process)
pub fn init(config: RunConfig) -> Result<(), ConfigError> {
    GLOBAL_CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)
}

/// Get global config reference
///
/// Falls back to the default configuration if `init` was never called.
pub fn config() -> &'static RunConfig {
    GLOBAL_CONFIG.get_or_init(RunConfig::default)
}
