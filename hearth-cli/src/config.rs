//! CLI 配置
//!
//! 包含 CLI 特有的配置：日志配置和宿主配置文件的读取

use std::path::Path;

use hearth_config::{Component, HostConfig, LogLevel, LoggingConfig};
use tracing::Level;

/// CLI 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: Level,
    pub resolver: Option<Level>,
    pub cache: Option<Level>,
    pub include: Option<Level>,
    pub extension: Option<Level>,
    pub scope: Option<Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::INFO,
            resolver: None,
            cache: None,
            include: None,
            extension: None,
            scope: None,
        }
    }
}

impl LogConfig {
    /// 从宿主配置中的日志配置构建
    pub fn from_logging(logging: &LoggingConfig) -> Self {
        Self {
            global: to_level(logging.level),
            resolver: logging.resolver.map(to_level),
            cache: logging.cache.map(to_level),
            include: logging.include.map(to_level),
            extension: logging.extension.map(to_level),
            scope: logging.scope.map(to_level),
        }
    }

    /// 覆盖全局级别（命令行 --log-level）
    pub fn with_global(mut self, level: LogLevel) -> Self {
        self.global = to_level(level);
        self
    }

    /// Get log level for a specific target
    pub fn level_for(&self, target: &str) -> Level {
        let component = Component::ALL.into_iter().find(|c| c.target() == target);
        let specific = match component {
            Some(Component::Resolver) => self.resolver,
            Some(Component::Cache) => self.cache,
            Some(Component::Include) => self.include,
            Some(Component::Extension) => self.extension,
            Some(Component::Scope) => self.scope,
            None => None,
        };
        specific.unwrap_or(self.global)
    }
}

fn to_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    }
}

/// 读取宿主配置文件（JSON）；未指定时使用默认配置
pub fn read_host_config(path: Option<&Path>) -> Result<HostConfig, String> {
    let Some(path) = path else {
        return Ok(HostConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("无法读取 '{}': {}", path.display(), e))?;

    serde_json::from_str(&content).map_err(|e| format!("解析 '{}' 失败: {}", path.display(), e))
}
