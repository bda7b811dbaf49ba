//! Hearth Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Hearth crates.

use serde::Deserialize;

/// How the script cache treats a file that changed after it was compiled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    /// Compare the file's modification time on every lookup, recompile on mismatch
    #[default]
    Revalidate,
    /// Compile once per host; later edits are ignored
    Snapshot,
}

/// Configuration for the compiled-script cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Staleness policy
    pub policy: CachePolicy,
}

/// Log verbosity, ordered from most to least verbose
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse a level name, accepting `silent` as an alias for `error`
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" | "silent" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Host subsystem, used for per-component log configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Resolver,
    Cache,
    Include,
    Extension,
    Scope,
}

impl Component {
    /// Every component, in pipeline order
    pub const ALL: [Component; 5] = [
        Component::Resolver,
        Component::Cache,
        Component::Include,
        Component::Extension,
        Component::Scope,
    ];

    /// Get the string name of the component
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Resolver => "resolver",
            Component::Cache => "cache",
            Component::Include => "include",
            Component::Extension => "extension",
            Component::Scope => "scope",
        }
    }

    /// Get the log target name for this component
    pub fn target(&self) -> String {
        format!("hearth::{}", self.as_str())
    }
}

/// Logging configuration: a global level plus optional per-component overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub resolver: Option<LogLevel>,
    pub cache: Option<LogLevel>,
    pub include: Option<LogLevel>,
    pub extension: Option<LogLevel>,
    pub scope: Option<LogLevel>,
}

impl LoggingConfig {
    /// Effective level for one component
    pub fn level_for(&self, component: Component) -> LogLevel {
        let specific = match component {
            Component::Resolver => self.resolver,
            Component::Cache => self.cache,
            Component::Include => self.include,
            Component::Extension => self.extension,
            Component::Scope => self.scope,
        };
        specific.unwrap_or(self.level)
    }
}

/// Top-level host configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_host_config() {
        let cfg = HostConfig::default();
        assert_eq!(cfg.cache.policy, CachePolicy::Revalidate);
        assert_eq!(cfg.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_component_target() {
        assert_eq!(Component::Resolver.as_str(), "resolver");
        assert_eq!(Component::Extension.target(), "hearth::extension");
    }

    #[test]
    fn test_level_for_falls_back_to_global() {
        let cfg = LoggingConfig {
            level: LogLevel::Warn,
            cache: Some(LogLevel::Trace),
            ..LoggingConfig::default()
        };
        assert_eq!(cfg.level_for(Component::Cache), LogLevel::Trace);
        assert_eq!(cfg.level_for(Component::Include), LogLevel::Warn);
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("silent"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("loud"), None);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let json = r#"{ "cache": { "policy": "snapshot" }, "logging": { "extension": "debug" } }"#;
        let cfg: HostConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.cache.policy, CachePolicy::Snapshot);
        assert_eq!(cfg.logging.level, LogLevel::Info);
        assert_eq!(cfg.logging.level_for(Component::Extension), LogLevel::Debug);
    }
}
