//! CLI 日志系统初始化
//!
//! 基于 `tracing-subscriber` 实现分组件日志控制。日志写到 stderr，
//! stdout 留给命令输出。

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use hearth_config::Component;
use tracing_subscriber::{
    filter::Targets, fmt, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, Layer,
    Registry,
};

use crate::config::LogConfig;

/// 日志输出格式
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// 彩色格式化（开发使用）
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式（工具集成）
    Json,
}

/// 构建过滤目标
pub fn targets(log_config: &LogConfig) -> Targets {
    Component::ALL
        .into_iter()
        .fold(Targets::new().with_default(log_config.global), |targets, component| {
            let target = component.target();
            let level = log_config.level_for(&target);
            targets.with_target(target, level)
        })
        .with_target("hearth_api", log_config.global)
        .with_target("hearth", log_config.global)
}

/// 使用指定格式和日志配置初始化日志系统；指定文件时同时写入文件
pub fn init(log_config: &LogConfig, format: LogFormat, file: Option<&Path>) -> Result<(), String> {
    let targets = targets(log_config);

    let file_layer = match file {
        Some(path) => {
            let handle = File::options()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| format!("无法打开日志文件 '{}': {}", path.display(), e))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(handle))
                    .with_filter(targets.clone()),
            )
        }
        None => None,
    };

    let console_layer = create_format_layer(format, io::stderr).with_filter(targets);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| format!("日志系统初始化失败: {}", e))
}

/// Create formatter layer based on format
fn create_format_layer<M>(format: LogFormat, make_writer: M) -> Box<dyn Layer<Registry> + Send + Sync>
where
    M: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
    }
}
