//! Hearth CLI - Command line interface
//!
//! Diagnostics for the scripting host bootstrap: where includes resolve,
//! what the global scope contains, and what a native extension exports.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

mod config;
mod logging;
mod platform;

use crate::config::{read_host_config, LogConfig};
use crate::logging::LogFormat;
use crate::platform::{print_error, print_resolution};
use hearth_api::{get_config, init_config, Host, LogLevel, RunConfig, Value};

#[derive(Parser)]
#[command(
    name = "hearth",
    about = "Hearth scripting host - bootstrap diagnostics",
    version = "0.1.0"
)]
struct Cli {
    /// Host configuration file (JSON)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level: silent, error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    log_format: LogFormat,

    /// Also append logs to this file
    #[arg(long, value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show which file `include` would load for each path
    Resolve {
        #[arg(required = true)]
        paths: Vec<String>,

        /// List every candidate location
        #[arg(long)]
        all: bool,
    },
    /// List the root names of a freshly built global scope
    Scope,
    /// Load a native extension and print its exports as JSON
    Probe {
        /// Shared library path, as passed to loadDll
        library: String,
    },
}

/// probe 输出
#[derive(serde::Serialize)]
struct ProbeReport {
    name: String,
    path: String,
    exports: serde_json::Value,
}

fn main() {
    let cli = Cli::parse();

    let host_config = match read_host_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut log_config = LogConfig::from_logging(&host_config.logging);
    if let Some(level) = &cli.log_level {
        match LogLevel::parse(level) {
            Some(level) => log_config = log_config.with_global(level),
            None => {
                eprintln!("Error: unknown log level '{}'", level);
                process::exit(1);
            }
        }
    }
    if let Err(e) = logging::init(&log_config, cli.log_format, cli.log_file.as_deref()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let show_candidates = matches!(cli.command, Command::Resolve { all: true, .. });
    let run_config = RunConfig {
        show_candidates,
        ..RunConfig::new(host_config)
    };
    // Initialize API config (global singleton for convenience)
    if let Err(e) = init_config(run_config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let code = match cli.command {
        Command::Resolve { paths, .. } => handle_resolve(&paths),
        Command::Scope => handle_scope(),
        Command::Probe { library } => handle_probe(&library),
    };
    process::exit(code);
}

fn handle_resolve(paths: &[String]) -> i32 {
    let config = get_config();
    let host = Host::new(config.host.clone());
    let mut code = 0;

    for path in paths {
        match host.resolve(path) {
            Ok(resolved) => {
                let candidates = host.candidates(path);
                print_resolution(path, &resolved.path, &candidates, config.show_candidates);
            }
            Err(e) => {
                print_error(&e);
                code = 1;
            }
        }
    }
    code
}

fn handle_scope() -> i32 {
    let host = Host::new(get_config().host.clone());
    for name in host.scope().names() {
        println!("{}", name);
    }
    0
}

fn handle_probe(library: &str) -> i32 {
    let host = Host::new(get_config().host.clone());
    let extension = match host.load_extension(library) {
        Ok(ext) => ext,
        Err(e) => {
            print_error(&e);
            return 1;
        }
    };

    let report = ProbeReport {
        name: extension.name.clone(),
        path: extension.path.clone(),
        exports: Value::Object(extension.exports.clone()).to_json(),
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
