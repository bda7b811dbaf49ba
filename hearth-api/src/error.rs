//! API 错误类型
//!
//! 提供统一的错误类型和结构化错误报告。

pub use hearth_core::{CompileError, HostError, LoadError, LoadErrorKind, ResolveError};

/// 转换为结构化错误报告
///
/// 适用于 CLI、嵌入方等需要结构化数据的场景。
/// CLI 直接打印 `Display` 形式，嵌入方可以读取各字段自行格式化。
///
/// # Example
/// ```ignore
/// match host.run_entry(&mut engine, "main.js") {
///     Err(e) => {
///         let report = e.to_report();
///         eprintln!("{}", report);
///     }
///     Ok(_) => {}
/// }
/// ```
pub trait ToReport {
    fn to_report(&self) -> ErrorReport;
}

impl ToReport for HostError {
    fn to_report(&self) -> ErrorReport {
        match self {
            HostError::Resolution(e) => ErrorReport {
                phase: self.phase(),
                error_kind: "NotFound".to_string(),
                path: Some(e.path.clone()),
                line: None,
                message: e.to_string(),
                details: Some(ErrorDetails::Candidates {
                    tried: e.tried.iter().map(|p| p.display().to_string()).collect(),
                }),
            },
            HostError::Load(e) => ErrorReport {
                phase: self.phase(),
                error_kind: e.kind.as_str().to_string(),
                path: Some(e.path.clone()),
                line: None,
                message: e.to_string(),
                details: e
                    .diagnostic
                    .as_ref()
                    .map(|text| ErrorDetails::Diagnostic { text: text.clone() }),
            },
            HostError::Compile(e) => ErrorReport {
                phase: self.phase(),
                error_kind: "CompileError".to_string(),
                path: Some(e.origin.clone()),
                line: e.line,
                message: e.message.clone(),
                details: None,
            },
            HostError::Type(msg) => ErrorReport {
                phase: self.phase(),
                error_kind: "TypeError".to_string(),
                path: None,
                line: None,
                message: msg.clone(),
                details: None,
            },
            HostError::Runtime(msg) => ErrorReport {
                phase: self.phase(),
                error_kind: "RuntimeError".to_string(),
                path: None,
                line: None,
                message: msg.clone(),
                details: None,
            },
        }
    }
}

/// 结构化错误报告
///
/// 上层应用可以根据自己的需求格式化。
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    /// 错误阶段: resolve, load, compile, type, runtime
    pub phase: &'static str,
    /// 错误类型（可用于程序化处理）
    pub error_kind: String,
    /// 相关文件或库路径（如果有）
    pub path: Option<String>,
    /// 错误行号（1-based，如果有）
    pub line: Option<usize>,
    /// 人类可读的错误消息
    pub message: String,
    /// 额外详情
    pub details: Option<ErrorDetails>,
}

/// 错误额外详情
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetails {
    /// 解析时尝试过的候选路径
    Candidates { tried: Vec<String> },
    /// 平台加载器的诊断信息
    Diagnostic { text: String },
}

impl std::fmt::Display for ErrorReport {
    /// 默认的 CLI 友好格式
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.path, self.line) {
            (Some(path), Some(line)) => {
                write!(f, "[{}:{}] {} error: {}", path, line, self.phase, self.message)
            }
            _ => write!(f, "[{}] {} error: {}", self.phase, self.error_kind, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_resolution_report() {
        let err = HostError::Resolution(ResolveError {
            path: "x.js".to_string(),
            tried: vec![PathBuf::from("x.js"), PathBuf::from("/usr/local/hearth/x.js")],
        });
        let report = err.to_report();
        assert_eq!(report.phase, "resolve");
        assert_eq!(report.path.as_deref(), Some("x.js"));
        assert_eq!(report.message, "include file not found x.js");
        assert_eq!(
            report.details,
            Some(ErrorDetails::Candidates {
                tried: vec!["x.js".to_string(), "/usr/local/hearth/x.js".to_string()],
            })
        );
    }

    #[test]
    fn test_load_report() {
        let err = HostError::Load(
            LoadError::new(LoadErrorKind::MissingEntryPoint, "libc.so.6").with_diagnostic("undefined symbol"),
        );
        let report = err.to_report();
        assert_eq!(report.phase, "load");
        assert_eq!(report.error_kind, "MissingEntryPoint");
        assert!(report.message.contains("getExports"));
    }

    #[test]
    fn test_compile_report_display_with_location() {
        let err = HostError::Compile(CompileError::new("lib/a.js", "unexpected token").at_line(3));
        let display = format!("{}", err.to_report());
        assert_eq!(display, "[lib/a.js:3] compile error: unexpected token");
    }

    #[test]
    fn test_runtime_report_display_without_location() {
        let report = HostError::Runtime("boom".to_string()).to_report();
        assert_eq!(format!("{}", report), "[runtime] RuntimeError error: boom");
    }

    #[test]
    fn test_report_keeps_control_characters_verbatim() {
        let report = HostError::Type("bell\u{7}here \"arg\"".to_string()).to_report();
        assert_eq!(report.phase, "type");
        assert_eq!(report.path, None);
        assert_eq!(report.message, "bell\u{7}here \"arg\"");
        assert_eq!(
            format!("{}", report),
            "[type] TypeError error: bell\u{7}here \"arg\""
        );
    }
}
