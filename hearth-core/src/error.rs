//! 宿主错误类型
//!
//! 所有错误都在出错的调用处以 `Err` 返回；引擎负责把它们转成脚本可捕获的异常。

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::extension::ENTRY_POINT;

/// 脚本文件解析失败：原路径与所有回退位置都读不到
#[derive(Error, Debug, Clone, PartialEq)]
#[error("include file not found {path}")]
pub struct ResolveError {
    /// 脚本请求的路径（原样）
    pub path: String,
    /// 依次尝试过的候选路径
    pub tried: Vec<PathBuf>,
}

/// 原生扩展加载失败的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// 动态库无法打开
    LibraryNotFound,
    /// 动态库没有导出入口函数
    MissingEntryPoint,
    /// 入口函数或 exports() 发生 panic
    EntryPointPanicked,
}

impl LoadErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadErrorKind::LibraryNotFound => "LibraryNotFound",
            LoadErrorKind::MissingEntryPoint => "MissingEntryPoint",
            LoadErrorKind::EntryPointPanicked => "EntryPointPanicked",
        }
    }
}

/// 原生扩展加载错误
#[derive(Error, Debug, Clone, PartialEq)]
pub struct LoadError {
    pub kind: LoadErrorKind,
    /// 传给 loadDll 的库路径
    pub path: String,
    /// 平台加载器给出的诊断信息
    pub diagnostic: Option<String>,
}

impl LoadError {
    pub fn new(kind: LoadErrorKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            diagnostic: None,
        }
    }

    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LoadErrorKind::LibraryNotFound => write!(f, "Shared library not found {}", self.path)?,
            LoadErrorKind::MissingEntryPoint => write!(
                f,
                "Shared library does not contain {} function {}",
                ENTRY_POINT, self.path
            )?,
            LoadErrorKind::EntryPointPanicked => {
                write!(f, "Shared library {} function panicked {}", ENTRY_POINT, self.path)?
            }
        }
        if let Some(diagnostic) = &self.diagnostic {
            write!(f, ": {}", diagnostic)?;
        }
        Ok(())
    }
}

/// 引擎编译失败（内容对宿主不透明）
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{origin}: {message}")]
pub struct CompileError {
    /// 编译时使用的来源名（即 include 的请求路径）
    pub origin: String,
    pub message: String,
    /// 出错行号（1-based，引擎提供时）
    pub line: Option<usize>,
}

impl CompileError {
    pub fn new(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            message: message.into(),
            line: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// 宿主错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// include 的文件找不到
    #[error(transparent)]
    Resolution(#[from] ResolveError),

    /// loadDll 失败
    #[error(transparent)]
    Load(#[from] LoadError),

    /// 引擎编译失败
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// 宿主函数参数类型错误
    #[error("TypeError: {0}")]
    Type(String),

    /// 脚本运行时错误
    #[error("{0}")]
    Runtime(String),
}

impl HostError {
    /// 参数类型错误的便捷构造
    pub fn type_error(message: impl Into<String>) -> Self {
        HostError::Type(message.into())
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        HostError::Runtime(message.into())
    }

    /// 错误阶段名称
    pub fn phase(&self) -> &'static str {
        match self {
            HostError::Resolution(_) => "resolve",
            HostError::Load(_) => "load",
            HostError::Compile(_) => "compile",
            HostError::Type(_) => "type",
            HostError::Runtime(_) => "runtime",
        }
    }
}
