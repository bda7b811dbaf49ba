//! 测试辅助工具
//!
//! 一个逐行解释的玩具引擎，以及把它接到宿主上的脚手架。
//!
//! 脚本语法（每行一条语句，`#` 开头为注释）：
//! - `let NAME ARG`：设置全局变量
//! - `call FN ARG...`：调用全局函数（FN 可用点号访问属性，如 `builtin.sample.hello`）
//! - `set NAME FN ARG...`：调用函数并把结果存入全局变量
//! - `throw MESSAGE`：运行时错误
//! - `return ARG`：脚本结果
//! - `!...`：编译错误
//!
//! ARG 可以是 `"text"`（不含空格）、数字或 `$NAME` / `$NAME.prop`。

#![allow(dead_code)]

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use hearth_core::{
    CachePolicy, CaptureBuffer, CompileError, CompiledScript, Console, ExtensionRegistry,
    FileResolver, GlobalScope, GlobalScopeBuilder, HostError, IncludeExecutor, ScriptCache,
    ScriptEngine, ScriptOrigin, Value,
};
use hearth_vfs::MemoryFileSystem;

const EVAL_ORIGIN: &str = "<eval>";

#[derive(Debug, Clone)]
enum Arg {
    Text(String),
    Number(f64),
    Global(String),
}

#[derive(Debug, Clone)]
enum Stmt {
    Let(String, Arg),
    Call {
        target: Option<String>,
        func: String,
        args: Vec<Arg>,
    },
    Throw(String),
    Return(Arg),
}

#[derive(Debug)]
struct ToyScript {
    stmts: Vec<Stmt>,
}

/// 玩具引擎
#[derive(Default)]
pub struct ToyEngine {
    globals: HashMap<String, Value>,
    /// 每次编译的来源名
    pub compiled: Vec<String>,
}

impl ToyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(&self, name: &str) -> Option<Value> {
        lookup(&self.globals, name)
    }

    /// 编译次数（不含 eval）
    pub fn compile_count(&self) -> usize {
        self.compiled.iter().filter(|origin| *origin != EVAL_ORIGIN).count()
    }

    /// 编译并运行一段源码
    pub fn eval(&mut self, source: &str) -> Result<Value, HostError> {
        let script = self.compile(source, &ScriptOrigin::new(EVAL_ORIGIN))?;
        self.run(&script)
    }

    fn arg_value(&self, arg: &Arg) -> Result<Value, HostError> {
        match arg {
            Arg::Text(s) => Ok(Value::from(s.as_str())),
            Arg::Number(n) => Ok(Value::Number(*n)),
            Arg::Global(name) => self
                .global(name)
                .ok_or_else(|| HostError::runtime(format!("ReferenceError: {} is not defined", name))),
        }
    }
}

fn lookup(globals: &HashMap<String, Value>, dotted: &str) -> Option<Value> {
    let mut parts = dotted.split('.');
    let mut current = globals.get(parts.next()?)?.clone();
    for part in parts {
        let next = current.as_object()?.borrow().get(part).cloned()?;
        current = next;
    }
    Some(current)
}

fn parse_arg(token: &str) -> Arg {
    if let Some(name) = token.strip_prefix('$') {
        Arg::Global(name.to_string())
    } else if let Ok(n) = token.parse::<f64>() {
        Arg::Number(n)
    } else {
        Arg::Text(token.trim_matches('"').to_string())
    }
}

fn parse_line(line: &str) -> Result<Option<Stmt>, String> {
    let mut tokens = line.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = tokens.collect();
    let stmt = match (keyword, rest.as_slice()) {
        (k, _) if k.starts_with('#') => return Ok(None),
        ("let", [name, value]) => Stmt::Let(name.to_string(), parse_arg(value)),
        ("call", [func, args @ ..]) => Stmt::Call {
            target: None,
            func: func.to_string(),
            args: args.iter().map(|a| parse_arg(a)).collect(),
        },
        ("set", [target, func, args @ ..]) => Stmt::Call {
            target: Some(target.to_string()),
            func: func.to_string(),
            args: args.iter().map(|a| parse_arg(a)).collect(),
        },
        ("throw", words) => Stmt::Throw(words.join(" ")),
        ("return", [value]) => Stmt::Return(parse_arg(value)),
        _ => return Err(format!("cannot parse '{}'", line.trim())),
    };
    Ok(Some(stmt))
}

impl ScriptEngine for ToyEngine {
    fn compile(&mut self, source: &str, origin: &ScriptOrigin) -> Result<CompiledScript, CompileError> {
        let mut stmts = Vec::new();
        for (index, line) in source.lines().enumerate() {
            if line.trim_start().starts_with('!') {
                return Err(CompileError::new(origin.name(), "unexpected token '!'").at_line(index + 1));
            }
            match parse_line(line) {
                Ok(Some(stmt)) => stmts.push(stmt),
                Ok(None) => {}
                Err(message) => {
                    return Err(CompileError::new(origin.name(), message).at_line(index + 1))
                }
            }
        }
        self.compiled.push(origin.name().to_string());
        Ok(CompiledScript::new(ToyScript { stmts }))
    }

    fn run(&mut self, script: &CompiledScript) -> Result<Value, HostError> {
        let stmts = script
            .downcast_ref::<ToyScript>()
            .ok_or_else(|| HostError::runtime("foreign script handle"))?
            .stmts
            .clone();
        for stmt in stmts {
            match stmt {
                Stmt::Let(name, arg) => {
                    let value = self.arg_value(&arg)?;
                    self.globals.insert(name, value);
                }
                Stmt::Call { target, func, args } => {
                    let function = self
                        .global(&func)
                        .and_then(|v| v.as_function().cloned())
                        .ok_or_else(|| HostError::runtime(format!("TypeError: {} is not a function", func)))?;
                    let values = args
                        .iter()
                        .map(|a| self.arg_value(a))
                        .collect::<Result<Vec<_>, _>>()?;
                    let result = function.call(self, &values)?;
                    if let Some(target) = target {
                        self.globals.insert(target, result);
                    }
                }
                Stmt::Throw(message) => return Err(HostError::runtime(message)),
                Stmt::Return(arg) => return self.arg_value(&arg),
            }
        }
        Ok(Value::Undefined)
    }

    fn expose(&mut self, name: &str, value: Value) {
        self.globals.insert(name.to_string(), value);
    }
}

/// 接好宿主的玩具引擎
pub struct Harness {
    pub engine: ToyEngine,
    pub scope: GlobalScope,
    pub includer: Rc<IncludeExecutor>,
    pub cache: Rc<ScriptCache>,
    pub extensions: Rc<ExtensionRegistry>,
    pub output: CaptureBuffer,
    pub fs: MemoryFileSystem,
}

impl Harness {
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self::with_policy(files, CachePolicy::Revalidate)
    }

    pub fn with_policy(files: &[(&str, &str)], policy: CachePolicy) -> Self {
        let fs = MemoryFileSystem::with_files(files.iter().map(|(p, c)| (*p, c.as_bytes().to_vec())));
        let cache = Rc::new(ScriptCache::new(policy));
        let includer = Rc::new(IncludeExecutor::new(
            FileResolver::new(Arc::new(fs.clone())),
            cache.clone(),
        ));
        let extensions = Rc::new(ExtensionRegistry::new());
        let (console, output) = Console::capture();
        let scope = GlobalScopeBuilder::new(includer.clone(), extensions.clone())
            .console(console)
            .build();
        let mut engine = ToyEngine::new();
        scope.install(&mut engine);
        Self {
            engine,
            scope,
            includer,
            cache,
            extensions,
            output,
            fs,
        }
    }

    pub fn eval(&mut self, source: &str) -> Result<Value, HostError> {
        self.engine.eval(source)
    }
}
