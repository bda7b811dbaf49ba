//! 全局作用域构建
//!
//! 启动时构建一次根作用域：
//! 1. 分配根对象和嵌套的 `builtin` 命名空间
//! 2. 按注册顺序调用每个内置模块的注册钩子
//! 3. 把 `builtin` 挂到根对象上
//! 4. 注册 `log`、`print`、`println`、`include`、`loadDll`
//!
//! 构建完成后根对象结构只读。

use std::rc::Rc;

use tracing::{debug, info};

use crate::engine::ScriptEngine;
use crate::extension::ExtensionRegistry;
use crate::include::IncludeExecutor;
use crate::output::{output_function, Console, LOG, PRINT, PRINTLN};
use crate::value::{Object, ObjectRef, Value};

/// 嵌套命名空间名
pub const BUILTIN: &str = "builtin";
pub const INCLUDE: &str = "include";
pub const LOAD_DLL: &str = "loadDll";

/// 内置模块（console、process、fs ...）的注册钩子
pub trait BuiltinModule {
    fn name(&self) -> &str;

    /// 向根对象和 `builtin` 命名空间注册能力
    fn register(&self, root: &mut Object, builtin: &mut Object);
}

impl<M: BuiltinModule + ?Sized> BuiltinModule for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn register(&self, root: &mut Object, builtin: &mut Object) {
        (**self).register(root, builtin)
    }
}

/// 全局作用域构建器；`build` 消耗自身，每个构建器只能构建一次
pub struct GlobalScopeBuilder {
    includer: Rc<IncludeExecutor>,
    extensions: Rc<ExtensionRegistry>,
    console: Console,
    modules: Vec<Box<dyn BuiltinModule>>,
}

impl GlobalScopeBuilder {
    pub fn new(includer: Rc<IncludeExecutor>, extensions: Rc<ExtensionRegistry>) -> Self {
        Self {
            includer,
            extensions,
            console: Console::stdout(),
            modules: Vec::new(),
        }
    }

    /// 设置输出目标
    pub fn console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// 添加内置模块（按添加顺序注册）
    pub fn module(mut self, module: impl BuiltinModule + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn build(self) -> GlobalScope {
        let mut root = Object::new();
        let mut builtin = Object::new();

        for module in &self.modules {
            debug!(target: "hearth::scope", module = module.name(), "registering builtin module");
            module.register(&mut root, &mut builtin);
        }

        let builtin = builtin.into_ref();
        root.set(BUILTIN, builtin.clone());
        root.set(LOG, output_function(LOG, self.console.clone()));
        root.set(PRINT, output_function(PRINT, self.console.clone()));
        root.set(PRINTLN, output_function(PRINTLN, self.console));
        root.set(INCLUDE, self.includer.into_function());
        root.set(LOAD_DLL, self.extensions.into_function(builtin.clone()));

        info!(
            target: "hearth::scope",
            modules = self.modules.len(),
            bindings = root.len(),
            "global scope built"
        );

        GlobalScope {
            root: root.into_ref(),
            builtin,
        }
    }
}

/// 已初始化的根作用域
pub struct GlobalScope {
    root: ObjectRef,
    builtin: ObjectRef,
}

impl GlobalScope {
    /// 根作用域中的绑定
    pub fn get(&self, name: &str) -> Option<Value> {
        self.root.borrow().get(name).cloned()
    }

    /// 根作用域的所有名字（已排序）
    pub fn names(&self) -> Vec<String> {
        self.root.borrow().keys().map(str::to_string).collect()
    }

    /// `builtin` 命名空间（loadDll 会向其中追加扩展）
    pub fn builtin(&self) -> &ObjectRef {
        &self.builtin
    }

    /// 把根作用域的每个绑定暴露给引擎
    pub fn install(&self, engine: &mut dyn ScriptEngine) {
        let bindings: Vec<(String, Value)> = self
            .root
            .borrow()
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        for (name, value) in bindings {
            engine.expose(&name, value);
        }
        debug!(target: "hearth::scope", "global scope installed");
    }
}
