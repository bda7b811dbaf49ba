//! 输出原语：log / print / println
//!
//! 所有输出都写入一个共享的 [`Console`]，默认是 stdout，测试中可替换为内存缓冲区。

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::error::HostError;
use crate::value::{NativeFunction, Value};

/// 共享输出目标
#[derive(Clone)]
pub struct Console {
    out: Rc<RefCell<Box<dyn Write>>>,
}

impl Console {
    pub fn new(writer: impl Write + 'static) -> Self {
        Self {
            out: Rc::new(RefCell::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// 写入内存缓冲区，返回 Console 和读取端
    pub fn capture() -> (Self, CaptureBuffer) {
        let buffer = CaptureBuffer::default();
        (Self::new(buffer.clone()), buffer)
    }

    /// 写入并刷新
    pub fn write_str(&self, text: &str) -> io::Result<()> {
        let mut out = self.out.borrow_mut();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    /// `"<pid> <text>\n"`
    pub fn log(&self, text: &str) -> io::Result<()> {
        self.write_str(&format!("{} {}\n", std::process::id(), text))
    }

    pub fn print(&self, text: &str) -> io::Result<()> {
        self.write_str(text)
    }

    pub fn println(&self, text: &str) -> io::Result<()> {
        self.write_str(&format!("{}\n", text))
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdout()
    }
}

/// 内存输出缓冲区
#[derive(Clone, Default)]
pub struct CaptureBuffer {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl CaptureBuffer {
    /// 已写入的内容（按 UTF-8 有损解码）
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
    }

    /// 取出并清空
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.bytes.borrow_mut());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// 脚本可见的输出函数名
pub const LOG: &str = "log";
pub const PRINT: &str = "print";
pub const PRINTLN: &str = "println";

/// 创建输出函数；参数 0 转为字符串，缺省时为 "undefined"
pub fn output_function(name: &'static str, console: Console) -> NativeFunction {
    NativeFunction::new(name, move |_engine, args| {
        let text = args.first().cloned().unwrap_or_default().to_string();
        let result = match name {
            LOG => console.log(&text),
            PRINTLN => console.println(&text),
            _ => console.print(&text),
        };
        result.map_err(|e| HostError::runtime(format!("{}: {}", name, e)))?;
        Ok(Value::Undefined)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_prefixes_pid() {
        let (console, buffer) = Console::capture();
        console.log("started").unwrap();
        assert_eq!(buffer.contents(), format!("{} started\n", std::process::id()));
    }

    #[test]
    fn test_print_and_println() {
        let (console, buffer) = Console::capture();
        console.print("a").unwrap();
        console.print("b").unwrap();
        console.println("c").unwrap();
        assert_eq!(buffer.take(), "abc\n");
        assert_eq!(buffer.contents(), "");
    }
}
