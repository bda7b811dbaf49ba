//! 脚本文件解析器
//!
//! 将 include 的路径解析为文件内容。
//!
//! # 解析规则
//! - 先按原样尝试路径（相对路径相对于进程当前目录）
//! - 若失败且路径不是绝对路径，依次尝试 `/usr/local/hearth/<path>`、`/usr/share/hearth/<path>`
//! - 任意一次读取失败（不存在、无权限、非 UTF-8）都视为该候选失败，继续下一个

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use hearth_vfs::VirtualFileSystem;
use tracing::{debug, trace};

use crate::error::ResolveError;

/// 固定的安装前缀，按顺序尝试
pub const SEARCH_PREFIXES: [&str; 2] = ["/usr/local/hearth/", "/usr/share/hearth/"];

/// 解析结果（临时对象，由 include 立即消费）
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSource {
    /// 脚本请求的路径（原样）
    pub requested: String,
    /// 实际读取成功的候选路径
    pub path: PathBuf,
    /// 缓存键：候选路径的规范形式
    pub key: PathBuf,
    /// 文件内容
    pub text: String,
    /// 最后修改时间（后端不支持时为 None）
    pub modified: Option<SystemTime>,
}

/// 文件解析器
#[derive(Clone)]
pub struct FileResolver {
    vfs: Arc<dyn VirtualFileSystem>,
}

impl FileResolver {
    pub fn new(vfs: Arc<dyn VirtualFileSystem>) -> Self {
        Self { vfs }
    }

    /// 获取搜索路径列表
    pub fn candidates(&self, path: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(path)];
        if !Path::new(path).is_absolute() {
            paths.extend(SEARCH_PREFIXES.iter().map(|prefix| Path::new(prefix).join(path)));
        }
        paths
    }

    /// 解析并读取文件
    pub fn resolve(&self, path: &str) -> Result<ResolvedSource, ResolveError> {
        let candidates = self.candidates(path);

        for candidate in &candidates {
            // mtime 必须先于内容读取，否则中途的修改会被记在旧内容上
            let modified = self.vfs.modified(candidate).ok();
            match self.vfs.read_to_string(candidate) {
                Ok(text) => {
                    let key = self
                        .vfs
                        .canonicalize(candidate)
                        .unwrap_or_else(|_| candidate.clone());
                    debug!(
                        target: "hearth::resolver",
                        requested = path,
                        resolved = %candidate.display(),
                        "resolved script"
                    );
                    return Ok(ResolvedSource {
                        requested: path.to_string(),
                        path: candidate.clone(),
                        key,
                        text,
                        modified,
                    });
                }
                Err(err) => {
                    trace!(
                        target: "hearth::resolver",
                        candidate = %candidate.display(),
                        error = %err,
                        "candidate failed"
                    );
                }
            }
        }

        debug!(target: "hearth::resolver", requested = path, "script not found");
        Err(ResolveError {
            path: path.to_string(),
            tried: candidates,
        })
    }
}
