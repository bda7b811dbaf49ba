//! CLI 格式化输出
//!
//! 提供命令行友好的错误显示和解析结果打印。

use std::path::{Path, PathBuf};

use hearth_api::{ErrorDetails, HostError, ToReport};

/// 打印错误及其详情
pub fn print_error(e: &HostError) {
    let report = e.to_report();
    eprintln!("❌ {}", report);

    match &report.details {
        Some(ErrorDetails::Candidates { tried }) => {
            eprintln!("   tried:");
            for candidate in tried {
                eprintln!("     - {}", candidate);
            }
        }
        Some(ErrorDetails::Diagnostic { text }) => eprintln!("   {}", text),
        None => {}
    }
}

/// 打印一次成功解析；`all` 时列出每个候选并标出命中的那个
pub fn print_resolution(requested: &str, resolved: &Path, candidates: &[PathBuf], all: bool) {
    println!("{} -> {}", requested, resolved.display());
    if all {
        for line in candidate_lines(resolved, candidates) {
            println!("{}", line);
        }
    }
}

/// 候选列表：失败的标 `x`，命中的标 `*`，之后未尝试的留空
fn candidate_lines(resolved: &Path, candidates: &[PathBuf]) -> Vec<String> {
    let mut reached = false;
    candidates
        .iter()
        .map(|candidate| {
            let marker = if reached {
                ' '
            } else if candidate == resolved {
                reached = true;
                '*'
            } else {
                'x'
            };
            format!("   {} {}", marker, candidate.display())
        })
        .collect()
}
