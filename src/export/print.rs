//! 打印：把纯文本简历交给宿主打印命令（默认 `lp`）

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::info;

use super::ExportError;

/// 通过 stdin 把文本写入打印命令
pub fn send_to_printer(text: &str, command: &[String]) -> Result<(), ExportError> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| ExportError::Print("未配置打印命令".to_string()))?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ExportError::Print(format!("无法启动 {}: {}", program, e)))?;

    // 先写完再等待，写入失败也要回收子进程
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait()?;

    if !status.success() {
        return Err(ExportError::Print(format!("{} 返回 {}", program, status)));
    }
    written?;

    info!(program = %program, bytes = text.len(), "sent to printer");
    Ok(())
}
