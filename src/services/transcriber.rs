//! 听写服务 - 业务能力层
//!
//! 把音频文件转换为听到的内容。遍历引擎只依赖 [`Transcriber`]，
//! 可以替换为自动语音识别实现而不影响其他部分。

use std::io::{BufRead, Write};
use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::error::{AppError, AppResult};

/// 听写能力
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// 返回音频中听到的内容（原始文本）
    async fn transcribe(&self, audio_path: &Path) -> AppResult<String>;
}

/// 在终端等待人工输入
///
/// 会阻塞整个求解过程直到输入完成，没有超时。
pub struct StdinTranscriber;

#[async_trait]
impl Transcriber for StdinTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> AppResult<String> {
        info!(
            "[音频题] 请播放 {} 并输入听到的数字（人工步骤）",
            audio_path.display()
        );

        let line = tokio::task::spawn_blocking(|| -> std::io::Result<String> {
            let mut stdout = std::io::stdout();
            write!(stdout, "Enter number from audio: ")?;
            stdout.flush()?;
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        })
        .await
        .map_err(|e| AppError::Other(format!("读取输入的任务失败: {}", e)))??;

        Ok(line.trim().to_string())
    }
}

/// 无人值守模式：拒绝听写
pub struct UnattendedTranscriber;

#[async_trait]
impl Transcriber for UnattendedTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> AppResult<String> {
        Err(AppError::TranscriptionUnavailable)
    }
}
