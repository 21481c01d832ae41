//! 音频题
//!
//! 下载音频保存到本地固定文件名（不会自动删除），再交给听写服务得到数字。
//! 默认的听写服务需要人工在终端输入，无人值守运行时必须关闭
//! `interactive_audio`，此时音频题会以错误结束。

use std::path::Path;

use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::HttpTransport;
use crate::models::Answer;
use crate::services::transcriber::Transcriber;

/// 求解音频题
///
/// # 参数
/// - `source_url`: 音频绝对地址
/// - `audio_file`: 本地保存路径
pub async fn solve(
    transport: &dyn HttpTransport,
    transcriber: &dyn Transcriber,
    source_url: &str,
    audio_file: &Path,
) -> AppResult<Answer> {
    info!("[音频题] 正在下载: {}", source_url);
    let bytes = transport.get_bytes(source_url).await?;
    tokio::fs::write(audio_file, &bytes).await?;
    info!("[音频题] 已保存到本地文件: {}", audio_file.display());

    let heard = transcriber.transcribe(audio_file).await?;
    let answer = Answer::from_input(&heard);
    info!("[音频题] 听写结果: {}", answer);
    Ok(answer)
}
