//! 答题策略 - 业务能力层
//!
//! 每种题型一个策略，[`AnswerService`] 根据分类结果分派。

pub mod audio;
pub mod scrape;
pub mod tabular;
pub mod uv;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::{HttpTransport, PageFetcher};
use crate::models::{Answer, Classification, ExtractedContent};
use crate::services::transcriber::Transcriber;

/// 无法识别题型时提交的固定答案
pub const FALLBACK_ANSWER: i64 = 123;

/// 答题服务
///
/// 职责：
/// - 根据分类结果选择策略并计算答案
/// - 只处理单个页面
/// - 不关心提交地址和链路
pub struct AnswerService {
    fetcher: Arc<dyn PageFetcher>,
    transport: Arc<dyn HttpTransport>,
    transcriber: Arc<dyn Transcriber>,
    audio_file: PathBuf,
}

impl AnswerService {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        transport: Arc<dyn HttpTransport>,
        transcriber: Arc<dyn Transcriber>,
        audio_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            transport,
            transcriber,
            audio_file: audio_file.into(),
        }
    }

    /// 计算答案
    ///
    /// # 参数
    /// - `classification`: 分类结果
    /// - `content`: 当前页面提取结果
    /// - `quiz_url`: 当前页面地址
    pub async fn answer(
        &self,
        classification: &Classification,
        content: &ExtractedContent,
        quiz_url: &str,
    ) -> AppResult<Answer> {
        match classification {
            Classification::UvInstruction { uv_url } => {
                let command = uv::command(uv_url);
                info!("[UV] 命令: {}", command);
                Ok(Answer::Text(command))
            }
            Classification::Scrape { relative_path } => {
                scrape::solve(self.fetcher.as_ref(), quiz_url, relative_path.as_deref()).await
            }
            Classification::Audio { source_url } => {
                audio::solve(
                    self.transport.as_ref(),
                    self.transcriber.as_ref(),
                    source_url,
                    &self.audio_file,
                )
                .await
            }
            Classification::Tabular { cutoff } => {
                tabular::solve(self.transport.as_ref(), content, quiz_url, *cutoff).await
            }
            Classification::Fallback => {
                info!("[兜底] 返回固定答案 {}", FALLBACK_ANSWER);
                Ok(Answer::Integer(FALLBACK_ANSWER))
            }
        }
    }
}
