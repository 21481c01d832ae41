//! 单页处理流程 - 流程层
//!
//! 核心职责：定义"一个测验页"的完整处理流程
//!
//! 流程顺序：
//! 1. 抓取页面 → 提取文本与 DOM 信息
//! 2. 识别题型
//! 3. UV 题：直接构造载荷返回，不提交
//! 4. 其他题型：计算答案 → 解析提交地址 → 提交 → 解析响应

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{HttpTransport, PageFetcher};
use crate::models::{Classification, SubmissionPayload, SubmissionResponse};
use crate::services::{extractor, submit_target, AnswerService, QuestionClassifier, Transcriber};
use crate::utils::logging::truncate_text;
use crate::workflow::quiz_ctx::QuizCtx;

/// 单页处理结果
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// UV 页：载荷已构造，调用方原样返回，不提交
    UvPayload(SubmissionPayload),
    /// 已提交并收到合法 JSON 响应
    Submitted {
        endpoint: String,
        response: SubmissionResponse,
    },
}

/// 单页处理流程
///
/// - 编排单个页面的处理
/// - 不关心链路（下一页、循环、延迟由编排层处理）
/// - 只依赖业务能力（services）和基础设施
pub struct QuizFlow {
    fetcher: Arc<dyn PageFetcher>,
    transport: Arc<dyn HttpTransport>,
    classifier: QuestionClassifier,
    answers: AnswerService,
    verbose_logging: bool,
}

impl QuizFlow {
    /// 创建新的单页处理流程
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        transport: Arc<dyn HttpTransport>,
        transcriber: Arc<dyn Transcriber>,
        config: &Config,
    ) -> Self {
        Self {
            classifier: QuestionClassifier::new(fetcher.clone(), config.uv_default_origin.clone()),
            answers: AnswerService::new(
                fetcher.clone(),
                transport.clone(),
                transcriber,
                config.audio_file.clone(),
            ),
            fetcher,
            transport,
            verbose_logging: config.verbose_logging,
        }
    }

    pub async fn run(&self, ctx: &QuizCtx) -> AppResult<StepOutcome> {
        info!("{} 📄 抓取页面: {}", ctx, ctx.quiz_url);
        let html = self.fetcher.fetch(&ctx.quiz_url).await?;

        let content = extractor::extract(&html);
        self.log_content(ctx, &content.text);

        let classification = self
            .classifier
            .classify(&content, &ctx.quiz_url, &ctx.email)
            .await;
        info!("{} 🏷️ 题型: {}", ctx, classification.kind());

        let answer = self
            .answers
            .answer(&classification, &content, &ctx.quiz_url)
            .await?;

        let payload = SubmissionPayload {
            email: ctx.email.clone(),
            secret: ctx.secret.clone(),
            url: ctx.quiz_url.clone(),
            answer,
        };

        if matches!(classification, Classification::UvInstruction { .. }) {
            info!("{} ⏹️ UV 页面，返回载荷，不提交", ctx);
            return Ok(StepOutcome::UvPayload(payload));
        }

        let endpoint = submit_target::resolve_submit_url(&content, &ctx.quiz_url)?;
        info!("{} 📤 提交答案 {} → {}", ctx, payload.answer, endpoint);

        let response = self.submit(&endpoint, &payload).await?;

        Ok(StepOutcome::Submitted { endpoint, response })
    }

    /// 提交载荷并解析响应体
    ///
    /// 响应体必须是合法 JSON，状态码只记录不检查
    async fn submit(
        &self,
        endpoint: &str,
        payload: &SubmissionPayload,
    ) -> AppResult<SubmissionResponse> {
        let body = serde_json::to_value(payload)?;
        let posted = self.transport.post_json(endpoint, &body).await?;
        debug!("提交响应状态码: {}", posted.status);

        let raw: JsonValue =
            serde_json::from_str(&posted.body).map_err(|_| AppError::InvalidResponseBody {
                endpoint: endpoint.to_string(),
                body: truncate_text(&posted.body, 200),
            })?;

        Ok(SubmissionResponse::from_json(raw))
    }

    fn log_content(&self, ctx: &QuizCtx, text: &str) {
        if self.verbose_logging {
            info!("{} 页面文本:\n{}", ctx, text);
        } else {
            info!("{} 页面文本: {}", ctx, truncate_text(&text.replace('\n', " "), 80));
        }
    }
}
