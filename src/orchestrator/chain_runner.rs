//! 测验链求解 - 编排层
//!
//! 以显式循环遍历测验链：每页交给 [`QuizFlow`] 处理，
//! 根据提交响应决定继续、停止，或在 UV 页前停下。
//! 已访问集合与最大页数保证任何链路都会结束。

use std::collections::HashSet;

use serde_json::Value as JsonValue;
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::models::SubmissionResponse;
use crate::services::classifier::is_uv_url;
use crate::services::RunJournal;
use crate::utils::logging::{log_chain_complete, log_chain_start};
use crate::workflow::{QuizCtx, QuizFlow, StepOutcome};

/// 链路终止状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// 回答正确且没有下一页
    Success,
    /// 当前页是 UV 页，返回构造好的载荷
    Uv,
    /// 响应给出的下一页是 UV 页，原样返回该响应
    UvByResponse,
    /// 回答错误（没有下一页可走）
    NoNext,
}

impl Terminal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Terminal::Success => "success",
            Terminal::Uv => "uv",
            Terminal::UvByResponse => "uv_by_response",
            Terminal::NoNext => "no_next",
        }
    }
}

/// 一次求解的最终结果
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    pub terminal: Terminal,
    /// 实际处理的页面数
    pub hops: usize,
    /// 返回给调用方的 JSON（UV 载荷或最后一次提交响应）
    pub result: JsonValue,
}

/// 根据提交响应得到的下一步动作
enum Next {
    Stop(Terminal),
    Visit(String),
}

fn decide(response: &SubmissionResponse) -> Next {
    match (&response.next_url, response.correct) {
        (Some(url), true) if is_uv_url(url) => Next::Stop(Terminal::UvByResponse),
        (Some(url), true) => Next::Visit(url.clone()),
        (None, true) => Next::Stop(Terminal::Success),
        (_, false) => Next::Stop(Terminal::NoNext),
    }
}

/// 测验链求解器
///
/// 职责：
/// - 维护已访问集合与页数上限
/// - 遵守服务端要求的等待时长
/// - 每条链结束后写求解记录
pub struct ChainRunner {
    flow: QuizFlow,
    journal: Option<RunJournal>,
    max_hops: usize,
}

impl ChainRunner {
    pub fn new(flow: QuizFlow, max_hops: usize) -> Self {
        Self {
            flow,
            journal: None,
            max_hops,
        }
    }

    /// 每条链结束后追加求解记录
    pub fn with_journal(mut self, journal: RunJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// 从起始页面开始求解整条测验链
    ///
    /// # 参数
    /// - `email`: 求解邮箱
    /// - `secret`: 共享密钥（随每次提交发送）
    /// - `start_url`: 起始页面
    pub async fn solve(&self, email: &str, secret: &str, start_url: &str) -> AppResult<ChainOutcome> {
        log_chain_start(email, start_url);

        let mut hops = 0;
        let result = self.walk(email, secret, start_url, &mut hops).await;

        let outcome_label = match &result {
            Ok(outcome) => outcome.terminal.as_str(),
            Err(e) => {
                error!("❌ 测验链失败 (第 {} 页): {}", hops, e);
                e.kind()
            }
        };
        log_chain_complete(hops, outcome_label);
        if let Some(journal) = &self.journal {
            journal.record(email, start_url, outcome_label, hops);
        }

        result
    }

    async fn walk(
        &self,
        email: &str,
        secret: &str,
        start_url: &str,
        hops: &mut usize,
    ) -> AppResult<ChainOutcome> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut ctx = QuizCtx::new(email.to_string(), secret.to_string(), start_url.to_string(), 1);

        loop {
            if *hops >= self.max_hops {
                return Err(AppError::HopLimitExceeded {
                    limit: self.max_hops,
                });
            }
            if !visited.insert(ctx.quiz_url.clone()) {
                return Err(AppError::CycleDetected {
                    url: ctx.quiz_url.clone(),
                });
            }
            *hops += 1;

            let response = match self.flow.run(&ctx).await? {
                StepOutcome::UvPayload(payload) => {
                    return Ok(ChainOutcome {
                        terminal: Terminal::Uv,
                        hops: *hops,
                        result: serde_json::to_value(payload)?,
                    });
                }
                StepOutcome::Submitted { endpoint, response } => {
                    info!(
                        "{} 📨 {} 返回: correct={}, next={:?}",
                        ctx, endpoint, response.correct, response.next_url
                    );
                    response
                }
            };

            if let Some(delay) = response.pacing_delay() {
                info!("{} ⏳ 服务端要求等待 {:.2} 秒", ctx, delay.as_secs_f64());
                tokio::time::sleep(delay).await;
            }

            match decide(&response) {
                Next::Visit(url) => {
                    info!("{} ➡️ 下一页: {}", ctx, url);
                    ctx = ctx.next(url);
                }
                Next::Stop(terminal) => {
                    if terminal == Terminal::UvByResponse {
                        info!("{} ⏹️ 下一页是 UV 页，停止并返回当前响应", ctx);
                    }
                    return Ok(ChainOutcome {
                        terminal,
                        hops: *hops,
                        result: response.raw,
                    });
                }
            }
        }
    }
}
