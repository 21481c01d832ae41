//! # Quiz Solver
//!
//! 自动求解测验链的 HTTP 服务：抓取页面、识别题型、计算答案、
//! 提交并沿着服务端给出的下一页继续，直到链路终止。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 持有唯一的 Browser，只暴露渲染能力
//! - `infrastructure/` - `PageFetcher`（渲染优先、HTTP 兜底）与 `HttpTransport`
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个页面
//! - `extractor` / `submit_target` - 文本提取与提交地址解析
//! - `QuestionClassifier` - 题型识别
//! - `AnswerService` - 按题型计算答案
//! - `RunJournal` - 写求解记录
//!
//! ### ③ 流程层（Workflow）
//! - `QuizCtx` - 上下文封装（凭据 + 当前页面）
//! - `QuizFlow` - 单页流程（抓取 → 识别 → 答题 → 提交）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/chain_runner` - 遍历整条测验链
//! - `orchestrator/server` - 组装组件并启动 HTTP 入口（`api/`）

pub mod api;
pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Answer, Classification, SubmissionPayload, SubmissionResponse};
pub use orchestrator::{App, ChainOutcome, ChainRunner, Terminal};
pub use workflow::{QuizCtx, QuizFlow, StepOutcome};
