//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `server` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 持有浏览器、HTTP 传输等资源
//! - 启动 HTTP 触发入口
//!
//! ### `chain_runner` - 测验链求解器
//! - 显式循环遍历测验链
//! - 已访问集合、页数上限、服务端等待时长
//! - 写求解记录
//!
//! ## 层次关系
//!
//! ```text
//! server (HTTP 入口，一次一条链)
//!     ↓
//! chain_runner (处理一条链)
//!     ↓
//! workflow::QuizFlow (处理单个页面)
//!     ↓
//! services (能力层：提取 / 识别 / 答题 / 提交地址)
//!     ↓
//! infrastructure (基础设施：PageFetcher / HttpTransport)
//! ```

pub mod chain_runner;
pub mod server;

pub use chain_runner::{ChainOutcome, ChainRunner, Terminal};
pub use server::App;
