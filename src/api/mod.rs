//! API 模块
//!
//! 对外暴露的 HTTP 入口

pub mod trigger;

pub use trigger::{router, TriggerError, TriggerState};
