use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

/// 单次等待的上限
pub const MAX_PACING_DELAY: Duration = Duration::from_secs(300);

/// 提交的答案
///
/// 对遍历引擎来说是不透明的，只要求能序列化为 JSON。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Answer {
    /// 将人工输入解析为答案：能解析为整数则为整数，否则原样保留
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => Answer::Integer(n),
            Err(_) => Answer::Text(trimmed.to_string()),
        }
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Answer::Integer(n) => write!(f, "{}", n),
            Answer::Float(x) => write!(f, "{}", x),
            Answer::Text(s) => write!(f, "{}", s),
        }
    }
}

/// 提交载荷
///
/// `url` 是被回答页面的地址，而不是提交地址。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub email: String,
    pub secret: String,
    pub url: String,
    pub answer: Answer,
}

/// 提交响应
///
/// 保留服务端返回的原始 JSON，同时解析出引擎关心的字段，
/// 其余字段忽略。
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResponse {
    pub correct: bool,
    pub next_url: Option<String>,
    pub delay_secs: Option<f64>,
    pub raw: JsonValue,
}

impl SubmissionResponse {
    /// 从服务端返回的 JSON 构建
    pub fn from_json(raw: JsonValue) -> Self {
        let correct = raw.get("correct").and_then(|v| v.as_bool()).unwrap_or(false);
        let next_url = raw
            .get("url")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let delay_secs = raw.get("delay").and_then(|v| v.as_f64());

        Self {
            correct,
            next_url,
            delay_secs,
            raw,
        }
    }

    /// 服务端要求的等待时长
    ///
    /// 只接受正数，超过 [`MAX_PACING_DELAY`] 的按上限处理。
    pub fn pacing_delay(&self) -> Option<Duration> {
        self.delay_secs
            .filter(|d| !d.is_nan() && *d > 0.0)
            .map(|d| {
                Duration::try_from_secs_f64(d)
                    .unwrap_or(MAX_PACING_DELAY)
                    .min(MAX_PACING_DELAY)
            })
    }
}
