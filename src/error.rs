use std::fmt;

/// 应用程序错误类型
///
/// 所有错误都会逐层返回给调用方（最终由 HTTP 入口转换为结构化响应），
/// 任何一种都不会导致进程退出。
#[derive(Debug)]
pub enum AppError {
    /// 页面抓取失败（渲染与直接请求均失败）
    FetchFailure { url: String, reason: String },
    /// 所有提交地址规则都未命中
    SubmitTargetNotFound { url: String },
    /// 提交响应不是合法 JSON
    InvalidResponseBody { endpoint: String, body: String },
    /// 服务端未配置密钥（只在入口处产生，求解开始前即拒绝）
    MisconfiguredSecret,
    /// 抓取题未能提取到验证码
    ScrapeExtractionFailure { url: String, reason: String },
    /// 链路回到了已访问过的页面
    CycleDetected { url: String },
    /// 超过最大访问页数
    HopLimitExceeded { limit: usize },
    /// 当前运行模式无法进行人工听写
    TranscriptionUnavailable,
    /// 资源下载失败（CSV / 音频）
    Download { url: String, reason: String },
    /// 表格解析失败
    Tabular { reason: String },
    /// 文件读写错误
    Io(std::io::Error),
    /// 其他错误
    Other(String),
}

impl AppError {
    /// 稳定的错误类别名称，用于对外的错误响应
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::FetchFailure { .. } => "fetch_failure",
            AppError::SubmitTargetNotFound { .. } => "submit_target_not_found",
            AppError::InvalidResponseBody { .. } => "invalid_response_body",
            AppError::MisconfiguredSecret => "misconfigured_secret",
            AppError::ScrapeExtractionFailure { .. } => "scrape_extraction_failure",
            AppError::CycleDetected { .. } => "cycle_detected",
            AppError::HopLimitExceeded { .. } => "hop_limit_exceeded",
            AppError::TranscriptionUnavailable => "transcription_unavailable",
            AppError::Download { .. } => "download_failure",
            AppError::Tabular { .. } => "tabular_failure",
            AppError::Io(_) => "io",
            AppError::Other(_) => "other",
        }
    }

    /// 创建页面抓取错误
    pub fn fetch_failed(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        AppError::FetchFailure {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// 创建资源下载错误
    pub fn download_failed(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        AppError::Download {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// 创建抓取题提取错误
    pub fn scrape_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::ScrapeExtractionFailure {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::FetchFailure { url, reason } => {
                write!(f, "页面抓取失败 ({}): {}", url, reason)
            }
            AppError::SubmitTargetNotFound { url } => {
                write!(f, "未找到提交地址: {}", url)
            }
            AppError::InvalidResponseBody { endpoint, body } => {
                write!(f, "提交响应不是合法 JSON ({}): {}", endpoint, body)
            }
            AppError::MisconfiguredSecret => write!(f, "服务端未配置密钥"),
            AppError::ScrapeExtractionFailure { url, reason } => {
                write!(f, "抓取题提取失败 ({}): {}", url, reason)
            }
            AppError::CycleDetected { url } => {
                write!(f, "检测到循环链路，页面已访问过: {}", url)
            }
            AppError::HopLimitExceeded { limit } => {
                write!(f, "超过最大访问页数: {}", limit)
            }
            AppError::TranscriptionUnavailable => {
                write!(f, "音频题需要人工听写，当前运行模式不允许交互输入")
            }
            AppError::Download { url, reason } => {
                write!(f, "资源下载失败 ({}): {}", url, reason)
            }
            AppError::Tabular { reason } => write!(f, "表格解析失败: {}", reason),
            AppError::Io(e) => write!(f, "文件错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(e) => Some(e),
            _ => None,
        }
    }
}

// ========== 从常见错误类型转换 ==========

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("JSON 序列化失败: {}", err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Tabular {
            reason: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        AppError::Download {
            url,
            reason: err.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(
            AppError::SubmitTargetNotFound { url: "u".into() }.kind(),
            "submit_target_not_found"
        );
        assert_eq!(AppError::CycleDetected { url: "u".into() }.kind(), "cycle_detected");
        assert_eq!(AppError::MisconfiguredSecret.kind(), "misconfigured_secret");
    }

    #[test]
    fn test_display_contains_context() {
        let err = AppError::fetch_failed("https://quiz.example/a", "timeout");
        let msg = err.to_string();
        assert!(msg.contains("https://quiz.example/a"));
        assert!(msg.contains("timeout"));
    }
}
