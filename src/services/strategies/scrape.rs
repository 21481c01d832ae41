//! 抓取题
//!
//! 访问页面给出的数据页，从中挑出验证码。

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};
use url::Url;

use crate::error::{AppError, AppResult};
use crate::infrastructure::PageFetcher;
use crate::models::Answer;
use crate::services::extractor;

static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\b").expect("valid digit regex"));

/// 关键词后 30 个非数字字符以内的数字
static KEYWORD_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:code|secret|secret code|verification)\D{0,30}(\d{2,})")
        .expect("valid keyword code regex")
});

/// 求解抓取题
///
/// # 参数
/// - `fetcher`: 页面抓取器（数据页同样可能需要渲染）
/// - `quiz_url`: 当前题目页面地址，用于解析相对路径
/// - `relative_path`: 分类时找到的数据页路径
pub async fn solve(
    fetcher: &dyn PageFetcher,
    quiz_url: &str,
    relative_path: Option<&str>,
) -> AppResult<Answer> {
    let relative_path =
        relative_path.ok_or_else(|| AppError::scrape_failed(quiz_url, "页面中没有数据页路径"))?;

    let data_url = Url::parse(quiz_url)
        .and_then(|base| base.join(relative_path))
        .map_err(|e| AppError::scrape_failed(quiz_url, format!("无法解析数据页地址: {}", e)))?;

    info!("[抓取题] 正在抓取数据页: {}", data_url);
    let html = fetcher.fetch(data_url.as_str()).await?;
    let text = extractor::extract(&html).flat_text();
    debug!("[抓取题] 数据页文本: {}", text);

    let code = select_code(&text)
        .ok_or_else(|| AppError::scrape_failed(data_url.as_str(), "数据页中没有数字"))?;

    info!("[抓取题] 提取到验证码: {}", code);
    Ok(Answer::Text(code))
}

/// 从文本中挑选验证码
///
/// 关键词附近的数字优先；否则取位数最多的数字（位数相同取最先出现的）。
/// 返回原始数字串，不做任何格式化。
pub fn select_code(text: &str) -> Option<String> {
    let runs: Vec<&str> = DIGIT_RUN_RE.find_iter(text).map(|m| m.as_str()).collect();
    if runs.is_empty() {
        return None;
    }

    if let Some(code) = KEYWORD_CODE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
    {
        return Some(code.to_string());
    }

    let longest = runs
        .into_iter()
        .fold(None::<&str>, |best, run| match best {
            Some(b) if b.len() >= run.len() => Some(b),
            _ => Some(run),
        })?;
    Some(longest.to_string())
}
