//! 题型识别 - 业务能力层
//!
//! 规则按 [`CLASSIFICATION_ORDER`] 依次判断，第一个命中的规则决定题型，
//! 之后的规则不再执行；全部未命中时为兜底题。
//!
//! 音频规则需要重新抓取页面检查 `<audio>` 元素，因此排在纯文本的
//! UV / 抓取规则之后、表格规则之前。

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};
use url::Url;

use crate::infrastructure::PageFetcher;
use crate::models::{Classification, ExtractedContent};
use crate::services::extractor;
use crate::services::submit_target::origin_of;

static UV_PATH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/uv\b").expect("valid uv path regex"));

static UV_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\buv\b.*project2").expect("valid uv text regex"));

static UV_JSON_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[^\s"']+/project2/uv\.json\?email=[^\s"']+"#).expect("valid uv json regex")
});

static ABSOLUTE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s"']+"#).expect("valid absolute url regex"));

static SCRAPE_DATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"/demo-scrape-data\?[^\s"']+"#).expect("valid scrape data regex"));

static RELATIVE_QUERY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"/[a-zA-Z0-9_\-./]+\?[^\s"']+"#).expect("valid relative path regex")
});

static CUTOFF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Cutoff[:\s]+(\d+)").expect("valid cutoff regex"));

const UV_STAGE_MARKER: &str = "project2-uv";
const SCRAPE_DATA_MARKER: &str = "/demo-scrape-data";
const UV_JSON_SUFFIX: &str = "/project2/uv.json?email=";

/// 分类规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierRule {
    UvInstruction,
    Scrape,
    Audio,
    Tabular,
}

/// 规则判断顺序
pub const CLASSIFICATION_ORDER: [ClassifierRule; 4] = [
    ClassifierRule::UvInstruction,
    ClassifierRule::Scrape,
    ClassifierRule::Audio,
    ClassifierRule::Tabular,
];

/// 判断地址是否是 UV 页面
pub fn is_uv_url(url: &str) -> bool {
    url.contains(UV_STAGE_MARKER) || UV_PATH_RE.is_match(url)
}

/// 题型识别服务
pub struct QuestionClassifier {
    fetcher: Arc<dyn PageFetcher>,
    uv_default_origin: String,
}

impl QuestionClassifier {
    pub fn new(fetcher: Arc<dyn PageFetcher>, uv_default_origin: impl Into<String>) -> Self {
        Self {
            fetcher,
            uv_default_origin: uv_default_origin.into(),
        }
    }

    /// 识别题型
    ///
    /// # 参数
    /// - `content`: 当前页面提取结果
    /// - `quiz_url`: 当前页面地址
    /// - `email`: 本次求解的邮箱（用于构造 UV 地址）
    pub async fn classify(
        &self,
        content: &ExtractedContent,
        quiz_url: &str,
        email: &str,
    ) -> Classification {
        for rule in CLASSIFICATION_ORDER {
            let matched = match rule {
                ClassifierRule::UvInstruction => self.match_uv(content, quiz_url, email),
                ClassifierRule::Scrape => match_scrape(content),
                ClassifierRule::Audio => self.match_audio(quiz_url).await,
                ClassifierRule::Tabular => match_tabular(content),
            };
            if let Some(classification) = matched {
                debug!("题型规则 {:?} 命中", rule);
                return classification;
            }
        }
        Classification::Fallback
    }

    fn match_uv(
        &self,
        content: &ExtractedContent,
        quiz_url: &str,
        email: &str,
    ) -> Option<Classification> {
        if !is_uv_url(quiz_url) && !UV_TEXT_RE.is_match(&content.text) {
            return None;
        }
        Some(Classification::UvInstruction {
            uv_url: self.uv_json_url(&content.text, email),
        })
    }

    /// 优先使用文本中现成的 uv.json 地址，其次使用文本中第一个绝对地址的域名，
    /// 最后使用默认域名
    fn uv_json_url(&self, text: &str, email: &str) -> String {
        if let Some(m) = UV_JSON_URL_RE.find(text) {
            return m.as_str().to_string();
        }
        let origin = ABSOLUTE_URL_RE
            .find(text)
            .and_then(|m| Url::parse(m.as_str()).ok())
            .and_then(|u| origin_of(&u))
            .unwrap_or_else(|| self.uv_default_origin.trim_end_matches('/').to_string());
        format!("{}{}{}", origin, UV_JSON_SUFFIX, email)
    }

    /// 重新抓取页面，查找带 `src` 的 `<audio>`
    async fn match_audio(&self, quiz_url: &str) -> Option<Classification> {
        let html = match self.fetcher.fetch(quiz_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("音频检测时重新抓取失败，跳过音频规则: {}", e);
                return None;
            }
        };
        let src = extractor::extract(&html).dom.audio_sources.into_iter().next()?;
        let source_url = Url::parse(quiz_url).ok()?.join(&src).ok()?;
        Some(Classification::Audio {
            source_url: source_url.to_string(),
        })
    }
}

fn match_scrape(content: &ExtractedContent) -> Option<Classification> {
    let text = &content.text;
    if !text.contains("Scrape") && !text.contains(SCRAPE_DATA_MARKER) {
        return None;
    }
    let relative_path = SCRAPE_DATA_RE
        .find(text)
        .or_else(|| RELATIVE_QUERY_RE.find(text))
        .map(|m| m.as_str().to_string());
    Some(Classification::Scrape { relative_path })
}

fn match_tabular(content: &ExtractedContent) -> Option<Classification> {
    if !content.text.contains("CSV") {
        return None;
    }
    Some(Classification::Tabular {
        cutoff: extract_cutoff(&content.text),
    })
}

/// 提取 `Cutoff: N`（不区分大小写）
pub fn extract_cutoff(text: &str) -> Option<f64> {
    CUTOFF_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
