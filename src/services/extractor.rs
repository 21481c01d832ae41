//! 内容提取 - 业务能力层
//!
//! 把页面 HTML 转换为可见文本和结构快照。
//! `scraper::Html` 只在函数内部存在，返回值全部是自有数据。

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::models::{DomView, ExtractedContent};

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid link selector"));

static FORM_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("form[action]").expect("valid form selector"));

static AUDIO_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("audio[src]").expect("valid audio selector"));

static ORIGIN_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.origin").expect("valid origin selector"));

/// 不产生可见文本的元素
const HIDDEN_ELEMENTS: [&str; 2] = ["script", "style"];

/// 提取页面文本与结构
///
/// 格式错误的 HTML 会尽量解析出部分内容，不会失败。
pub fn extract(html: &str) -> ExtractedContent {
    let document = Html::parse_document(html);
    ExtractedContent {
        text: visible_text(&document),
        dom: dom_view(&document),
    }
}

/// 可见文本：每个文本节点内部压缩空白，空节点跳过，节点之间换行
fn visible_text(document: &Html) -> String {
    let mut lines = Vec::new();

    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !normalized.is_empty() {
            lines.push(normalized);
        }
    }

    lines.join("\n")
}

fn dom_view(document: &Html) -> DomView {
    let attr_values = |selector: &Selector, attr: &str| -> Vec<String> {
        document
            .select(selector)
            .filter_map(|el| el.value().attr(attr))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    };

    DomView {
        links: attr_values(&LINK_SELECTOR, "href"),
        form_actions: attr_values(&FORM_SELECTOR, "action"),
        audio_sources: attr_values(&AUDIO_SELECTOR, "src"),
        has_origin_marker: document.select(&ORIGIN_SELECTOR).next().is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIZ_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Quiz 3</title><style>body { color: red; }</style></head>
<body>
  <h1>Question   3</h1>
  <p>Download the <a href="/data/values.csv">CSV file</a>.   Cutoff: 10</p>
  <script>document.querySelector(".origin").innerText = location.origin;</script>
  <p>POST to <span class="origin"></span>/submit</p>
  <form action="/submit?step=3"><input name="answer"></form>
  <audio src="clip.opus"></audio>
  <audio src=""></audio>
</body>
</html>"#;

    #[test]
    fn test_strips_script_and_style() {
        let content = extract(QUIZ_PAGE);
        assert!(!content.text.contains("querySelector"));
        assert!(!content.text.contains("color: red"));
        assert!(content.text.contains("Question 3"));
        assert!(content.text.contains("Cutoff: 10"));
    }

    #[test]
    fn test_keeps_token_boundaries() {
        let content = extract(QUIZ_PAGE);
        let flat = content.flat_text();
        assert!(flat.split(' ').any(|t| t == "/submit"));
        assert!(flat.contains("CSV file"));
    }

    #[test]
    fn test_dom_view() {
        let content = extract(QUIZ_PAGE);
        assert_eq!(content.dom.links, vec!["/data/values.csv".to_string()]);
        assert_eq!(content.dom.form_actions, vec!["/submit?step=3".to_string()]);
        assert_eq!(content.dom.audio_sources, vec!["clip.opus".to_string()]);
        assert!(content.dom.has_origin_marker);
    }

    #[test]
    fn test_malformed_markup_degrades() {
        let content = extract("<div><p>Scrape <b>this</div> page<a href='/x?y=1'");
        assert!(content.text.contains("Scrape"));
        assert!(content.text.contains("this"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let first = extract(QUIZ_PAGE);
        let second = extract(QUIZ_PAGE);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_repeated_extraction_classifies_the_same() {
        use crate::error::AppResult;
        use crate::infrastructure::PageFetcher;
        use crate::models::Classification;
        use crate::services::QuestionClassifier;
        use async_trait::async_trait;
        use std::sync::Arc;

        struct QuizPage;

        #[async_trait]
        impl PageFetcher for QuizPage {
            async fn fetch(&self, _url: &str) -> AppResult<String> {
                Ok(QUIZ_PAGE.to_string())
            }
        }

        let classifier = QuestionClassifier::new(Arc::new(QuizPage), "https://default.example.net");
        let url = "https://quiz.example.com/quiz/3";
        let first = classifier.classify(&extract(QUIZ_PAGE), url, "a@b.c").await;
        let second = classifier.classify(&extract(QUIZ_PAGE), url, "a@b.c").await;

        assert_eq!(first, second);
        assert_eq!(
            first,
            Classification::Audio {
                source_url: "https://quiz.example.com/quiz/clip.opus".into()
            }
        );
    }
}
