//! 提交地址解析 - 业务能力层
//!
//! 按固定优先级依次尝试，第一个命中的规则生效：
//! 1. 文本中完整的 `https://…/submit`
//! 2. 绝对地址 token 后紧跟 `/submit` token，两者拼接
//! 3. 文本中任意位置出现 `/submit`，使用页面域名拼接
//! 4. 链接或表单的目标包含 `/submit`，相对页面地址解析
//! 5. 页面存在动态填充域名的标记元素，使用页面域名拼接

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::models::ExtractedContent;

static ABSOLUTE_SUBMIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s"']+/submit\b"#).expect("valid submit regex"));

const SUBMIT_PATH: &str = "/submit";

/// 解析提交地址
///
/// # 参数
/// - `content`: 当前页面的提取结果
/// - `base_url`: 当前页面地址
pub fn resolve_submit_url(content: &ExtractedContent, base_url: &str) -> AppResult<String> {
    let flat = content.flat_text();
    let base = Url::parse(base_url).ok();

    // 1) 完整的提交地址
    if let Some(m) = ABSOLUTE_SUBMIT_RE.find(&flat) {
        debug!("提交地址命中规则 1: {}", m.as_str());
        return Ok(m.as_str().to_string());
    }

    // 2) 域名 token + "/submit" token
    let tokens: Vec<&str> = flat.split_whitespace().collect();
    for pair in tokens.windows(2) {
        let (host, next) = (pair[0], pair[1]);
        if is_absolute(host) && next.starts_with(SUBMIT_PATH) {
            let joined = format!("{}{}", host.trim_end_matches('/'), SUBMIT_PATH);
            debug!("提交地址命中规则 2: {}", joined);
            return Ok(joined);
        }
    }

    // 3) 文本中出现 "/submit"，拼接页面域名
    if flat.contains(SUBMIT_PATH) {
        if let Some(origin) = base.as_ref().and_then(origin_of) {
            debug!("提交地址命中规则 3: {}", origin);
            return Ok(format!("{}{}", origin, SUBMIT_PATH));
        }
    }

    // 4) 链接或表单
    if let Some(base) = base.as_ref() {
        let target = content
            .dom
            .links
            .iter()
            .find(|href| href.contains(SUBMIT_PATH))
            .or_else(|| {
                content
                    .dom
                    .form_actions
                    .iter()
                    .find(|action| action.contains(SUBMIT_PATH))
            });
        if let Some(resolved) = target.and_then(|t| base.join(t).ok()) {
            debug!("提交地址命中规则 4: {}", resolved);
            return Ok(resolved.to_string());
        }
    }

    // 5) 域名由脚本动态写入
    if content.dom.has_origin_marker {
        if let Some(origin) = base.as_ref().and_then(origin_of) {
            debug!("提交地址命中规则 5: {}", origin);
            return Ok(format!("{}{}", origin, SUBMIT_PATH));
        }
    }

    Err(AppError::SubmitTargetNotFound {
        url: base_url.to_string(),
    })
}

fn is_absolute(token: &str) -> bool {
    token.starts_with("https://") || token.starts_with("http://")
}

/// `scheme://host[:port]`，不透明地址返回 `None`
pub fn origin_of(url: &Url) -> Option<String> {
    let origin = url.origin();
    origin
        .is_tuple()
        .then(|| origin.ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DomView;

    const BASE: &str = "https://quiz.example.com/demo/page-2?email=a@b.c";

    fn content(text: &str, dom: DomView) -> ExtractedContent {
        ExtractedContent {
            text: text.to_string(),
            dom,
        }
    }

    #[test]
    fn test_absolute_url_wins_over_bare_path() {
        let c = content(
            "Post your answer to /submit\nor https://judge.example.org/api/submit with JSON",
            DomView::default(),
        );
        assert_eq!(
            resolve_submit_url(&c, BASE).unwrap(),
            "https://judge.example.org/api/submit"
        );
    }

    #[test]
    fn test_host_token_followed_by_submit_token() {
        let c = content("POST to\nhttps://judge.example.org\n/submit", DomView::default());
        assert_eq!(
            resolve_submit_url(&c, BASE).unwrap(),
            "https://judge.example.org/submit"
        );
    }

    #[test]
    fn test_bare_submit_uses_page_origin() {
        let c = content("Send JSON to /submit please", DomView::default());
        assert_eq!(
            resolve_submit_url(&c, BASE).unwrap(),
            "https://quiz.example.com/submit"
        );
    }

    #[test]
    fn test_origin_keeps_port() {
        let c = content("Send JSON to /submit please", DomView::default());
        assert_eq!(
            resolve_submit_url(&c, "http://127.0.0.1:8080/q/1").unwrap(),
            "http://127.0.0.1:8080/submit"
        );
    }

    #[test]
    fn test_link_then_form() {
        let dom = DomView {
            links: vec!["/about".into(), "answers/submit-here".into()],
            form_actions: vec!["/other/submit".into()],
            ..Default::default()
        };
        let c = content("Use the form below", dom);
        assert_eq!(
            resolve_submit_url(&c, BASE).unwrap(),
            "https://quiz.example.com/demo/answers/submit-here"
        );

        let dom = DomView {
            form_actions: vec!["/other/submit".into()],
            ..Default::default()
        };
        let c = content("Use the form below", dom);
        assert_eq!(
            resolve_submit_url(&c, BASE).unwrap(),
            "https://quiz.example.com/other/submit"
        );
    }

    #[test]
    fn test_origin_marker() {
        let dom = DomView {
            has_origin_marker: true,
            ..Default::default()
        };
        let c = content("Post the answer to this origin", dom);
        assert_eq!(
            resolve_submit_url(&c, BASE).unwrap(),
            "https://quiz.example.com/submit"
        );
    }

    #[test]
    fn test_not_found() {
        let c = content("No instructions here", DomView::default());
        let err = resolve_submit_url(&c, BASE).unwrap_err();
        assert_eq!(err.kind(), "submit_target_not_found");
    }
}
