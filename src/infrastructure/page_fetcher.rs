//! 页面抓取 - 基础设施层
//!
//! 优先使用无头浏览器渲染，渲染不可用或失败时退回普通 GET。
//! 两条路径共用同一个抓取超时。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::browser::PageRenderer;
use crate::error::{AppError, AppResult};
use crate::infrastructure::http_transport::HttpTransport;

/// 页面抓取能力
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 返回渲染后的页面内容
    async fn fetch(&self, url: &str) -> AppResult<String>;
}

/// 浏览器优先、HTTP 兜底的抓取器
pub struct RenderingFetcher {
    renderer: Option<Arc<dyn PageRenderer>>,
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl RenderingFetcher {
    /// 创建抓取器
    ///
    /// # 参数
    /// - `renderer`: 页面渲染器，`None` 时只使用 HTTP
    /// - `transport`: 兜底使用的 HTTP 传输
    /// - `timeout_secs`: 单次抓取超时（渲染与兜底请求各自计时）
    pub fn new(
        renderer: Option<Arc<dyn PageRenderer>>,
        transport: Arc<dyn HttpTransport>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            renderer,
            transport,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    async fn plain_get(&self, url: &str) -> AppResult<String> {
        match timeout(self.timeout, self.transport.get_text(url)).await {
            Ok(result) => result.map_err(|e| AppError::fetch_failed(url, e)),
            Err(_) => Err(AppError::fetch_failed(
                url,
                format!("请求超时 ({}s)", self.timeout.as_secs()),
            )),
        }
    }
}

#[async_trait]
impl PageFetcher for RenderingFetcher {
    async fn fetch(&self, url: &str) -> AppResult<String> {
        if let Some(renderer) = &self.renderer {
            match renderer.render(url, self.timeout).await {
                Ok(html) => {
                    debug!("浏览器渲染成功: {} ({} 字节)", url, html.len());
                    return Ok(html);
                }
                Err(e) => {
                    warn!("浏览器渲染失败，改用 HTTP 请求: {:#}", e);
                }
            }
        }

        self.plain_get(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::PostResponse;
    use serde_json::Value as JsonValue;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::assert_ok;

    /// 固定结果的渲染器
    struct FixedRenderer(Option<&'static str>);

    #[async_trait]
    impl PageRenderer for FixedRenderer {
        async fn render(&self, _url: &str, _limit: Duration) -> anyhow::Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("chrome crashed"))
        }
    }

    /// GET 返回固定内容（可选延迟），记录调用次数
    struct GetTransport {
        body: Option<&'static str>,
        stall: Duration,
        gets: AtomicUsize,
    }

    impl GetTransport {
        fn new(body: Option<&'static str>, stall: Duration) -> Arc<Self> {
            Arc::new(Self {
                body,
                stall,
                gets: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for GetTransport {
        async fn get_text(&self, url: &str) -> AppResult<String> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.stall).await;
            self.body
                .map(str::to_string)
                .ok_or_else(|| AppError::download_failed(url, "503"))
        }

        async fn get_bytes(&self, url: &str) -> AppResult<Vec<u8>> {
            Err(AppError::download_failed(url, "unused"))
        }

        async fn post_json(&self, url: &str, _body: &JsonValue) -> AppResult<PostResponse> {
            Err(AppError::download_failed(url, "unused"))
        }
    }

    const URL: &str = "https://quiz.test/q1";

    #[tokio::test]
    async fn test_rendered_page_skips_http() {
        let transport = GetTransport::new(Some("<p>plain</p>"), Duration::ZERO);
        let fetcher = RenderingFetcher::new(
            Some(Arc::new(FixedRenderer(Some("<p>rendered</p>")))),
            transport.clone(),
            20,
        );

        assert_eq!(assert_ok!(fetcher.fetch(URL).await), "<p>rendered</p>");
        assert_eq!(transport.gets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_render_failure_falls_back_to_http() {
        let transport = GetTransport::new(Some("<p>plain</p>"), Duration::ZERO);
        let fetcher =
            RenderingFetcher::new(Some(Arc::new(FixedRenderer(None))), transport.clone(), 20);

        assert_eq!(assert_ok!(fetcher.fetch(URL).await), "<p>plain</p>");
        assert_eq!(transport.gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_paths_failing_is_fetch_failure() {
        let transport = GetTransport::new(None, Duration::ZERO);
        let fetcher = RenderingFetcher::new(Some(Arc::new(FixedRenderer(None))), transport, 20);

        let err = fetcher.fetch(URL).await.unwrap_err();
        assert!(matches!(err, AppError::FetchFailure { ref url, .. } if url == URL));
    }

    #[tokio::test(start_paused = true)]
    async fn test_http_fallback_uses_fetch_timeout() {
        let transport = GetTransport::new(Some("<p>late</p>"), Duration::from_secs(60));
        let fetcher = RenderingFetcher::new(None, transport, 20);

        let started = tokio::time::Instant::now();
        let err = fetcher.fetch(URL).await.unwrap_err();

        assert_eq!(err.kind(), "fetch_failure");
        assert!(started.elapsed() >= Duration::from_secs(20));
        assert!(started.elapsed() < Duration::from_secs(60));
    }
}
