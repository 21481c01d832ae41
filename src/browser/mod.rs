//! 浏览器渲染
//!
//! 持有唯一的 Browser 资源，只暴露"渲染页面"的能力

pub mod launch;

pub use launch::{connect_to_browser, launch_headless_browser};

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::Browser;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::config::Config;

/// 页面渲染能力
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// 渲染页面并返回 HTML，整个过程受 `limit` 限制
    async fn render(&self, url: &str, limit: Duration) -> Result<String>;
}

/// 无头浏览器渲染器
///
/// 每次渲染打开一个新标签页，读取渲染后的 HTML 后立即关闭。
pub struct HeadlessRenderer {
    browser: Browser,
    settle: Duration,
}

impl HeadlessRenderer {
    /// 根据配置连接或启动浏览器
    pub async fn from_config(config: &Config) -> Result<Self> {
        let browser = match config.browser_debug_port {
            Some(port) => connect_to_browser(port).await?,
            None => launch_headless_browser(config.chrome_executable.as_deref()).await?,
        };
        Ok(Self {
            browser,
            settle: Duration::from_millis(config.render_settle_ms),
        })
    }

    async fn render_inner(&self, url: &str) -> Result<String> {
        debug!("打开标签页: {}", url);
        let page = self
            .browser
            .new_page(url)
            .await
            .with_context(|| format!("创建页面失败: {}", url))?;

        let content = async {
            page.wait_for_navigation().await?;
            // 给页面脚本留出执行时间
            sleep(self.settle).await;
            page.content().await
        }
        .await;

        if let Err(e) = page.close().await {
            debug!("关闭标签页失败: {}", e);
        }

        content.with_context(|| format!("读取页面内容失败: {}", url))
    }
}

#[async_trait]
impl PageRenderer for HeadlessRenderer {
    /// 打开、导航、等待、读取整体计时
    async fn render(&self, url: &str, limit: Duration) -> Result<String> {
        timeout(limit, self.render_inner(url))
            .await
            .with_context(|| format!("渲染超时 ({}s): {}", limit.as_secs(), url))?
    }
}
