//! 获取 Browser：启动新的无头实例，或连接已运行实例的调试端口

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chromiumoxide::handler::Handler;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tracing::{debug, info};

/// 启动后等待浏览器状态同步的时间
const STARTUP_GRACE: Duration = Duration::from_millis(300);

const HEADLESS_ARGS: [&str; 4] = [
    "--disable-gpu",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-extensions",
];

/// 启动无头浏览器
///
/// # 参数
/// - `chrome_executable`: 浏览器可执行文件路径，为空时由 chromiumoxide 自动查找
pub async fn launch_headless_browser(chrome_executable: Option<&str>) -> Result<Browser> {
    info!("🚀 启动无头浏览器...");

    let mut builder = BrowserConfig::builder()
        .new_headless_mode()
        .args(HEADLESS_ARGS);
    if let Some(path) = chrome_executable {
        debug!("浏览器路径: {}", path);
        builder = builder.chrome_executable(Path::new(path));
    }
    let config = builder
        .build()
        .map_err(|e| anyhow!("配置无头浏览器失败: {}", e))?;

    let (browser, handler) = Browser::launch(config)
        .await
        .context("启动无头浏览器失败")?;
    drive(handler).await;

    Ok(browser)
}

/// 连接到已运行的浏览器（远程调试端口）
pub async fn connect_to_browser(port: u16) -> Result<Browser> {
    let browser_url = format!("http://localhost:{}", port);
    info!("🔌 连接到浏览器: {}", browser_url);

    let (browser, handler) = Browser::connect(&browser_url)
        .await
        .with_context(|| format!("连接浏览器失败: {}", browser_url))?;
    drive(handler).await;

    Ok(browser)
}

/// 在后台处理浏览器事件，出错即停止
async fn drive(mut handler: Handler) {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                debug!("浏览器事件循环结束");
                break;
            }
        }
    });
    tokio::time::sleep(STARTUP_GRACE).await;
}
