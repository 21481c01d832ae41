//! 应用入口 - 编排层
//!
//! 负责组装所有组件并启动 HTTP 触发入口：
//!
//! 1. **渲染器**：按配置连接或启动无头浏览器，失败时只使用 HTTP
//! 2. **传输与抓取**：创建共享的 HTTP 传输和页面抓取器
//! 3. **答题能力**：根据运行模式选择音频听写方式
//! 4. **求解记录**：启动时写入文件头

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::{router, TriggerState};
use crate::browser::{HeadlessRenderer, PageRenderer};
use crate::config::Config;
use crate::infrastructure::{HttpTransport, PageFetcher, ReqwestTransport, RenderingFetcher};
use crate::orchestrator::ChainRunner;
use crate::services::{RunJournal, StdinTranscriber, Transcriber, UnattendedTranscriber};
use crate::utils::logging::log_startup;
use crate::workflow::QuizFlow;

/// 应用主结构
pub struct App {
    config: Config,
    state: Arc<TriggerState>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config.bind_addr, config.max_hops);

        if config.secret.is_none() {
            warn!("⚠️ 未配置 QUIZ_SECRET / TDS_SECRET，所有求解请求都会被拒绝");
        }

        let journal = RunJournal::with_path(&config.journal_file);
        journal
            .init()
            .with_context(|| format!("初始化求解记录失败: {}", config.journal_file))?;

        let renderer: Option<Arc<dyn PageRenderer>> = if config.use_browser {
            match HeadlessRenderer::from_config(&config).await {
                Ok(renderer) => {
                    info!("✓ 无头浏览器已就绪");
                    Some(Arc::new(renderer))
                }
                Err(e) => {
                    warn!("⚠️ 无头浏览器不可用，只使用 HTTP 抓取: {:#}", e);
                    None
                }
            }
        } else {
            None
        };

        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(config.http_timeout_secs)?);
        let fetcher: Arc<dyn PageFetcher> = Arc::new(RenderingFetcher::new(
            renderer,
            transport.clone(),
            config.fetch_timeout_secs,
        ));
        let transcriber: Arc<dyn Transcriber> = if config.interactive_audio {
            Arc::new(StdinTranscriber)
        } else {
            Arc::new(UnattendedTranscriber)
        };

        let flow = QuizFlow::new(fetcher, transport, transcriber, &config);
        let runner = ChainRunner::new(flow, config.max_hops).with_journal(journal);
        let state = Arc::new(TriggerState::new(config.secret.clone(), runner));

        Ok(Self { config, state })
    }

    /// 启动 HTTP 服务，直到进程结束
    pub async fn run(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("监听失败: {}", self.config.bind_addr))?;
        info!("🌐 等待求解请求: http://{}", self.config.bind_addr);

        axum::serve(listener, router(self.state)).await?;
        Ok(())
    }
}
