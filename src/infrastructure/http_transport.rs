//! HTTP 传输 - 基础设施层
//!
//! 只暴露"下载"和"提交 JSON"的能力，不认识题型

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 提交答案后服务端的原始响应
#[derive(Debug, Clone)]
pub struct PostResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP 传输能力
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET 文本资源（非 2xx 视为失败）
    async fn get_text(&self, url: &str) -> AppResult<String>;

    /// GET 二进制资源（非 2xx 视为失败）
    async fn get_bytes(&self, url: &str) -> AppResult<Vec<u8>>;

    /// POST JSON，返回状态码与原始响应体（不检查状态码）
    async fn post_json(&self, url: &str, body: &JsonValue) -> AppResult<PostResponse>;
}

/// 基于 reqwest 的实现
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// 创建带统一超时的客户端
    pub fn new(timeout_secs: u64) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Other(format!("创建 HTTP 客户端失败: {}", e)))?;
        Ok(Self { client })
    }

    async fn get_ok(&self, url: &str) -> AppResult<reqwest::Response> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::download_failed(url, e))?;
        response
            .error_for_status()
            .map_err(|e| AppError::download_failed(url, e))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_text(&self, url: &str) -> AppResult<String> {
        self.get_ok(url)
            .await?
            .text()
            .await
            .map_err(|e| AppError::download_failed(url, e))
    }

    async fn get_bytes(&self, url: &str) -> AppResult<Vec<u8>> {
        let bytes = self
            .get_ok(url)
            .await?
            .bytes()
            .await
            .map_err(|e| AppError::download_failed(url, e))?;
        Ok(bytes.to_vec())
    }

    async fn post_json(&self, url: &str, body: &JsonValue) -> AppResult<PostResponse> {
        debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::download_failed(url, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::download_failed(url, e))?;
        Ok(PostResponse { status, body })
    }
}
