//! HTTP抓取模块
//!
//! 此模块负责：
//! - 持有进程内唯一的HTTP客户端（连接池、User-Agent、超时）
//! - 对瞬时失败（429/5xx/403、连接错误、超时）按指数退避重试
//! - 对其他非2xx状态立即失败

// 第三方crate导入
use reqwest::{header, Client, Response};
use tracing::{debug, info, warn};

// 本地模块导入
use crate::config::HttpConfig;
use crate::error::{Result, ScrapeError};

/// HTTP抓取器
///
/// 在程序启动时创建一次，显式传递给需要发起请求的组件。
///
/// # Features
///
/// - 固定的浏览器User-Agent
/// - 可配置的单次请求超时
/// - 重试机制：默认最多3次尝试，延迟从1秒开始指数增长
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: HttpConfig,
}

/// 单次尝试的结果
enum Attempt {
    Success(Response),
    Retryable(ScrapeError),
    Fatal(ScrapeError),
}

impl Fetcher {
    /// 根据配置创建抓取器
    pub fn new(config: HttpConfig) -> Result<Self> {
        let user_agent =
            header::HeaderValue::from_str(config.user_agent()).map_err(|e| ScrapeError::Configuration {
                field: "user_agent".to_string(),
                reason: e.to_string(),
            })?;
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, user_agent);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| ScrapeError::Configuration {
            field: "http_client".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, config })
    }

    /// 使用默认页面配置创建抓取器
    pub fn with_defaults() -> Result<Self> {
        Self::new(HttpConfig::for_pages())
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// 抓取页面并返回文本内容
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.get_with_retry(url).await?;
        let body = response.text().await.map_err(|e| ScrapeError::Fetch {
            url: url.to_string(),
            message: format!("读取响应失败: {}", e),
            status_code: None,
        })?;
        debug!("📄 {} 响应大小: {} 字节", url, body.len());
        Ok(body)
    }

    /// 抓取资源并返回原始字节
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get_with_retry(url).await?;
        let bytes = response.bytes().await.map_err(|e| ScrapeError::Fetch {
            url: url.to_string(),
            message: format!("读取响应失败: {}", e),
            status_code: None,
        })?;
        Ok(bytes.to_vec())
    }

    /// 带重试机制的GET请求
    async fn get_with_retry(&self, url: &str) -> Result<Response> {
        let max_attempts = self.config.max_attempts();
        let mut last_error: Option<ScrapeError> = None;

        for attempt in 1..=max_attempts {
            debug!("🔄 请求 {} (第 {} 次)", url, attempt);

            match self.try_once(url).await {
                Attempt::Success(response) => {
                    if attempt > 1 {
                        info!("✅ 重试成功: {}", url);
                    }
                    return Ok(response);
                }
                Attempt::Fatal(e) => return Err(e),
                Attempt::Retryable(e) => {
                    warn!("❌ 请求失败 (尝试 {}/{}): {}", attempt, max_attempts, e);
                    last_error = Some(e);

                    if attempt < max_attempts {
                        let delay = self.config.backoff_for(attempt);
                        debug!("⏳ 等待 {:?} 后重试...", delay);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ScrapeError::Fetch {
            url: url.to_string(),
            message: "所有重试尝试均失败".to_string(),
            status_code: None,
        }))
    }

    async fn try_once(&self, url: &str) -> Attempt {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return Attempt::Success(response);
                }

                let error = ScrapeError::Fetch {
                    url: url.to_string(),
                    message: status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string(),
                    status_code: Some(status.as_u16()),
                };
                if self.config.is_retryable(status.as_u16()) {
                    Attempt::Retryable(error)
                } else {
                    Attempt::Fatal(error)
                }
            }
            Err(e) => {
                let transient = e.is_timeout() || e.is_connect() || e.is_request();
                let error = ScrapeError::Fetch {
                    url: url.to_string(),
                    message: e.to_string(),
                    status_code: None,
                };
                if transient {
                    Attempt::Retryable(error)
                } else {
                    Attempt::Fatal(error)
                }
            }
        }
    }
}
