//! 配置管理模块
//!
//! 提供CLI参数解析、HTTP抓取配置、翻译配置和站点选择器规则

// 标准库导入
use std::path::{Path, PathBuf};
use std::time::Duration;

// 第三方crate导入
use clap::Parser;
use serde::{Deserialize, Serialize};

// 本地模块导入
use crate::api_constants::{
    deepl_api_url_for_key, export_config, http_config, is_retryable_status, is_valid_api_url,
    selector_defaults, translation_config,
};
use crate::error::{Result, ScrapeError};

/// HTTP抓取配置结构体
///
/// 描述所有请求共享的身份标识与重试策略，支持Builder模式进行链式配置。
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use recipe_scraper::config::HttpConfig;
///
/// let config = HttpConfig::for_pages()
///     .with_max_attempts(5)
///     .with_backoff_base(Duration::from_millis(500));
/// assert_eq!(config.max_attempts(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// 请求头中的User-Agent
    user_agent: String,
    /// 单次请求超时
    timeout: Option<Duration>,
    /// 最大尝试次数（包含首次请求）
    max_attempts: u32,
    /// 指数退避的起始延迟
    backoff_base: Duration,
}

impl HttpConfig {
    /// 食谱页面抓取的默认配置
    pub fn for_pages() -> Self {
        Self {
            user_agent: http_config::DEFAULT_USER_AGENT.to_string(),
            timeout: Some(Duration::from_secs(http_config::PAGE_TIMEOUT_SECONDS)),
            max_attempts: http_config::DEFAULT_MAX_ATTEMPTS,
            backoff_base: Duration::from_millis(http_config::RETRY_DELAY_BASE_MS),
        }
    }

    /// 图片下载的默认配置：更短的超时，每张图片只请求一次
    pub fn for_images() -> Self {
        Self::for_pages()
            .with_timeout(Duration::from_secs(http_config::IMAGE_TIMEOUT_SECONDS))
            .with_max_attempts(1)
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    /// 判断状态码是否需要重试
    pub fn is_retryable(&self, status: u16) -> bool {
        is_retryable_status(status)
    }

    /// 第`attempt`次尝试失败后的等待时间：base * 2^(attempt-1)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.backoff_base.saturating_mul(1u32 << exponent)
    }

    /// 设置User-Agent
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// 设置请求超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// 设置最大尝试次数（至少为1）
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// 设置退避起始延迟
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::for_pages()
    }
}

/// 翻译配置结构体
///
/// 没有API密钥时翻译处于禁用状态，翻译器退化为恒等映射。
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    /// 目标语言代码 (如: RU, EN, DE)
    target_lang: String,
    /// 翻译API服务地址
    api_url: String,
    /// API密钥，为空表示禁用翻译
    auth_key: Option<String>,
    /// 单次请求的文本条数上限
    batch_size: usize,
    /// 请求超时
    timeout: Duration,
}

impl TranslationConfig {
    /// 创建禁用状态的配置
    pub fn new() -> Self {
        Self {
            target_lang: translation_config::DEFAULT_TARGET_LANG.to_string(),
            api_url: translation_config::DEEPL_PRO_API_URL.to_string(),
            auth_key: None,
            batch_size: translation_config::MAX_TEXTS_PER_REQUEST,
            timeout: Duration::from_secs(translation_config::REQUEST_TIMEOUT_SECONDS),
        }
    }

    /// 从环境变量读取密钥与接口地址
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 通过查找函数读取配置，便于在不修改进程环境的情况下测试
    ///
    /// 覆盖地址必须是http(s)地址，否则返回配置错误。
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(key) = lookup(translation_config::API_KEY_ENV)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
        {
            config.api_url = deepl_api_url_for_key(&key).to_string();
            config.auth_key = Some(key);
        }

        if let Some(url) = lookup(translation_config::API_URL_ENV)
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
        {
            if !is_valid_api_url(&url) {
                return Err(ScrapeError::Configuration {
                    field: translation_config::API_URL_ENV.to_string(),
                    reason: format!("不是有效的http(s)地址: {}", url),
                });
            }
            config.api_url = url;
        }

        Ok(config)
    }

    pub fn target_lang(&self) -> &str {
        &self.target_lang
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn auth_key(&self) -> Option<&str> {
        self.auth_key.as_deref()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 是否配置了翻译后端
    pub fn is_enabled(&self) -> bool {
        self.auth_key.is_some()
    }

    /// 设置目标语言代码
    pub fn target_language(mut self, lang: &str) -> Self {
        self.target_lang = lang.to_ascii_uppercase();
        self
    }

    /// 设置API地址
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.to_string();
        self
    }

    /// 设置API密钥
    pub fn with_auth_key(mut self, key: &str) -> Self {
        self.auth_key = Some(key.to_string());
        self
    }

    /// 设置单次请求的文本条数
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.clamp(1, translation_config::MAX_TEXTS_PER_REQUEST);
        self
    }

    /// 设置请求超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 站点选择器规则
///
/// 不同站点的标记结构不同，规则可以从JSON文件加载；缺省字段取默认值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorRules {
    /// 起始页中的链接元素
    pub link: String,
    /// 链接href必须包含的子串
    pub link_pattern: String,
    pub name: String,
    pub recipe_type: String,
    pub ingredient: String,
    pub prep_time: String,
    pub cook_time: String,
    pub total_time: String,
    pub step: String,
    pub photo: String,
    /// 允许的图片扩展名（大小写不敏感）
    pub photo_extensions: Vec<String>,
}

impl Default for SelectorRules {
    fn default() -> Self {
        Self {
            link: selector_defaults::LINK.to_string(),
            link_pattern: selector_defaults::LINK_PATTERN.to_string(),
            name: selector_defaults::NAME.to_string(),
            recipe_type: selector_defaults::RECIPE_TYPE.to_string(),
            ingredient: selector_defaults::INGREDIENT.to_string(),
            prep_time: selector_defaults::PREP_TIME.to_string(),
            cook_time: selector_defaults::COOK_TIME.to_string(),
            total_time: selector_defaults::TOTAL_TIME.to_string(),
            step: selector_defaults::STEP.to_string(),
            photo: selector_defaults::PHOTO.to_string(),
            photo_extensions: selector_defaults::PHOTO_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl SelectorRules {
    /// 从JSON字符串解析规则
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ScrapeError::Configuration {
            field: "rules".to_string(),
            reason: e.to_string(),
        })
    }

    /// 从JSON文件加载规则
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScrapeError::FileOperation {
            path: path.display().to_string(),
            operation: "读取".to_string(),
            source: e.to_string(),
        })?;
        Self::from_json(&content)
    }
}

/// 食谱抓取CLI参数
#[derive(Parser, Debug)]
#[command(
    name = "recipe-scraper",
    author,
    version,
    about = "食谱网页抓取工具 - 提取食谱字段并导出为文本文件和CSV",
    long_about = None
)]
pub struct Cli {
    /// 起始页面URL，从中发现食谱链接
    #[arg(value_name = "START_URL")]
    pub start_url: String,

    /// 输出目录
    #[arg(value_name = "OUTPUT_DIR", default_value = export_config::DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// 翻译目标语言代码（仅在设置了DEEPL_API_KEY时生效）
    #[arg(short, long, default_value = translation_config::DEFAULT_TARGET_LANG)]
    pub lang: String,

    /// 站点选择器规则JSON文件
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// 页面请求超时时间（秒）
    #[arg(long, default_value_t = http_config::PAGE_TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// 最大尝试次数
    #[arg(long, default_value_t = http_config::DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// 自定义User-Agent字符串
    #[arg(long)]
    pub user_agent: Option<String>,

    /// 详细输出模式
    #[arg(short, long)]
    pub verbose: bool,

    /// 静默模式 (仅输出错误)
    #[arg(short, long)]
    pub quiet: bool,

    /// 显示运行统计
    #[arg(long)]
    pub stats: bool,
}

impl Cli {
    /// 根据命令行参数构建HTTP配置
    pub fn http_config(&self) -> HttpConfig {
        let mut config = HttpConfig::for_pages()
            .with_timeout(Duration::from_secs(self.timeout))
            .with_max_attempts(self.max_attempts);
        if let Some(ua) = &self.user_agent {
            config = config.with_user_agent(ua);
        }
        config
    }

    /// 加载选择器规则，未指定文件时使用默认规则
    pub fn selector_rules(&self) -> Result<SelectorRules> {
        match &self.rules {
            Some(path) => SelectorRules::from_file(path),
            None => Ok(SelectorRules::default()),
        }
    }
}

/// 图片下载CLI参数
#[derive(Parser, Debug)]
#[command(
    name = "download-images",
    author,
    version,
    about = "根据*_photos.txt中的URL列表批量下载图片",
    long_about = None
)]
pub struct DownloadCli {
    /// 包含*_photos.txt文件的目录
    #[arg(value_name = "TXT_DIR")]
    pub txt_dir: PathBuf,

    /// 图片保存目录
    #[arg(value_name = "IMAGES_DIR", default_value = export_config::DEFAULT_IMAGES_DIR)]
    pub images_dir: PathBuf,

    /// 下载超时时间（秒）
    #[arg(long, default_value_t = http_config::IMAGE_TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// 详细输出模式
    #[arg(short, long)]
    pub verbose: bool,

    /// 静默模式 (仅输出错误)
    #[arg(short, long)]
    pub quiet: bool,

    /// 显示下载统计
    #[arg(long)]
    pub stats: bool,
}

impl DownloadCli {
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::for_images().with_timeout(Duration::from_secs(self.timeout))
    }
}
