//! 统一错误处理模块
//!
//! 提供食谱抓取流程的统一错误类型定义。抓取、解析、翻译、导出的失败
//! 都归入同一个错误通道，由流水线在单个食谱的边界上统一捕获。

// 标准库导入
use std::fmt;

// 第三方crate导入
use anyhow::Error as AnyhowError;

/// 食谱抓取统一错误类型
#[derive(Debug)]
pub enum ScrapeError {
    /// 网络请求相关错误（重试耗尽或不可重试的状态码）
    Fetch {
        /// 请求地址
        url: String,
        /// 错误消息
        message: String,
        /// HTTP状态码（如果适用）
        status_code: Option<u16>,
    },

    /// 页面解析错误（必填字段缺失等）
    Parse {
        /// 页面地址
        url: String,
        /// 具体错误信息
        details: String,
    },

    /// 文件操作相关错误
    FileOperation {
        /// 文件路径
        path: String,
        /// 操作类型（读取、写入、创建等）
        operation: String,
        /// 底层错误信息
        source: String,
    },

    /// 翻译API相关错误
    TranslationApi {
        /// API响应状态码
        status_code: Option<u16>,
        /// 错误消息
        message: String,
        /// API地址
        api_url: String,
    },

    /// 配置相关错误
    Configuration {
        /// 配置项名称
        field: String,
        /// 错误原因
        reason: String,
    },

    /// 输入验证错误
    InputValidation {
        /// 输入值
        input: String,
        /// 验证失败原因
        reason: String,
    },

    /// 内部处理错误（包装anyhow::Error）
    Internal {
        /// 包装的错误
        source: AnyhowError,
    },
}

impl ScrapeError {
    /// 是否为网络抓取错误
    pub fn is_fetch(&self) -> bool {
        matches!(self, ScrapeError::Fetch { .. })
    }

    /// 是否为页面解析错误
    pub fn is_parse(&self) -> bool {
        matches!(self, ScrapeError::Parse { .. })
    }

    /// 返回HTTP状态码（仅网络与翻译API错误携带）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ScrapeError::Fetch { status_code, .. } => *status_code,
            ScrapeError::TranslationApi { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeError::Fetch { url, message, status_code } => {
                if let Some(code) = status_code {
                    write!(f, "网络请求失败 [{}] {}: {}", code, url, message)
                } else {
                    write!(f, "网络请求失败 {}: {}", url, message)
                }
            }
            ScrapeError::Parse { url, details } => {
                write!(f, "页面解析失败 {}: {}", url, details)
            }
            ScrapeError::FileOperation { path, operation, source } => {
                write!(f, "文件{}操作失败 [{}]: {}", operation, path, source)
            }
            ScrapeError::TranslationApi { status_code, message, api_url } => match status_code {
                Some(code) => write!(f, "翻译API错误 [{}] {}: {}", code, api_url, message),
                None => write!(f, "翻译API错误 {}: {}", api_url, message),
            },
            ScrapeError::Configuration { field, reason } => {
                write!(f, "配置错误 [{}]: {}", field, reason)
            }
            ScrapeError::InputValidation { input, reason } => {
                write!(f, "输入验证失败 [{}]: {}", input, reason)
            }
            ScrapeError::Internal { source } => {
                write!(f, "内部处理错误: {}", source)
            }
        }
    }
}

impl std::error::Error for ScrapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScrapeError::Internal { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// 食谱抓取结果类型别名
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// 便捷的错误创建宏
#[macro_export]
macro_rules! scrape_error {
    (fetch, $url:expr, $msg:expr) => {
        $crate::error::ScrapeError::Fetch {
            url: $url.to_string(),
            message: $msg.to_string(),
            status_code: None,
        }
    };
    (fetch, $url:expr, $msg:expr, $code:expr) => {
        $crate::error::ScrapeError::Fetch {
            url: $url.to_string(),
            message: $msg.to_string(),
            status_code: Some($code),
        }
    };
    (parse, $url:expr, $details:expr) => {
        $crate::error::ScrapeError::Parse {
            url: $url.to_string(),
            details: $details.to_string(),
        }
    };
    (file_op, $path:expr, $op:expr, $source:expr) => {
        $crate::error::ScrapeError::FileOperation {
            path: $path.to_string(),
            operation: $op.to_string(),
            source: $source.to_string(),
        }
    };
    (translation_api, $msg:expr, $url:expr) => {
        $crate::error::ScrapeError::TranslationApi {
            status_code: None,
            message: $msg.to_string(),
            api_url: $url.to_string(),
        }
    };
    (translation_api, $code:expr, $msg:expr, $url:expr) => {
        $crate::error::ScrapeError::TranslationApi {
            status_code: Some($code),
            message: $msg.to_string(),
            api_url: $url.to_string(),
        }
    };
    (config, $field:expr, $reason:expr) => {
        $crate::error::ScrapeError::Configuration {
            field: $field.to_string(),
            reason: $reason.to_string(),
        }
    };
    (input_validation, $input:expr, $reason:expr) => {
        $crate::error::ScrapeError::InputValidation {
            input: $input.to_string(),
            reason: $reason.to_string(),
        }
    };
}

/// 从anyhow::Error转换为ScrapeError
impl From<AnyhowError> for ScrapeError {
    fn from(error: AnyhowError) -> Self {
        ScrapeError::Internal { source: error }
    }
}

/// 从reqwest::Error转换为ScrapeError
impl From<reqwest::Error> for ScrapeError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        ScrapeError::Fetch {
            url,
            message: error.to_string(),
            status_code,
        }
    }
}

/// 从std::io::Error转换为ScrapeError
impl From<std::io::Error> for ScrapeError {
    fn from(error: std::io::Error) -> Self {
        ScrapeError::FileOperation {
            path: "unknown".to_string(),
            operation: "io".to_string(),
            source: error.to_string(),
        }
    }
}

/// 从csv::Error转换为ScrapeError
impl From<csv::Error> for ScrapeError {
    fn from(error: csv::Error) -> Self {
        ScrapeError::FileOperation {
            path: "recipes.csv".to_string(),
            operation: "CSV写入".to_string(),
            source: error.to_string(),
        }
    }
}
