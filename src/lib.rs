//! Recipe Scraper - 食谱网页抓取工具库
//!
//! 这个库提供了链接发现、食谱字段解析、配料去重、可选翻译、文本与CSV导出以及图片下载等核心功能。

pub mod api_constants;
pub mod config;
pub mod downloader;
pub mod error;
pub mod exporter;
pub mod fetcher;
pub mod links;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod recipe;
pub mod stats;
pub mod translator;
pub mod utils;
