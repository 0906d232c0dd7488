use std::path::Path;
use std::sync::LazyLock;

use clap::Parser;
use regex::Regex;
use url::Url;

use crate::error::{Result, ScrapeError};

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("slug character class"));
static SLUG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s-]+").expect("slug separator class"));

/// 根据命令行开关选择日志级别；静默模式仍保留错误输出
pub fn log_level(verbose: bool, quiet: bool) -> tracing::Level {
    if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    }
}

/// 初始化日志系统
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = log_level(verbose, quiet);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// 解析命令行参数；参数错误时打印用法并以退出码1结束
pub fn parse_cli_or_exit<T: Parser>() -> T {
    match T::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    }
}

/// 验证URL格式，只接受http/https
pub fn validate_url(input: &str) -> Result<Url> {
    if input.is_empty() {
        return Err(ScrapeError::InputValidation {
            input: input.to_string(),
            reason: "URL不能为空".to_string(),
        });
    }

    let url = Url::parse(input).map_err(|e| ScrapeError::InputValidation {
        input: input.to_string(),
        reason: format!("URL解析失败: {}", e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ScrapeError::InputValidation {
            input: input.to_string(),
            reason: "URL必须以http://或https://开头".to_string(),
        });
    }

    Ok(url)
}

/// 验证输入目录
pub fn validate_input_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ScrapeError::InputValidation {
            input: path.display().to_string(),
            reason: "输入目录不存在".to_string(),
        });
    }

    if !path.is_dir() {
        return Err(ScrapeError::InputValidation {
            input: path.display().to_string(),
            reason: "输入路径不是目录".to_string(),
        });
    }

    Ok(())
}

/// 从食谱名称生成文件名安全的slug
///
/// 转小写后去掉除字母数字、下划线、空白和连字符以外的字符，
/// 把连续的空白和连字符合并为一个连字符，并去掉首尾连字符。
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(&lowered, "");
    let collapsed = SLUG_SEPARATORS.replace_all(cleaned.trim(), "-");
    collapsed.trim_matches('-').to_string()
}
