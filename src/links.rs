//! 食谱链接发现
//!
//! 只检查起始页本身，不做分页或递归抓取。

use std::collections::HashSet;

use scraper::Html;
use tracing::{debug, info};
use url::Url;

use crate::config::SelectorRules;
use crate::error::{Result, ScrapeError};
use crate::fetcher::Fetcher;
use crate::parser::compile_selector;

/// 从页面内容中提取食谱链接
///
/// 选出带href的链接元素，保留href包含`rules.link_pattern`的项，
/// 相对地址按`base`解析为绝对地址，按首次出现顺序去重。
pub fn extract_links_from_html(body: &str, base: &Url, rules: &SelectorRules) -> Result<Vec<Url>> {
    let selector = compile_selector("link", &rules.link)?;
    let document = Html::parse_document(body);

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.contains(rules.link_pattern.as_str()) {
            continue;
        }
        match base.join(href.trim()) {
            Ok(resolved) => {
                if seen.insert(resolved.as_str().to_string()) {
                    links.push(resolved);
                }
            }
            Err(e) => debug!("跳过无法解析的链接 {:?}: {}", href, e),
        }
    }

    Ok(links)
}

/// 抓取起始页并返回其中的食谱链接
pub async fn extract_links(fetcher: &Fetcher, page_url: &str, rules: &SelectorRules) -> Result<Vec<Url>> {
    let base = Url::parse(page_url).map_err(|e| ScrapeError::InputValidation {
        input: page_url.to_string(),
        reason: format!("URL解析失败: {}", e),
    })?;

    let body = fetcher.fetch(page_url).await?;
    let links = extract_links_from_html(&body, &base, rules)?;
    info!("🔗 在 {} 中发现 {} 个食谱链接", page_url, links.len());

    Ok(links)
}
