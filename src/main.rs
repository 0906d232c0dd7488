use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};

use recipe_scraper::api_constants::is_supported_language;
use recipe_scraper::config::{Cli, TranslationConfig};
use recipe_scraper::fetcher::Fetcher;
use recipe_scraper::pipeline::RecipePipeline;
use recipe_scraper::stats::{format_duration, print_run_stats};
use recipe_scraper::translator::Translator;
use recipe_scraper::utils::{init_logging, parse_cli_or_exit, validate_url};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli: Cli = parse_cli_or_exit();

    // 初始化日志系统
    init_logging(cli.verbose, cli.quiet);

    // 验证起始URL
    validate_url(&cli.start_url)?;

    if !is_supported_language(&cli.lang) {
        warn!("⚠️  目标语言可能不受支持: {}", cli.lang);
    }

    let rules = cli.selector_rules().context("加载选择器规则失败")?;
    let fetcher = Fetcher::new(cli.http_config()).context("创建HTTP客户端失败")?;

    let translation_config = TranslationConfig::from_env()
        .context("读取翻译配置失败")?
        .target_language(&cli.lang);
    let translator = Translator::new(&translation_config).context("创建翻译器失败")?;

    info!("🚀 开始抓取食谱");
    info!("🌐 起始页面: {}", cli.start_url);
    info!("📂 输出目录: {}", cli.output_dir.display());
    if translator.is_enabled() {
        info!("🔤 翻译已启用，目标语言: {}", translator.target_lang());
    } else {
        info!("🔤 未配置翻译密钥，保留原文");
    }

    let total_start = Instant::now();

    let pipeline = RecipePipeline::new(fetcher, rules, translator, &cli.output_dir)
        .context("编译选择器规则失败")?;
    let stats = pipeline
        .run(&cli.start_url)
        .await
        .with_context(|| format!("抓取运行失败: {}", cli.start_url))?;

    let total_duration = total_start.elapsed();
    info!(
        "✅ 抓取完成: {}，总耗时 {}",
        stats.summary(),
        format_duration(total_duration)
    );

    // 显示运行统计
    if cli.stats || cli.verbose {
        print_run_stats(&stats, total_duration);
    }

    Ok(())
}
