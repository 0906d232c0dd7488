use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use recipe_scraper::config::DownloadCli;
use recipe_scraper::downloader::download_from_dir;
use recipe_scraper::fetcher::Fetcher;
use recipe_scraper::stats::{format_duration, print_download_stats};
use recipe_scraper::utils::{init_logging, parse_cli_or_exit};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli: DownloadCli = parse_cli_or_exit();

    // 初始化日志系统
    init_logging(cli.verbose, cli.quiet);

    let fetcher = Fetcher::new(cli.http_config()).context("创建HTTP客户端失败")?;

    info!("🚀 开始下载图片");
    info!("📂 列表目录: {}", cli.txt_dir.display());
    info!("🖼️  保存目录: {}", cli.images_dir.display());

    let total_start = Instant::now();
    let stats = download_from_dir(&fetcher, &cli.txt_dir, &cli.images_dir)
        .await
        .with_context(|| format!("处理列表目录失败: {}", cli.txt_dir.display()))?;
    let total_duration = total_start.elapsed();

    info!(
        "✅ 下载完成: {}，总耗时 {}",
        stats.summary(),
        format_duration(total_duration)
    );

    if cli.stats || cli.verbose {
        print_download_stats(&stats, total_duration);
    }

    Ok(())
}
