use std::time::Duration;

/// 抓取运行统计
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    pub links_found: usize,
    pub recipes_exported: usize,
    pub recipes_failed: usize,
    pub photos_found: usize,
    pub translated: bool,
    pub link_discovery_time: Duration,
    pub processing_time: Duration,
}

/// 图片下载统计
#[derive(Debug, Default, Clone)]
pub struct DownloadStats {
    pub lists_scanned: usize,
    pub images_saved: usize,
    pub images_failed: usize,
    pub bytes_written: usize,
}

impl RunStats {
    /// 一行摘要，用于日志
    pub fn summary(&self) -> String {
        format!(
            "链接 {} 个, 成功 {} 个, 失败 {} 个",
            self.links_found, self.recipes_exported, self.recipes_failed
        )
    }
}

impl DownloadStats {
    pub fn summary(&self) -> String {
        format!(
            "列表 {} 个, 保存 {} 张, 失败 {} 张",
            self.lists_scanned, self.images_saved, self.images_failed
        )
    }
}

/// 打印抓取统计
pub fn print_run_stats(stats: &RunStats, total_duration: Duration) {
    println!("\n📊 运行统计报告:");
    println!("═══════════════════════════════════════");

    // 时间分解
    println!("⏱️  时间分解:");
    println!("   链接发现: {}", format_duration(stats.link_discovery_time));
    println!("   食谱处理: {}", format_duration(stats.processing_time));
    println!("   总耗时: {}", format_duration(total_duration));

    // 食谱统计
    println!("\n🍲 食谱统计:");
    println!("   发现链接: {} 个", stats.links_found);
    println!("   导出成功: {} 个", stats.recipes_exported);
    println!("   处理失败: {} 个", stats.recipes_failed);
    println!("   图片地址: {} 个", stats.photos_found);
    println!("   翻译: {}", if stats.translated { "已启用" } else { "未启用" });

    if stats.links_found > 0 {
        println!(
            "   成功率: {:.1}%",
            stats.recipes_exported as f64 / stats.links_found as f64 * 100.0
        );
    }

    if stats.recipes_exported > 0 {
        println!(
            "   平均耗时: {}",
            format_duration(stats.processing_time / stats.recipes_exported as u32)
        );
    }
}

/// 打印下载统计
pub fn print_download_stats(stats: &DownloadStats, total_duration: Duration) {
    println!("\n📊 下载统计报告:");
    println!("═══════════════════════════════════════");
    println!("   扫描列表: {} 个", stats.lists_scanned);
    println!("   保存图片: {} 张", stats.images_saved);
    println!("   下载失败: {} 张", stats.images_failed);
    println!(
        "   写入大小: {} 字节 ({:.1} KB)",
        stats.bytes_written,
        stats.bytes_written as f64 / 1024.0
    );
    println!("   总耗时: {}", format_duration(total_duration));
}

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}
