//! 图片下载模块
//!
//! 此模块负责：
//! - 在目录顶层查找`*_photos.txt`列表文件
//! - 逐行读取图片URL并下载到目标目录
//! - 单个URL失败只记录日志，继续处理后续URL

// 标准库导入
use std::fs;
use std::path::{Path, PathBuf};

// 第三方crate导入
use tracing::{debug, error, info};
use url::Url;
use walkdir::WalkDir;

// 本地模块导入
use crate::api_constants::export_config;
use crate::error::{Result, ScrapeError};
use crate::fetcher::Fetcher;
use crate::stats::DownloadStats;
use crate::utils::validate_input_dir;

/// 根据URL路径的最后一段生成文件名，没有文件名时使用"image"
pub fn image_file_name(url: &str) -> String {
    let path_name = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        Err(_) => url
            .split(|c: char| c == '?' || c == '#')
            .next()
            .and_then(|path| path.rsplit('/').next())
            .map(str::to_string),
    };

    path_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| export_config::IMAGE_FALLBACK_NAME.to_string())
}

/// 查找目录顶层的照片列表文件，按文件名排序
pub fn find_photo_lists(txt_dir: &Path) -> Result<Vec<PathBuf>> {
    validate_input_dir(txt_dir)?;

    let mut lists = Vec::new();
    for entry in WalkDir::new(txt_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ScrapeError::FileOperation {
            path: txt_dir.display().to_string(),
            operation: "遍历".to_string(),
            source: e.to_string(),
        })?;

        let is_photo_list = entry.file_type().is_file()
            && entry
                .file_name()
                .to_string_lossy()
                .ends_with(export_config::PHOTOS_SUFFIX);
        if is_photo_list {
            lists.push(entry.into_path());
        }
    }

    lists.sort();
    Ok(lists)
}

/// 下载单张图片，返回保存路径
pub async fn download_image(fetcher: &Fetcher, url: &str, dest_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dest_dir).map_err(|e| ScrapeError::FileOperation {
        path: dest_dir.display().to_string(),
        operation: "创建目录".to_string(),
        source: e.to_string(),
    })?;

    let path = dest_dir.join(image_file_name(url));
    let bytes = fetcher.fetch_bytes(url).await?;

    fs::write(&path, &bytes).map_err(|e| ScrapeError::FileOperation {
        path: path.display().to_string(),
        operation: "写入".to_string(),
        source: e.to_string(),
    })?;

    debug!("写入 {} 字节: {}", bytes.len(), path.display());
    Ok(path)
}

/// 下载一个列表文件中的所有图片
pub async fn download_from_txt(
    fetcher: &Fetcher,
    txt_path: &Path,
    dest_dir: &Path,
    stats: &mut DownloadStats,
) -> Result<()> {
    let content = fs::read_to_string(txt_path).map_err(|e| ScrapeError::FileOperation {
        path: txt_path.display().to_string(),
        operation: "读取".to_string(),
        source: e.to_string(),
    })?;

    for url in content.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match download_image(fetcher, url, dest_dir).await {
            Ok(path) => {
                info!("✅ 已保存 {} -> {}", url, path.display());
                stats.images_saved += 1;
                stats.bytes_written += fs::metadata(&path).map(|m| m.len() as usize).unwrap_or(0);
            }
            Err(e) => {
                error!("❌ 下载失败 {}: {}", url, e);
                stats.images_failed += 1;
            }
        }
    }

    Ok(())
}

/// 处理目录下的所有照片列表文件
pub async fn download_from_dir(fetcher: &Fetcher, txt_dir: &Path, dest_dir: &Path) -> Result<DownloadStats> {
    let lists = find_photo_lists(txt_dir)?;
    info!("📂 在 {} 中找到 {} 个图片列表", txt_dir.display(), lists.len());

    let mut stats = DownloadStats::default();
    for list in &lists {
        info!("📄 处理列表: {}", list.display());
        match download_from_txt(fetcher, list, dest_dir, &mut stats).await {
            Ok(()) => stats.lists_scanned += 1,
            Err(e) => error!("❌ 读取列表失败 {}: {}", list.display(), e),
        }
    }

    Ok(stats)
}
