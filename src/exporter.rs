//! 导出模块
//!
//! 每个食谱写入三个文本文件（图片地址、配料、步骤），并向`recipes.csv`追加一行。
//! CSV在一次运行中只打开一次，表头写入后立即落盘，之后每行写完即刷新。

// 标准库导入
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// 第三方crate导入
use tracing::{debug, info, warn};

// 本地模块导入
use crate::api_constants::export_config;
use crate::error::{Result, ScrapeError};
use crate::recipe::Recipe;
use crate::utils::slugify;

/// 食谱导出器
pub struct Exporter {
    text_dir: PathBuf,
    csv_path: PathBuf,
    writer: csv::Writer<File>,
    written_slugs: HashSet<String>,
    rows_written: usize,
}

impl Exporter {
    /// 创建输出目录并写入CSV表头
    pub fn create(output_dir: &Path) -> Result<Self> {
        let text_dir = output_dir.join(export_config::TEXT_SUBDIR);
        fs::create_dir_all(&text_dir).map_err(|e| ScrapeError::FileOperation {
            path: text_dir.display().to_string(),
            operation: "创建目录".to_string(),
            source: e.to_string(),
        })?;

        let csv_path = output_dir.join(export_config::CSV_FILE_NAME);
        let file = File::create(&csv_path).map_err(|e| ScrapeError::FileOperation {
            path: csv_path.display().to_string(),
            operation: "创建".to_string(),
            source: e.to_string(),
        })?;

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(export_config::CSV_HEADERS)?;
        writer.flush()?;
        debug!("📄 已创建CSV文件: {}", csv_path.display());

        Ok(Self {
            text_dir,
            csv_path,
            writer,
            written_slugs: HashSet::new(),
            rows_written: 0,
        })
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn text_dir(&self) -> &Path {
        &self.text_dir
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// 导出一个食谱，返回使用的slug
    ///
    /// 名称规范化后相同的食谱会覆盖之前写入的文本文件。
    pub fn export(&mut self, recipe: &Recipe) -> Result<String> {
        let mut slug = slugify(&recipe.name);
        if slug.is_empty() {
            slug = export_config::EMPTY_SLUG_FALLBACK.to_string();
        }

        if !self.written_slugs.insert(slug.clone()) {
            warn!("⚠️  文件名冲突，覆盖之前的文件: {} ({})", slug, recipe.name);
        }

        let targets: [(&str, &[String]); 3] = [
            (export_config::PHOTOS_SUFFIX, &recipe.photos),
            (export_config::INGREDIENTS_SUFFIX, &recipe.ingredients),
            (export_config::STEPS_SUFFIX, &recipe.steps),
        ];
        for (suffix, lines) in targets {
            let path = self.text_dir.join(format!("{}{}", slug, suffix));
            write_lines(&path, lines)?;
        }

        self.writer
            .write_record(recipe.csv_record(export_config::INGREDIENT_SEPARATOR))?;
        self.writer.flush()?;
        self.rows_written += 1;

        info!("💾 已导出: {} -> {}", recipe.name, slug);
        Ok(slug)
    }

    /// 刷新并关闭CSV文件，返回其路径
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        Ok(self.csv_path)
    }
}

/// 每行一个条目写入文件，覆盖已有文件
fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let to_error = |e: std::io::Error| ScrapeError::FileOperation {
        path: path.display().to_string(),
        operation: "写入".to_string(),
        source: e.to_string(),
    };

    let file = File::create(path).map_err(to_error)?;
    let mut out = BufWriter::new(file);
    for line in lines {
        writeln!(out, "{}", line).map_err(to_error)?;
    }
    out.flush().map_err(to_error)?;
    Ok(())
}
