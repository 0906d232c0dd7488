//! 食谱抓取流水线
//!
//! 起始页 → 链接发现 → 对每个链接依次执行 抓取 → 解析 → 配料去重 → 翻译 → 导出。
//! 单个食谱的任何失败（抓取、解析、翻译、导出）都只记录日志并跳过该食谱，
//! 只有起始页失败会中止整个运行；此时输出目录保持原样，上一轮的CSV不会被覆盖。

// 标准库导入
use std::path::{Path, PathBuf};
use std::time::Instant;

// 第三方crate导入
use tracing::{error, info};
use url::Url;

// 本地模块导入
use crate::config::SelectorRules;
use crate::error::Result;
use crate::exporter::Exporter;
use crate::fetcher::Fetcher;
use crate::links::extract_links;
use crate::normalize::normalize_ingredients;
use crate::parser::RecipeParser;
use crate::recipe::Recipe;
use crate::stats::RunStats;
use crate::translator::Translator;

/// 食谱抓取流水线
pub struct RecipePipeline {
    fetcher: Fetcher,
    rules: SelectorRules,
    parser: RecipeParser,
    translator: Translator,
    output_dir: PathBuf,
}

impl RecipePipeline {
    /// 组装流水线；规则在此处编译，输出文件在起始页成功后才创建
    pub fn new(
        fetcher: Fetcher,
        rules: SelectorRules,
        translator: Translator,
        output_dir: &Path,
    ) -> Result<Self> {
        let parser = RecipeParser::new(&rules)?;

        Ok(Self {
            fetcher,
            rules,
            parser,
            translator,
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// 执行完整运行，返回统计信息
    pub async fn run(self, start_url: &str) -> Result<RunStats> {
        let mut stats = RunStats {
            translated: self.translator.is_enabled(),
            ..Default::default()
        };

        let discovery_start = Instant::now();
        let links = extract_links(&self.fetcher, start_url, &self.rules).await?;
        stats.link_discovery_time = discovery_start.elapsed();
        stats.links_found = links.len();

        let mut exporter = Exporter::create(&self.output_dir)?;

        let processing_start = Instant::now();
        for (index, url) in links.iter().enumerate() {
            info!("🍳 [{}/{}] 处理: {}", index + 1, links.len(), url);

            match self.process(&mut exporter, url).await {
                Ok(recipe) => {
                    stats.recipes_exported += 1;
                    stats.photos_found += recipe.photos.len();
                }
                Err(e) => {
                    error!("❌ 处理失败 {}: {}", url, e);
                    stats.recipes_failed += 1;
                }
            }
        }
        stats.processing_time = processing_start.elapsed();

        let csv_path = exporter.finish()?;
        info!("✅ 食谱已保存到: {}", csv_path.display());

        Ok(stats)
    }

    /// 处理单个食谱链接
    async fn process(&self, exporter: &mut Exporter, url: &Url) -> Result<Recipe> {
        let body = self.fetcher.fetch(url.as_str()).await?;

        let mut recipe = self.parser.parse(&body, url.as_str())?;
        recipe.ingredients = normalize_ingredients(&recipe.ingredients);

        let recipe = self.translator.translate_recipe(recipe).await?;
        exporter.export(&recipe)?;

        Ok(recipe)
    }
}
