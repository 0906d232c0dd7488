//! 食谱页面解析模块
//!
//! 按站点选择器规则从单个页面中提取食谱字段。只有名称是必填项，
//! 其余字段缺失时为空字符串或空列表。

// 第三方crate导入
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

// 本地模块导入
use crate::config::SelectorRules;
use crate::error::{Result, ScrapeError};
use crate::recipe::Recipe;

/// 编译CSS选择器，失败时返回配置错误
pub(crate) fn compile_selector(field: &str, css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Configuration {
        field: field.to_string(),
        reason: format!("无效的选择器 {:?}: {}", css, e),
    })
}

/// 元素的全部文本，内部空白折叠为单个空格并去除首尾空白
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 预编译的食谱解析器
///
/// 规则在创建时编译一次，之后可对任意多个页面复用。
#[derive(Debug, Clone)]
pub struct RecipeParser {
    name: Selector,
    recipe_type: Selector,
    ingredient: Selector,
    prep_time: Selector,
    cook_time: Selector,
    total_time: Selector,
    step: Selector,
    photo: Selector,
    photo_extensions: Vec<String>,
}

impl RecipeParser {
    /// 根据站点规则创建解析器
    pub fn new(rules: &SelectorRules) -> Result<Self> {
        Ok(Self {
            name: compile_selector("name", &rules.name)?,
            recipe_type: compile_selector("recipe_type", &rules.recipe_type)?,
            ingredient: compile_selector("ingredient", &rules.ingredient)?,
            prep_time: compile_selector("prep_time", &rules.prep_time)?,
            cook_time: compile_selector("cook_time", &rules.cook_time)?,
            total_time: compile_selector("total_time", &rules.total_time)?,
            step: compile_selector("step", &rules.step)?,
            photo: compile_selector("photo", &rules.photo)?,
            photo_extensions: rules
                .photo_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        })
    }

    /// 解析页面内容
    ///
    /// 页面没有名称元素时返回`ScrapeError::Parse`。
    pub fn parse(&self, page_body: &str, page_url: &str) -> Result<Recipe> {
        let base = Url::parse(page_url).map_err(|e| ScrapeError::Parse {
            url: page_url.to_string(),
            details: format!("页面URL无效: {}", e),
        })?;
        let document = Html::parse_document(page_body);

        let name = document
            .select(&self.name)
            .next()
            .map(element_text)
            .ok_or_else(|| ScrapeError::Parse {
                url: page_url.to_string(),
                details: "页面缺少食谱名称元素".to_string(),
            })?;

        let recipe = Recipe {
            name,
            recipe_type: first_text(&document, &self.recipe_type),
            ingredients: all_texts(&document, &self.ingredient),
            prep_time: first_text(&document, &self.prep_time),
            cook_time: first_text(&document, &self.cook_time),
            total_time: first_text(&document, &self.total_time),
            steps: all_texts(&document, &self.step),
            photos: self.photo_urls(&document, &base),
        };

        debug!(
            "🧾 解析 {}: {} 个配料, {} 个步骤, {} 张图片",
            page_url,
            recipe.ingredients.len(),
            recipe.steps.len(),
            recipe.photos.len()
        );

        Ok(recipe)
    }

    fn photo_urls(&self, document: &Html, base: &Url) -> Vec<String> {
        let mut photos = Vec::new();

        for img in document.select(&self.photo) {
            let Some(src) = img.value().attr("src") else {
                continue;
            };
            if !self.has_photo_extension(src) {
                continue;
            }
            match base.join(src) {
                Ok(resolved) => photos.push(resolved.to_string()),
                Err(e) => debug!("跳过无法解析的图片地址 {:?}: {}", src, e),
            }
        }

        photos
    }

    fn has_photo_extension(&self, src: &str) -> bool {
        let lowered = src.to_lowercase();
        self.photo_extensions.iter().any(|ext| lowered.ends_with(ext))
    }
}

fn first_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn all_texts(document: &Html, selector: &Selector) -> Vec<String> {
    document.select(selector).map(element_text).collect()
}

/// 便捷函数：使用默认规则解析页面
pub fn parse_recipe(page_body: &str, page_url: &str) -> Result<Recipe> {
    RecipeParser::new(&SelectorRules::default())?.parse(page_body, page_url)
}
