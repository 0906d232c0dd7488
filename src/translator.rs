//! 食谱文本翻译
//!
//! 未配置API密钥时翻译器为恒等映射。配置后把一个食谱的所有文本字段
//! 按批次发送到DeepL兼容接口，并按原顺序写回。

use reqwest::{header, Client};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::TranslationConfig;
use crate::error::{Result, ScrapeError};
use crate::recipe::Recipe;

/// 翻译后端连接信息
#[derive(Debug, Clone)]
struct Backend {
    client: Client,
    api_url: String,
    auth_key: String,
}

/// 文本翻译器
#[derive(Debug, Clone)]
pub struct Translator {
    backend: Option<Backend>,
    target_lang: String,
    batch_size: usize,
}

impl Translator {
    /// 创建禁用状态的翻译器（恒等映射）
    pub fn disabled() -> Self {
        let config = TranslationConfig::new();
        Self {
            backend: None,
            target_lang: config.target_lang().to_string(),
            batch_size: config.batch_size(),
        }
    }

    /// 根据配置创建翻译器；没有密钥时返回禁用状态
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let backend = match config.auth_key() {
            Some(key) => {
                let client = Client::builder()
                    .timeout(config.timeout())
                    .build()
                    .map_err(|e| ScrapeError::Configuration {
                        field: "translation_client".to_string(),
                        reason: e.to_string(),
                    })?;
                Some(Backend {
                    client,
                    api_url: config.api_url().to_string(),
                    auth_key: key.to_string(),
                })
            }
            None => None,
        };

        Ok(Self {
            backend,
            target_lang: config.target_lang().to_string(),
            batch_size: config.batch_size().max(1),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn target_lang(&self) -> &str {
        &self.target_lang
    }

    /// 翻译单条文本
    pub async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        let mut translated = self
            .translate_batch(&[text.to_string()], target_lang)
            .await?;
        Ok(translated.pop().unwrap_or_default())
    }

    /// 批量翻译，结果与输入一一对应；空字符串原样保留，不发送给服务
    pub async fn translate_batch(&self, texts: &[String], target_lang: &str) -> Result<Vec<String>> {
        let mut results = texts.to_vec();
        let Some(backend) = &self.backend else {
            return Ok(results);
        };

        let pending: Vec<usize> = texts
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .map(|(i, _)| i)
            .collect();

        for (batch_idx, chunk) in pending.chunks(self.batch_size).enumerate() {
            let batch: Vec<&str> = chunk.iter().map(|&i| texts[i].as_str()).collect();
            debug!("🌐 翻译批次 {}: {} 条文本", batch_idx + 1, batch.len());

            let translated = request_translations(backend, &batch, target_lang).await?;
            for (&index, text) in chunk.iter().zip(translated) {
                results[index] = text;
            }
        }

        Ok(results)
    }

    /// 翻译食谱的全部文本字段（图片地址不翻译）
    pub async fn translate_recipe(&self, recipe: Recipe) -> Result<Recipe> {
        if !self.is_enabled() {
            return Ok(recipe);
        }

        let Recipe {
            name,
            recipe_type,
            ingredients,
            prep_time,
            cook_time,
            total_time,
            steps,
            photos,
        } = recipe;

        let ingredient_count = ingredients.len();
        let mut texts = vec![name, recipe_type, prep_time, cook_time, total_time];
        texts.extend(ingredients);
        texts.extend(steps);

        let mut translated = self
            .translate_batch(&texts, &self.target_lang)
            .await?
            .into_iter();

        let mut next = || translated.next().unwrap_or_default();
        let name = next();
        let recipe_type = next();
        let prep_time = next();
        let cook_time = next();
        let total_time = next();
        let ingredients: Vec<String> = (0..ingredient_count).map(|_| next()).collect();
        let steps: Vec<String> = translated.collect();

        info!("🌐 已翻译食谱: {}", name);

        Ok(Recipe {
            name,
            recipe_type,
            ingredients,
            prep_time,
            cook_time,
            total_time,
            steps,
            photos,
        })
    }
}

/// 发送一个翻译批次
async fn request_translations(backend: &Backend, texts: &[&str], target_lang: &str) -> Result<Vec<String>> {
    let response = backend
        .client
        .post(&backend.api_url)
        .header(
            header::AUTHORIZATION,
            format!("DeepL-Auth-Key {}", backend.auth_key),
        )
        .json(&json!({
            "text": texts,
            "target_lang": target_lang,
        }))
        .send()
        .await
        .map_err(|e| ScrapeError::TranslationApi {
            status_code: None,
            message: format!("发送翻译请求失败: {}", e),
            api_url: backend.api_url.clone(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::TranslationApi {
            status_code: Some(status.as_u16()),
            message: format!("翻译API返回错误状态: {}", status),
            api_url: backend.api_url.clone(),
        });
    }

    let body = response.text().await.map_err(|e| ScrapeError::TranslationApi {
        status_code: Some(status.as_u16()),
        message: format!("读取响应失败: {}", e),
        api_url: backend.api_url.clone(),
    })?;

    parse_translation_response(&body, texts.len()).map_err(|message| ScrapeError::TranslationApi {
        status_code: Some(status.as_u16()),
        message,
        api_url: backend.api_url.clone(),
    })
}

/// 解析`{"translations": [{"text": ...}, ...]}`，条数必须与请求一致
fn parse_translation_response(body: &str, expected: usize) -> std::result::Result<Vec<String>, String> {
    let json_val: Value =
        serde_json::from_str(body).map_err(|e| format!("响应不是有效的JSON: {}", e))?;

    let items = json_val
        .get("translations")
        .and_then(|v| v.as_array())
        .ok_or_else(|| "响应缺少translations字段".to_string())?;

    let translations: Vec<String> = items
        .iter()
        .map(|item| {
            item.get("text")
                .and_then(|t| t.as_str())
                .map(str::to_string)
                .ok_or_else(|| "翻译条目缺少text字段".to_string())
        })
        .collect::<std::result::Result<_, _>>()?;

    if translations.len() != expected {
        return Err(format!(
            "翻译条数不匹配: 请求 {} 条, 返回 {} 条",
            expected,
            translations.len()
        ));
    }

    Ok(translations)
}
