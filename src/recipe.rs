//! 食谱记录
//!
//! 单个页面解析出的结构化结果。所有文本字段缺失时为空字符串而不是None，
//! 调用方只需判断是否为空。

/// 食谱记录
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipe {
    pub name: String,
    pub recipe_type: String,
    /// 配料，已按大小写不敏感去重
    pub ingredients: Vec<String>,
    pub prep_time: String,
    pub cook_time: String,
    pub total_time: String,
    /// 步骤，保持页面顺序，允许重复
    pub steps: Vec<String>,
    /// 图片的绝对URL
    pub photos: Vec<String>,
}

impl Recipe {
    /// 创建只有名称的食谱
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// 返回CSV行：名称、类型、配料、准备时间、烹饪时间、总时间
    pub fn csv_record(&self, ingredient_separator: &str) -> [String; 6] {
        [
            self.name.clone(),
            self.recipe_type.clone(),
            self.ingredients.join(ingredient_separator),
            self.prep_time.clone(),
            self.cook_time.clone(),
            self.total_time.clone(),
        ]
    }
}
