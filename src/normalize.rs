//! 配料规范化

use std::collections::HashSet;

/// 按大小写不敏感去重配料，保留首次出现的原始写法与整体顺序
pub fn normalize_ingredients<S: AsRef<str>>(ingredients: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for ingredient in ingredients {
        let line = ingredient.as_ref();
        let key = line.trim().to_lowercase();
        if seen.insert(key) {
            result.push(line.to_string());
        }
    }

    result
}
