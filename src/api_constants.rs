/// 抓取与翻译相关常量配置
///
/// 该文件定义了HTTP抓取、翻译服务、导出格式和默认选择器规则的常量，方便统一管理和维护

/// HTTP抓取配置
pub mod http_config {
    /// 默认User-Agent（伪装为常见桌面浏览器）
    pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

    /// 最大尝试次数（包含首次请求）
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// 重试延迟基数（毫秒），之后按2的幂递增
    pub const RETRY_DELAY_BASE_MS: u64 = 1000;

    /// 需要重试的瞬时失败状态码
    pub const RETRYABLE_STATUS_CODES: &[u16] = &[429, 500, 502, 503, 504, 403];

    /// 食谱页面请求超时时间（秒）
    pub const PAGE_TIMEOUT_SECONDS: u64 = 30;

    /// 图片下载请求超时时间（秒）
    pub const IMAGE_TIMEOUT_SECONDS: u64 = 10;
}

/// 翻译服务配置
pub mod translation_config {
    /// DeepL 付费接口地址
    pub const DEEPL_PRO_API_URL: &str = "https://api.deepl.com/v2/translate";

    /// DeepL 免费接口地址
    pub const DEEPL_FREE_API_URL: &str = "https://api-free.deepl.com/v2/translate";

    /// 提供API密钥的环境变量
    pub const API_KEY_ENV: &str = "DEEPL_API_KEY";

    /// 覆盖API地址的环境变量
    pub const API_URL_ENV: &str = "DEEPL_API_URL";

    /// 默认目标语言
    pub const DEFAULT_TARGET_LANG: &str = "RU";

    /// 支持的目标语言代码
    pub const SUPPORTED_LANGUAGES: &[&str] = &[
        "AR", "BG", "CS", "DA", "DE", "EL", "EN", "EN-GB", "EN-US", "ES", "ET", "FI",
        "FR", "HU", "ID", "IT", "JA", "KO", "LT", "LV", "NB", "NL", "PL", "PT",
        "PT-BR", "PT-PT", "RO", "RU", "SK", "SL", "SV", "TR", "UK", "ZH",
    ];

    /// 单次请求最多携带的文本条数
    pub const MAX_TEXTS_PER_REQUEST: usize = 50;

    /// 请求超时时间（秒）
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
}

/// 导出格式配置
pub mod export_config {
    /// 默认输出目录
    pub const DEFAULT_OUTPUT_DIR: &str = "output";

    /// 默认图片目录
    pub const DEFAULT_IMAGES_DIR: &str = "images";

    /// 文本文件子目录
    pub const TEXT_SUBDIR: &str = "text";

    /// CSV文件名
    pub const CSV_FILE_NAME: &str = "recipes.csv";

    /// CSV表头（本地化列名）
    pub const CSV_HEADERS: [&str; 6] = [
        "Название",
        "Тип",
        "Ингредиенты",
        "Время на подготовку",
        "Время на готовку",
        "Всего времени",
    ];

    /// CSV中配料的连接符
    pub const INGREDIENT_SEPARATOR: &str = ", ";

    /// 照片列表文件后缀
    pub const PHOTOS_SUFFIX: &str = "_photos.txt";

    /// 配料列表文件后缀
    pub const INGREDIENTS_SUFFIX: &str = "_ingredients.txt";

    /// 步骤列表文件后缀
    pub const STEPS_SUFFIX: &str = "_steps.txt";

    /// 名称为空时使用的文件名前缀
    pub const EMPTY_SLUG_FALLBACK: &str = "untitled";

    /// URL路径没有文件名时使用的图片名
    pub const IMAGE_FALLBACK_NAME: &str = "image";
}

/// 默认选择器规则（针对示例站点的标记结构）
pub mod selector_defaults {
    pub const LINK: &str = "a[href]";
    pub const LINK_PATTERN: &str = "recipe";
    pub const NAME: &str = "h1";
    pub const RECIPE_TYPE: &str = ".type";
    pub const INGREDIENT: &str = "li.ingredient";
    pub const PREP_TIME: &str = "time.prep";
    pub const COOK_TIME: &str = "time.cook";
    pub const TOTAL_TIME: &str = "time.total";
    pub const STEP: &str = ".steps p";
    pub const PHOTO: &str = "img";
    pub const PHOTO_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];
}

/// 判断状态码是否属于可重试的瞬时失败
pub fn is_retryable_status(status: u16) -> bool {
    http_config::RETRYABLE_STATUS_CODES.contains(&status)
}

/// 根据密钥类型选择DeepL接口地址（免费密钥以":fx"结尾）
pub fn deepl_api_url_for_key(auth_key: &str) -> &'static str {
    if auth_key.ends_with(":fx") {
        translation_config::DEEPL_FREE_API_URL
    } else {
        translation_config::DEEPL_PRO_API_URL
    }
}

/// 验证API URL是否有效
pub fn is_valid_api_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// 验证语言代码是否支持（大小写不敏感）
pub fn is_supported_language(lang: &str) -> bool {
    let upper = lang.to_ascii_uppercase();
    translation_config::SUPPORTED_LANGUAGES.contains(&upper.as_str())
}
