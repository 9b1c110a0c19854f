//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值，
//! 以及语言区域到翻译服务语言代码的静态映射表。

pub mod locales;
pub mod manager;

// 重新导出主要类型
pub use locales::{LocaleTable, LocaleTarget, BUILTIN_LOCALES};
pub use manager::{BatchMode, ConfigManager, LocaleOverride, TranslationConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 批次拼接使用的分隔标记，两侧各加一个换行
    pub const BATCH_DELIMITER: &str = "___BDT_SEP_9F3A___";

    // 默认API设置
    pub const DEFAULT_API_URL: &str = "https://translate.googleapis.com/translate_a/single";
    pub const DEFAULT_CLIENT_ID: &str = "gtx";
    pub const DEFAULT_SOURCE_LANG: &str = "auto";
    pub const DEFAULT_FALLBACK_LANG: &str = "en";
    pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const MAX_CONCURRENT_REQUESTS_LIMIT: usize = 100;
    pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

    // 缓存设置
    pub const DEFAULT_LOCAL_CACHE_SIZE: usize = 1000;
    pub const MAX_LOCAL_CACHE_SIZE: usize = 65536;

    // 输出设置
    pub const DEFAULT_FILE_EXTENSION: &str = "lang";
    pub const LANGUAGES_MANIFEST: &str = "languages.json";
    pub const LANGUAGE_NAMES_MANIFEST: &str = "language_names.json";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "lang-translator.toml",
        ".lang-translator.toml",
        "~/.config/lang-translator/config.toml",
    ];
}

/// 加载配置，失败时退回默认配置
pub fn load_translation_config() -> TranslationConfig {
    match ConfigManager::new() {
        Ok(manager) => manager.into_config(),
        Err(e) => {
            tracing::warn!("配置加载失败，使用默认配置: {}", e);
            TranslationConfig::default()
        }
    }
}
