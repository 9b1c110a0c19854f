//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::error::{helpers, TranslationError, TranslationResult};

/// 批次翻译策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// 先尝试一次合并请求，数量不符或失败时逐条翻译
    #[default]
    Combined,
    /// 始终逐条翻译
    PerItem,
}

impl std::str::FromStr for BatchMode {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "combined" | "batch" => Ok(BatchMode::Combined),
            "per_item" | "single" => Ok(BatchMode::PerItem),
            other => Err(helpers::config_error(format!(
                "未知的批次模式 '{}'，可选: combined, per_item",
                other
            ))),
        }
    }
}

/// 额外的或覆盖内置表的语言区域
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocaleOverride {
    pub locale: String,
    pub lang_code: String,
    pub display_name: String,
}

/// 翻译配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    // 基础配置
    pub source_lang: String,
    pub api_url: String,
    pub client_id: String,
    /// 语言区域不在映射表中时使用的语言代码
    pub fallback_lang: String,

    // 批次与并发
    pub batch_mode: BatchMode,
    pub max_concurrent_requests: usize,
    pub request_timeout_secs: u64,

    // 缓存配置
    pub cache_enabled: bool,
    pub local_cache_size: usize,

    // 输出配置
    pub file_extension: String,

    pub locale_overrides: Vec<LocaleOverride>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source_lang: constants::DEFAULT_SOURCE_LANG.to_string(),
            api_url: constants::DEFAULT_API_URL.to_string(),
            client_id: constants::DEFAULT_CLIENT_ID.to_string(),
            fallback_lang: constants::DEFAULT_FALLBACK_LANG.to_string(),

            batch_mode: BatchMode::default(),
            max_concurrent_requests: constants::DEFAULT_MAX_CONCURRENT_REQUESTS,
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT.as_secs(),

            cache_enabled: true,
            local_cache_size: constants::DEFAULT_LOCAL_CACHE_SIZE,

            file_extension: constants::DEFAULT_FILE_EXTENSION.to_string(),

            locale_overrides: Vec::new(),
        }
    }
}

impl TranslationConfig {
    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if !(1..=constants::MAX_CONCURRENT_REQUESTS_LIMIT).contains(&self.max_concurrent_requests) {
            return Err(helpers::config_error(format!(
                "最大并发数必须在 1 到 {} 之间",
                constants::MAX_CONCURRENT_REQUESTS_LIMIT
            )));
        }

        if !(1..=constants::MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(helpers::config_error(format!(
                "请求超时必须在 1 到 {} 秒之间",
                constants::MAX_REQUEST_TIMEOUT_SECS
            )));
        }

        if self.cache_enabled
            && !(1..=constants::MAX_LOCAL_CACHE_SIZE).contains(&self.local_cache_size)
        {
            return Err(helpers::config_error(format!(
                "启用缓存时缓存大小必须在 1 到 {} 之间",
                constants::MAX_LOCAL_CACHE_SIZE
            )));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(helpers::config_error(format!(
                "API URL 必须以 http:// 或 https:// 开头: {}",
                self.api_url
            )));
        }

        let extension = self.file_extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(helpers::config_error(format!(
                "文件扩展名无效: '{}'",
                self.file_extension
            )));
        }

        if self.source_lang != "auto" && !is_lang_code(&self.source_lang) {
            return Err(helpers::config_error(format!(
                "源语言代码无效: '{}'",
                self.source_lang
            )));
        }

        if !is_lang_code(&self.fallback_lang) {
            return Err(helpers::config_error(format!(
                "默认语言代码无效: '{}'",
                self.fallback_lang
            )));
        }

        for entry in &self.locale_overrides {
            if entry.locale.trim().is_empty() || !is_lang_code(&entry.lang_code) {
                return Err(helpers::config_error(format!(
                    "语言区域配置无效: {} -> {}",
                    entry.locale, entry.lang_code
                )));
            }
        }

        Ok(())
    }

    /// 应用环境变量覆盖，只处理已设置的变量
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{cache, env_override, translation};

        env_override::<_, translation::SourceLang>(&mut self.source_lang);
        env_override::<_, translation::ApiUrl>(&mut self.api_url);
        env_override::<_, translation::FallbackLang>(&mut self.fallback_lang);
        env_override::<_, translation::Mode>(&mut self.batch_mode);
        env_override::<_, translation::MaxConcurrentRequests>(&mut self.max_concurrent_requests);
        env_override::<_, translation::RequestTimeout>(&mut self.request_timeout_secs);
        env_override::<_, cache::Enabled>(&mut self.cache_enabled);
        env_override::<_, cache::LocalCacheSize>(&mut self.local_cache_size);
    }

    /// 转换为Duration类型
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 不带前导点的扩展名
    pub fn extension(&self) -> &str {
        self.file_extension.trim_start_matches('.')
    }
}

/// 翻译服务语言代码：2 到 5 个字符，字母开头，可带 `-` 地区后缀（如 `zh-CN`）
pub(crate) fn is_lang_code(code: &str) -> bool {
    let len = code.len();
    (2..=5).contains(&len)
        && code.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// 简化的配置管理器
pub struct ConfigManager {
    config: TranslationConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器：搜索配置文件，应用环境变量，然后验证
    pub fn new() -> TranslationResult<Self> {
        Self::load_dotenv();
        let config = Self::load_config()?;
        Self::finish(config)
    }

    /// 从指定文件创建配置管理器
    pub fn from_path(path: impl AsRef<Path>) -> TranslationResult<Self> {
        Self::load_dotenv();
        let config = Self::load_from_file(path.as_ref())?;
        Self::finish(config)
    }

    fn finish(mut config: TranslationConfig) -> TranslationResult<Self> {
        config.apply_env_overrides();
        config.validate()?;
        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn into_config(self) -> TranslationConfig {
        self.config
    }

    /// 按搜索路径查找配置文件
    fn load_config() -> TranslationResult<TranslationConfig> {
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            let candidate = Path::new(expanded_path.as_ref());
            if candidate.exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(candidate);
            }
        }

        tracing::debug!("未找到配置文件，使用默认配置");
        Ok(TranslationConfig::default())
    }

    /// 从指定文件加载配置，`.json` 按 JSON 解析，其余按 TOML 解析
    pub fn load_from_file(path: &Path) -> TranslationResult<TranslationConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TranslationError::ConfigError(format!("读取配置文件失败: {}", e))
                .with_context(path.display())
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            serde_json::from_str(&content).map_err(|e| {
                TranslationError::ConfigError(format!("解析JSON配置失败: {}", e))
            })?
        } else {
            toml::from_str(&content)?
        };

        Ok(config)
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: impl AsRef<Path>) -> TranslationResult<()> {
        let mut config = TranslationConfig::default();
        config.locale_overrides.push(LocaleOverride {
            locale: "es_AR".to_string(),
            lang_code: "es".to_string(),
            display_name: "Español (Argentina)".to_string(),
        });
        let content = toml::to_string_pretty(&config)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}
