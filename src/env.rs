//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问

use std::env;
use std::fmt;

use crate::translation::config::{constants, BatchMode};

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    /// 未设置时实际生效的值，用于 `DEFAULT` 无法表达的情况（仅用于文档）
    fn effective_default() -> Option<String> {
        None
    }

    /// 读取变量，未设置时返回默认值
    fn get() -> EnvResult<T> {
        match Self::lookup() {
            Some(result) => result,
            None => Self::DEFAULT.ok_or_else(|| EnvError {
                variable: Self::NAME.to_string(),
                message: "Required environment variable not set".to_string(),
            }),
        }
    }

    /// 仅在变量已设置时解析
    fn lookup() -> Option<EnvResult<T>> {
        env::var(Self::NAME).ok().map(|value| Self::parse(&value))
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 用已设置的环境变量覆盖目标值；无效值记录警告后忽略
pub fn env_override<T, V: EnvVar<T>>(target: &mut T) {
    match V::lookup() {
        Some(Ok(value)) => *target = value,
        Some(Err(e)) => tracing::warn!("忽略无效的环境变量: {}", e),
        None => {}
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "LANG_TRANSLATOR_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn effective_default() -> Option<String> {
            Some("info".to_string())
        }

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何非空值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 源语言
    pub struct SourceLang;
    impl EnvVar<String> for SourceLang {
        const NAME: &'static str = "LANG_TRANSLATOR_SOURCE_LANG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Source language for translation ('auto' for detection)";

        fn effective_default() -> Option<String> {
            Some(constants::DEFAULT_SOURCE_LANG.to_string())
        }

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(constants::DEFAULT_SOURCE_LANG.to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            let lang = value.trim();
            if lang.eq_ignore_ascii_case("auto") {
                Ok("auto".to_string())
            } else {
                parse_lang_code(lang, Self::NAME)
            }
        }
    }

    /// 未映射语言区域使用的语言代码
    pub struct FallbackLang;
    impl EnvVar<String> for FallbackLang {
        const NAME: &'static str = "LANG_TRANSLATOR_FALLBACK_LANG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Language code used for locales missing from the locale table";

        fn effective_default() -> Option<String> {
            Some(constants::DEFAULT_FALLBACK_LANG.to_string())
        }

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(constants::DEFAULT_FALLBACK_LANG.to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            parse_lang_code(value.trim(), Self::NAME)
        }
    }

    /// API URL
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "LANG_TRANSLATOR_API_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Translation API endpoint URL";

        fn effective_default() -> Option<String> {
            Some(constants::DEFAULT_API_URL.to_string())
        }

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(constants::DEFAULT_API_URL.to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 批次模式
    pub struct Mode;
    impl EnvVar<BatchMode> for Mode {
        const NAME: &'static str = "LANG_TRANSLATOR_BATCH_MODE";
        const DEFAULT: Option<BatchMode> = Some(BatchMode::Combined);
        const DESCRIPTION: &'static str = "Batch strategy: combined (one request, per-item fallback) or per_item";

        fn parse(value: &str) -> EnvResult<BatchMode> {
            value.parse().map_err(|e: crate::translation::TranslationError| EnvError {
                variable: Self::NAME.to_string(),
                message: e.to_string(),
            })
        }
    }

    /// 最大并发请求数
    pub struct MaxConcurrentRequests;
    impl EnvVar<usize> for MaxConcurrentRequests {
        const NAME: &'static str = "LANG_TRANSLATOR_MAX_CONCURRENT_REQUESTS";
        const DEFAULT: Option<usize> = Some(constants::DEFAULT_MAX_CONCURRENT_REQUESTS);
        const DESCRIPTION: &'static str = "Maximum concurrent per-item requests to translation API";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, constants::MAX_CONCURRENT_REQUESTS_LIMIT)
        }
    }

    /// 单个请求超时（秒）
    pub struct RequestTimeout;
    impl EnvVar<u64> for RequestTimeout {
        const NAME: &'static str = "LANG_TRANSLATOR_REQUEST_TIMEOUT";
        const DEFAULT: Option<u64> = Some(30);
        const DESCRIPTION: &'static str = "Translation request timeout in seconds";

        fn parse(value: &str) -> EnvResult<u64> {
            let max = constants::MAX_REQUEST_TIMEOUT_SECS as usize;
            let seconds = parse_positive_usize(value, Self::NAME, 1, max)?;
            Ok(seconds as u64)
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// 缓存启用状态
    pub struct Enabled;
    impl EnvVar<bool> for Enabled {
        const NAME: &'static str = "LANG_TRANSLATOR_CACHE_ENABLED";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str = "Reuse translations of identical values within a run";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 本地缓存大小
    pub struct LocalCacheSize;
    impl EnvVar<usize> for LocalCacheSize {
        const NAME: &'static str = "LANG_TRANSLATOR_CACHE_SIZE";
        const DEFAULT: Option<usize> = Some(constants::DEFAULT_LOCAL_CACHE_SIZE);
        const DESCRIPTION: &'static str = "Translation cache size (number of entries)";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, constants::MAX_LOCAL_CACHE_SIZE)
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

fn parse_lang_code(value: &str, var_name: &str) -> EnvResult<String> {
    if crate::translation::config::manager::is_lang_code(value) {
        Ok(value.to_string())
    } else {
        Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Invalid language code '{}' (2-5 characters, e.g. 'de' or 'zh-CN')", value),
        })
    }
}

fn doc_line<T: fmt::Debug, V: EnvVar<T>>() -> String {
    let default = V::effective_default()
        .or_else(|| V::DEFAULT.map(|value| format!("{:?}", value)))
        .unwrap_or_else(|| "none".to_string());
    format!("- `{}`: {} (default: {})\n", V::NAME, V::DESCRIPTION, default)
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&doc_line::<_, core::LogLevel>());
    docs.push_str(&doc_line::<_, core::NoColor>());

    docs.push_str("\n## Translation Configuration\n\n");
    docs.push_str(&doc_line::<_, translation::SourceLang>());
    docs.push_str(&doc_line::<_, translation::FallbackLang>());
    docs.push_str(&doc_line::<_, translation::ApiUrl>());
    docs.push_str(&doc_line::<_, translation::Mode>());
    docs.push_str(&doc_line::<_, translation::MaxConcurrentRequests>());
    docs.push_str(&doc_line::<_, translation::RequestTimeout>());

    docs.push_str("\n## Cache Configuration\n\n");
    docs.push_str(&doc_line::<_, cache::Enabled>());
    docs.push_str(&doc_line::<_, cache::LocalCacheSize>());

    docs
}
