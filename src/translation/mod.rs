//! 翻译模块
//!
//! 提供 `.lang` 资源文件的批量机器翻译，采用清晰的模块化架构：
//! - **core**: 翻译提供者与翻译服务
//! - **pipeline**: 文本处理管道（收集、批次）
//! - **storage**: 翻译结果缓存
//! - **config**: 配置管理与语言区域表
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use lang_translator::translation::{TranslationConfig, TranslationService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TranslationService::create_default(TranslationConfig::default())?;
//! let run = service
//!     .translate_locales("menu.quit=Quit", &["ja_JP".to_string()])
//!     .await?;
//! for output in &run.outputs {
//!     println!("{}: {}", output.locale, output.text);
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// 子模块声明
// ============================================================================

/// 配置管理模块 - 翻译接口、并发、缓存与语言区域配置
pub mod config;

/// 核心翻译模块 - 翻译提供者与翻译服务
pub mod core;

/// 错误处理模块 - 统一的错误类型和处理机制
pub mod error;

/// 文本处理管道模块 - 可翻译值的收集与批次翻译
pub mod pipeline;

/// 存储管理模块 - 翻译结果缓存
pub mod storage;

// ============================================================================
// 核心API导出
// ============================================================================

pub use self::core::{
    GoogleTranslateProvider, LocaleOutput, ServiceStats, ServiceStatsSnapshot,
    TranslationProvider, TranslationRun, TranslationService,
};

pub use config::{
    constants, BatchMode, ConfigManager, LocaleOverride, LocaleTable, LocaleTarget,
    TranslationConfig,
};

pub use error::{ErrorCategory, ErrorSeverity, TranslationError, TranslationResult};

// ============================================================================
// 高级API导出
// ============================================================================

pub use pipeline::{
    collect_translatable, merge_translations, BatchConfig, BatchReport, BatchStrategy,
    BatchTranslator, CollectedTexts, TextItem,
};

pub use storage::{CacheConfig, CacheManager, CacheStats};

// ============================================================================
// 便利函数
// ============================================================================

/// 使用默认翻译服务把 `.lang` 文本翻译到多个语言区域
///
/// # Examples
///
/// ```rust,no_run
/// use lang_translator::translation::translate_lang_content;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let run = translate_lang_content("title=Settings", &["de_DE".to_string()]).await?;
/// print!("{}", run.preview());
/// # Ok(())
/// # }
/// ```
pub async fn translate_lang_content(
    source_text: &str,
    locales: &[String],
) -> TranslationResult<TranslationRun> {
    let service = TranslationService::create_default(config::load_translation_config())?;
    service.translate_locales(source_text, locales).await
}
