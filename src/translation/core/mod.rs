//! 翻译系统核心模块
//!
//! - **提供者** (`provider.rs`): 外部翻译能力的抽象与默认 HTTP 实现
//! - **服务层** (`service.rs`): 协调语言区域解析、收集、批次翻译与缓存
//!
//! ## 模块依赖关系
//!
//! ```text
//! TranslationService (service.rs)
//!     ├── LocaleTable (config/locales.rs)
//!     ├── collect_translatable / merge_translations (pipeline/collector.rs)
//!     ├── BatchTranslator (pipeline/batch.rs)
//!     │       └── TranslationProvider (provider.rs)
//!     └── CacheManager (storage/cache.rs)
//! ```

pub mod provider;
pub mod service;

/// 翻译提供者接口及默认实现
pub use provider::{parse_translate_response, GoogleTranslateProvider, TranslationProvider};

/// 统一翻译服务 - 主要的对外接口
pub use service::{LocaleOutput, TranslationRun, TranslationService};

/// 服务运行统计信息
pub use service::{ServiceStats, ServiceStatsSnapshot};
