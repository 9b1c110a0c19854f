//! # lang-translator Library
//!
//! 将 `key=value` 形式的 `.lang` 语言资源文件批量机器翻译为多个语言区域，
//! 并可打包为 zip 或目录。
//!
//! ## 模块组织
//!
//! - `core` - 运行选项、输入读取与检查
//! - `parsers` - `.lang` 文件编解码
//! - `builders` - 翻译结果打包
//! - `translation` - 翻译服务、批次翻译、缓存与配置
//! - `env` - 环境变量

pub mod builders;
pub mod core;
pub mod env;
pub mod parsers;
pub mod translation;

// Re-export commonly used items for convenience
pub use builders::*;
pub use self::core::*;
pub use parsers::*;
pub use translation::{
    TranslationConfig, TranslationError, TranslationResult, TranslationRun, TranslationService,
};
