//! # 解析器模块
//!
//! 这个模块包含语言资源文件的解析与还原：
//!
//! - `key=value` 行的拆分与空白保留
//! - 注释、空行和无效行的原样透传
//!
//! # 模块组织
//!
//! - `lang` - `.lang` 文件的行级编解码

pub mod lang;

// Re-export commonly used items for convenience
pub use lang::{
    count_entries, format_lang_file, format_lang_file_with, parse_lang_file, parse_line, Entry,
    LineEnding, LineRecord,
};
