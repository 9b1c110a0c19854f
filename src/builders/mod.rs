//! # 构建器模块
//!
//! 这个模块包含翻译结果的输出构建器：
//!
//! - 语言文件与清单的打包
//!
//! # 模块组织
//!
//! - `archive` - zip、目录和内存归档

pub mod archive;

// Re-export commonly used items for convenience
pub use archive::{
    to_pretty_json, validate_file_name, write_bundle, ArchiveSink, DirectoryArchive, MemoryArchive, ZipArchive,
};
