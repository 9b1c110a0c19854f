//! 翻译结果打包
//!
//! 把一次翻译的所有语言区域输出写入归档：
//!
//! - `<locale>.<ext>`：每个语言区域一个文件
//! - `languages.json`：按选择顺序排列的语言区域数组
//! - `language_names.json`：`[locale, 显示名称]` 数组，未映射的区域使用其 ID
//!
//! 归档的具体形式由 [`ArchiveSink`] 决定，可以是 zip、目录或内存。

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::translation::config::constants::{LANGUAGES_MANIFEST, LANGUAGE_NAMES_MANIFEST};
use crate::translation::config::LocaleTable;
use crate::translation::core::service::TranslationRun;
use crate::translation::error::{TranslationError, TranslationResult};

/// 归档写入能力
pub trait ArchiveSink {
    /// 完成后的产物
    type Output;

    /// 添加一个文件
    fn add_file(&mut self, name: &str, data: &[u8]) -> TranslationResult<()>;

    /// 完成归档
    fn finish(self) -> TranslationResult<Self::Output>;
}

/// 检查归档内的文件名：不允许路径分隔符或以 `.` 开头
pub fn validate_file_name(name: &str) -> TranslationResult<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(TranslationError::ArchiveError(format!(
            "文件名无效: {}",
            name
        )));
    }
    Ok(())
}

/// 内存中的 zip 归档
pub struct ZipArchive {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl ZipArchive {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(6)),
        }
    }
}

impl Default for ZipArchive {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveSink for ZipArchive {
    type Output = Vec<u8>;

    fn add_file(&mut self, name: &str, data: &[u8]) -> TranslationResult<()> {
        validate_file_name(name)?;
        self.writer.start_file(name, self.options).map_err(|e| {
            TranslationError::ArchiveError(format!("添加文件失败 {}: {}", name, e))
        })?;
        self.writer.write_all(data).map_err(|e| {
            TranslationError::ArchiveError(format!("写入文件失败 {}: {}", name, e))
        })?;
        Ok(())
    }

    fn finish(self) -> TranslationResult<Vec<u8>> {
        let cursor = self
            .writer
            .finish()
            .map_err(|e| TranslationError::ArchiveError(format!("完成压缩包失败: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

/// 写入普通目录
pub struct DirectoryArchive {
    root: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectoryArchive {
    /// 创建目录（如不存在）
    pub fn create(root: impl AsRef<Path>) -> TranslationResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            TranslationError::ArchiveError(format!("创建输出目录失败 {}: {}", root.display(), e))
        })?;
        Ok(Self {
            root,
            written: Vec::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArchiveSink for DirectoryArchive {
    type Output = Vec<PathBuf>;

    fn add_file(&mut self, name: &str, data: &[u8]) -> TranslationResult<()> {
        validate_file_name(name)?;

        let path = self.root.join(name);
        fs::write(&path, data).map_err(|e| {
            TranslationError::ArchiveError(format!("写入文件失败 {}: {}", path.display(), e))
        })?;
        self.written.push(path);
        Ok(())
    }

    fn finish(self) -> TranslationResult<Vec<PathBuf>> {
        Ok(self.written)
    }
}

/// 内存中的文件列表
#[derive(Debug, Default)]
pub struct MemoryArchive {
    files: Vec<(String, Vec<u8>)>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArchiveSink for MemoryArchive {
    type Output = Vec<(String, Vec<u8>)>;

    fn add_file(&mut self, name: &str, data: &[u8]) -> TranslationResult<()> {
        self.files.push((name.to_string(), data.to_vec()));
        Ok(())
    }

    fn finish(self) -> TranslationResult<Self::Output> {
        Ok(self.files)
    }
}

/// 把翻译结果写入归档
///
/// # Arguments
///
/// * `run` - 已完成的翻译，不会再次发起翻译
/// * `sink` - 归档目标
/// * `extension` - 语言文件扩展名，如 `lang`
/// * `locales` - 用于查找显示名称的语言区域表
pub fn write_bundle<S: ArchiveSink>(
    run: &TranslationRun,
    mut sink: S,
    extension: &str,
    locales: &LocaleTable,
) -> TranslationResult<S::Output> {
    let extension = extension.trim_start_matches('.');

    // 先检查全部文件名，避免写出一半的归档
    let names: Vec<String> = run
        .outputs
        .iter()
        .map(|output| format!("{}.{}", output.locale, extension))
        .collect();
    for name in &names {
        validate_file_name(name)?;
    }

    for (name, output) in names.iter().zip(&run.outputs) {
        sink.add_file(name, output.text.as_bytes())?;
    }

    let ids = run.locales();
    let display_names: Vec<[&str; 2]> = ids
        .iter()
        .map(|locale| [locale.as_str(), locales.display_name(locale)])
        .collect();

    sink.add_file(LANGUAGES_MANIFEST, &to_pretty_json(&ids)?)?;
    sink.add_file(LANGUAGE_NAMES_MANIFEST, &to_pretty_json(&display_names)?)?;

    tracing::debug!("已打包 {} 个语言区域", ids.len());
    sink.finish()
}

/// 4 空格缩进的 JSON
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> TranslationResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(buffer)
}
