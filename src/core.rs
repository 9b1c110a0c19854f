use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use encoding_rs::UTF_8;

use crate::env::{core::NoColor, EnvVar};
use crate::parsers::lang::{
    count_entries, format_lang_file, format_lang_file_with, parse_lang_file, LineEnding,
    LineRecord,
};
use crate::translation::config::LocaleTable;
use crate::translation::core::service::TranslationRun;
use crate::translation::error::{TranslationError, TranslationResult};

/// 标准输入的占位路径
pub const STDIN_PATH: &str = "-";

/// Supported output formats for translated locales
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum BundleFormat {
    /// 在标准输出打印拼接预览（默认）
    #[default]
    Preview,
    /// 写入 zip 文件
    Zip(PathBuf),
    /// 写入目录
    Directory(PathBuf),
}

/// Configuration options for a translation run
#[derive(Clone, Debug, Default)]
pub struct ToolOptions {
    /// 指定的语言区域，按给定顺序
    pub locales: Vec<String>,
    /// 使用语言区域表中的全部区域
    pub all_locales: bool,
    pub output: BundleFormat,
    /// 覆盖配置中的文件扩展名
    pub extension: Option<String>,
    /// 输入使用 CRLF 时输出也使用 CRLF
    pub keep_line_endings: bool,
    pub silent: bool,
}

impl ToolOptions {
    /// 解析出最终要翻译的语言区域
    ///
    /// `all_locales` 时按语言区域表顺序，否则按用户给出的顺序；重复项只保留第一次出现。
    pub fn selected_locales(&self, table: &LocaleTable) -> Vec<String> {
        let requested = if self.all_locales {
            table.locales()
        } else {
            self.locales.clone()
        };

        let mut selected: Vec<String> = Vec::with_capacity(requested.len());
        for locale in requested {
            let locale = locale.trim();
            if !locale.is_empty() && !selected.iter().any(|existing| existing == locale) {
                selected.push(locale.to_string());
            }
        }
        selected
    }
}

/// 解码输入字节
///
/// 识别 UTF-8 与 UTF-16 的 BOM 并去除；无效字节替换为 U+FFFD。
///
/// # Returns
///
/// 解码后的文本，以及是否出现过无效字节
pub fn decode_source(bytes: &[u8]) -> (String, bool) {
    let (text, encoding, had_errors) = UTF_8.decode(bytes);
    if encoding != UTF_8 {
        tracing::debug!("根据 BOM 使用 {} 解码", encoding.name());
    }
    (text.into_owned(), had_errors)
}

/// 读取语言文件，`-` 表示标准输入
pub fn read_source(path: &str) -> TranslationResult<String> {
    let bytes = if path == STDIN_PATH {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        buffer
    } else {
        fs::read(path).map_err(|e| {
            TranslationError::IoError(format!("无法读取文件 {}: {}", path, e))
        })?
    };

    let (text, had_errors) = decode_source(&bytes);
    if had_errors {
        tracing::warn!("{} 中包含无效的 UTF-8 字节，已替换", path);
    }
    Ok(text)
}

/// 按输入的换行风格重写翻译结果
pub fn apply_line_ending(run: &mut TranslationRun, ending: LineEnding) {
    if ending == LineEnding::Lf {
        return;
    }
    for output in &mut run.outputs {
        output.text = format_lang_file_with(&parse_lang_file(&output.text), ending);
    }
}

/// 语言文件检查结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub lines: usize,
    pub entries: usize,
    /// 值非空、会被翻译的条目
    pub translatable: usize,
    pub raw: usize,
    pub line_ending: LineEnding,
    /// 解析后还原是否与输入逐字节一致
    pub round_trip: bool,
}

/// 解析并检查语言文件
pub fn check_lang_text(text: &str) -> CheckReport {
    let records = parse_lang_file(text);
    let entries = count_entries(&records);
    let translatable = records
        .iter()
        .filter_map(LineRecord::as_entry)
        .filter(|entry| entry.is_translatable())
        .count();
    let line_ending = LineEnding::detect(text);
    let restored = match line_ending {
        LineEnding::Lf => format_lang_file(&records),
        LineEnding::CrLf => format_lang_file_with(&records, line_ending),
    };

    CheckReport {
        lines: records.len(),
        entries,
        translatable,
        raw: records.len() - entries,
        line_ending,
        round_trip: restored == text,
    }
}

/// 替换输出路径中的占位符
///
/// - `%name%`: 输入文件名（不含扩展名），标准输入为 `stdin`
/// - `%count%`: 语言区域数量
pub fn format_output_path(path: &str, source: &str, locale_count: usize) -> String {
    let name = if source == STDIN_PATH {
        "stdin".to_string()
    } else {
        Path::new(source)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    path.replace(
        "%name%",
        name.replace(['/', '\\'], "_")
            .replace(':', " - ")
            .replace(['"', '?'], "")
            .replace('|', "-")
            .trim_start_matches('.'),
    )
    .replace("%count%", &locale_count.to_string())
}

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// Prints an error message to stderr
pub fn print_error_message(msg: &str) {
    if NoColor::get_or_default(false) {
        eprintln!("{msg}");
    } else {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    }
}

/// Prints an info message to stdout
pub fn print_info_message(msg: &str) {
    println!("{msg}");
}
