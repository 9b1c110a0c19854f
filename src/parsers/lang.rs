//! `.lang` 资源文件编解码模块
//!
//! 将 `key=value` 形式的语言文件解析为有序的行记录，并能把记录原样还原为文本。
//! 未被翻译修改过的行在还原后与输入逐字节一致。

use std::sync::OnceLock;

use regex::Regex;

/// 值两侧空白与核心文本的拆分规则
static VALUE_REGEX: OnceLock<Regex> = OnceLock::new();

fn value_regex() -> &'static Regex {
    VALUE_REGEX.get_or_init(|| Regex::new(r"^(\s*)(.*?)(\s*)$").expect("值拆分正则无效"))
}

/// 单行记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRecord {
    /// 注释、空行或无法识别的行，原样保留
    Raw { text: String },
    /// `key=value` 条目
    Entry(Entry),
}

/// 以第一个 `=` 拆分的键值行
///
/// `leading` 与 `trailing` 保存值两侧的原始空白，`core` 中不包含首尾空白。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// `=` 之前的原始片段（未裁剪）
    pub key_part: String,
    pub leading: String,
    /// 可翻译的核心文本
    pub core: String,
    pub trailing: String,
}

impl Entry {
    /// 裁剪后的键名
    pub fn key(&self) -> &str {
        trim_line(&self.key_part)
    }

    /// 值是否包含需要翻译的内容
    pub fn is_translatable(&self) -> bool {
        !self.core.trim().is_empty()
    }

    /// 还原为一行文本
    pub fn to_line(&self) -> String {
        format!("{}={}{}{}", self.key_part, self.leading, self.core, self.trailing)
    }
}

impl LineRecord {
    pub fn raw(text: impl Into<String>) -> Self {
        LineRecord::Raw { text: text.into() }
    }

    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            LineRecord::Entry(entry) => Some(entry),
            LineRecord::Raw { .. } => None,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, LineRecord::Entry(_))
    }

    /// 还原为一行文本（不含换行符）
    pub fn to_line(&self) -> String {
        match self {
            LineRecord::Raw { text } => text.clone(),
            LineRecord::Entry(entry) => entry.to_line(),
        }
    }
}

/// 输出时使用的换行符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// 根据输入文本推断换行符：只要出现 `\r\n` 即视为 CRLF
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// 解析语言文件
///
/// 同时支持 `\n` 与 `\r\n` 换行。每一行产生一条记录，记录顺序与输入一致。
/// 只有紧接在 `\n` 之前的 `\r` 属于换行符；末行结尾的 `\r` 保留在行内。
///
/// # Arguments
///
/// * `input` - 语言文件的完整文本
///
/// # Returns
///
/// 行记录列表；空输入得到一条空的 `Raw` 记录
pub fn parse_lang_file(input: &str) -> Vec<LineRecord> {
    let mut lines: Vec<&str> = input.split('\n').collect();
    let last = lines.len() - 1;
    for line in &mut lines[..last] {
        let text: &str = *line;
        *line = text.strip_suffix('\r').unwrap_or(text);
    }
    lines.into_iter().map(parse_line).collect()
}

/// 裁剪空白，并把 BOM（U+FEFF）当作空白
fn trim_line(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// 解析单行
pub fn parse_line(line: &str) -> LineRecord {
    let trimmed = trim_line(line);
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
        return LineRecord::raw(line);
    }

    let Some(separator_index) = line.find('=') else {
        return LineRecord::raw(line);
    };

    let key_part = &line[..separator_index];
    let value_part = &line[separator_index + 1..];

    // 没有可用的键名时整行原样保留，不从片段重新拼接
    if trim_line(key_part).is_empty() {
        return LineRecord::raw(line);
    }

    let (leading, core, trailing) = split_value(value_part);
    LineRecord::Entry(Entry {
        key_part: key_part.to_string(),
        leading: leading.to_string(),
        core: core.to_string(),
        trailing: trailing.to_string(),
    })
}

/// 将值拆分为前导空白、核心文本、尾随空白
///
/// 全空白的值整体归入前导空白，核心与尾随均为空。
pub fn split_value(value: &str) -> (&str, &str, &str) {
    match value_regex().captures(value) {
        Some(caps) => (
            caps.get(1).map_or("", |m| m.as_str()),
            caps.get(2).map_or("", |m| m.as_str()),
            caps.get(3).map_or("", |m| m.as_str()),
        ),
        None => ("", value, ""),
    }
}

/// 将记录还原为文本，以 `\n` 连接
///
/// 对只使用 `\n` 的输入，`format_lang_file(&parse_lang_file(x)) == x`。
/// CRLF 输入会被规范化为 `\n`，需要保留时使用 [`format_lang_file_with`]。
pub fn format_lang_file(records: &[LineRecord]) -> String {
    format_lang_file_with(records, LineEnding::Lf)
}

/// 使用指定换行符还原文本
pub fn format_lang_file_with(records: &[LineRecord], ending: LineEnding) -> String {
    records
        .iter()
        .map(LineRecord::to_line)
        .collect::<Vec<_>>()
        .join(ending.as_str())
}

/// 统计条目数量
pub fn count_entries(records: &[LineRecord]) -> usize {
    records.iter().filter(|record| record.is_entry()).count()
}
