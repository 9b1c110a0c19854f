//! 可翻译文本收集器
//!
//! 从行记录中挑出需要翻译的条目值，记录其原始位置，
//! 翻译完成后再按位置写回。

use crate::parsers::lang::LineRecord;

/// 单个可翻译值及其在记录列表中的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    pub index: usize,
    pub text: String,
}

/// 收集结果
#[derive(Debug, Clone, Default)]
pub struct CollectedTexts {
    pub items: Vec<TextItem>,
}

impl CollectedTexts {
    /// 按顺序取出所有待翻译文本
    pub fn values(&self) -> Vec<String> {
        self.items.iter().map(|item| item.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 收集需要翻译的条目值
///
/// `Raw` 记录与值为空白的条目不参与翻译。
pub fn collect_translatable(records: &[LineRecord]) -> CollectedTexts {
    let items = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match record {
            LineRecord::Entry(entry) if entry.is_translatable() => Some(TextItem {
                index,
                text: entry.core.clone(),
            }),
            _ => None,
        })
        .collect();

    CollectedTexts { items }
}

/// 按位置把译文写回记录
///
/// 返回新的记录列表，长度与顺序不变；`translations` 缺少某一位置时保留原文。
pub fn merge_translations(
    records: &[LineRecord],
    collected: &CollectedTexts,
    translations: &[String],
) -> Vec<LineRecord> {
    let mut merged = records.to_vec();

    for (position, item) in collected.items.iter().enumerate() {
        let Some(translated) = translations.get(position) else {
            continue;
        };
        if let Some(LineRecord::Entry(entry)) = merged.get_mut(item.index) {
            entry.core = translated.clone();
        }
    }

    merged
}
