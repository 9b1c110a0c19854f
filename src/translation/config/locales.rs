//! 语言区域映射表
//!
//! 语言区域（如 `pt_BR`）到翻译服务语言代码（如 `pt`）和显示名称的静态映射。

use super::manager::LocaleOverride;

/// 单个目标语言区域
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleTarget {
    pub locale: String,
    /// 翻译服务使用的语言代码
    pub lang_code: String,
    pub display_name: String,
}

/// 内置语言区域：(区域, 服务语言代码, 显示名称)
pub const BUILTIN_LOCALES: &[(&str, &str, &str)] = &[
    ("en_US", "en", "English (US)"),
    ("en_GB", "en", "English (UK)"),
    ("de_DE", "de", "Deutsch (Deutschland)"),
    ("es_ES", "es", "Español (España)"),
    ("es_MX", "es", "Español (México)"),
    ("fr_FR", "fr", "Français (France)"),
    ("fr_CA", "fr", "Français (Canada)"),
    ("it_IT", "it", "Italiano (Italia)"),
    ("ja_JP", "ja", "日本語 (日本)"),
    ("ko_KR", "ko", "한국어 (대한민국)"),
    ("pt_BR", "pt", "Português (Brasil)"),
    ("pt_PT", "pt", "Português (Portugal)"),
    ("ru_RU", "ru", "Русский (Россия)"),
    ("zh_CN", "zh-CN", "简体中文 (中国)"),
    ("zh_TW", "zh-TW", "繁體中文 (台灣)"),
    ("nl_NL", "nl", "Nederlands (Nederland)"),
    ("bg_BG", "bg", "Български (BG)"),
    ("cs_CZ", "cs", "Čeština (Česká republika)"),
    ("da_DK", "da", "Dansk (DA)"),
    ("el_GR", "el", "Ελληνικά (Ελλάδα)"),
    ("fi_FI", "fi", "Suomi (Suomi)"),
    ("hu_HU", "hu", "Magyar (HU)"),
    ("id_ID", "id", "Bahasa Indonesia (Indonesia)"),
    ("nb_NO", "no", "Norsk bokmål (Norge)"),
    ("pl_PL", "pl", "Polski (PL)"),
    ("sk_SK", "sk", "Slovensky (SK)"),
    ("sv_SE", "sv", "Svenska (Sverige)"),
    ("tr_TR", "tr", "Türkçe (Türkiye)"),
    ("uk_UA", "uk", "Українська (Україна)"),
];

/// 有序的语言区域表
#[derive(Debug, Clone)]
pub struct LocaleTable {
    targets: Vec<LocaleTarget>,
}

impl Default for LocaleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LocaleTable {
    /// 内置表
    pub fn builtin() -> Self {
        let targets = BUILTIN_LOCALES
            .iter()
            .map(|(locale, lang_code, display_name)| LocaleTarget {
                locale: locale.to_string(),
                lang_code: lang_code.to_string(),
                display_name: display_name.to_string(),
            })
            .collect();
        Self { targets }
    }

    /// 内置表加上配置中的覆盖项；同名区域被替换，新区域追加在末尾
    pub fn with_overrides(overrides: &[LocaleOverride]) -> Self {
        let mut table = Self::builtin();
        for entry in overrides {
            table.upsert(LocaleTarget {
                locale: entry.locale.clone(),
                lang_code: entry.lang_code.clone(),
                display_name: entry.display_name.clone(),
            });
        }
        table
    }

    pub fn upsert(&mut self, target: LocaleTarget) {
        match self.targets.iter_mut().find(|t| t.locale == target.locale) {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
    }

    pub fn get(&self, locale: &str) -> Option<&LocaleTarget> {
        self.targets.iter().find(|t| t.locale == locale)
    }

    /// 解析语言代码，未映射的区域返回 `fallback`
    pub fn lang_code<'a>(&'a self, locale: &str, fallback: &'a str) -> &'a str {
        self.get(locale).map_or(fallback, |t| t.lang_code.as_str())
    }

    /// 显示名称，未映射的区域直接返回区域标识
    pub fn display_name<'a>(&'a self, locale: &'a str) -> &'a str {
        self.get(locale).map_or(locale, |t| t.display_name.as_str())
    }

    /// 全部区域标识，按表顺序
    pub fn locales(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.locale.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocaleTarget> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
