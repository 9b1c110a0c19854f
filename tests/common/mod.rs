// 集成测试公共模块
//
// 提供内存翻译提供者和示例语言文件

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use lang_translator::translation::config::constants::BATCH_DELIMITER;
use lang_translator::translation::{
    TranslationConfig, TranslationError, TranslationProvider, TranslationResult,
    TranslationService,
};

/// 注释、条目、空行、无效行各一行
pub const FOUR_LINE_SAMPLE: &str = "# header\ngreeting = Hello \n\nbad line";

/// 混合注释、空值、无效行的示例文件
pub const MIXED_SAMPLE: &str = concat!(
    "## Menu\n",
    "menu.play=Play\n",
    "menu.options = Options\n",
    "menu.quit=\tQuit game  \n",
    "\n",
    "; legacy\n",
    "empty.value=\n",
    "=orphan value\n",
    "not an entry",
);

/// 合并请求的响应方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinedBehavior {
    /// 保留分隔标记，逐段翻译
    Preserve,
    /// 吞掉分隔标记，片段数量不符
    MergeSegments,
    /// 合并请求直接失败
    Fail,
}

/// 记录下来的一次调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// 内存翻译提供者
///
/// 译文为 `[<target>] <原文>`；克隆共享调用记录。
#[derive(Debug, Clone)]
pub struct MockProvider {
    combined: CombinedBehavior,
    fail_on: Arc<HashSet<String>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            combined: CombinedBehavior::Preserve,
            fail_on: Arc::new(HashSet::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_combined(mut self, behavior: CombinedBehavior) -> Self {
        self.combined = behavior;
        self
    }

    /// 单条请求的文本等于其中之一时失败
    pub fn failing_on(mut self, texts: &[&str]) -> Self {
        self.fail_on = Arc::new(texts.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn combined_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.text.contains(BATCH_DELIMITER))
            .count()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationProvider for MockProvider {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            text: text.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        });

        if text.contains(BATCH_DELIMITER) {
            return match self.combined {
                CombinedBehavior::Preserve => Ok(text
                    .split(BATCH_DELIMITER)
                    .map(|segment| format!(" [{}] {} ", target_lang, segment.trim()))
                    .collect::<Vec<_>>()
                    .join(BATCH_DELIMITER)),
                CombinedBehavior::MergeSegments => Ok(format!(
                    "[{}] {}",
                    target_lang,
                    text.replace(BATCH_DELIMITER, " ")
                )),
                CombinedBehavior::Fail => Err(TranslationError::TranslationServiceError(
                    "HTTP 503".to_string(),
                )),
            };
        }

        if self.fail_on.contains(text) {
            return Err(TranslationError::NetworkError(format!("connection reset: {}", text)));
        }

        Ok(format!("[{}] {}", target_lang, text))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// 创建使用内存提供者的服务
pub fn service_with(provider: &MockProvider) -> TranslationService<MockProvider> {
    service_with_config(provider, TranslationConfig::default())
}

pub fn service_with_config(
    provider: &MockProvider,
    config: TranslationConfig,
) -> TranslationService<MockProvider> {
    TranslationService::new(provider.clone(), config).expect("valid test config")
}

pub fn locales(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
