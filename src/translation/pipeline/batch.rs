//! 批次翻译模块
//!
//! 把一组有序文本翻译为同样长度、同样顺序的译文，尽量减少外部调用次数：
//!
//! 1. 所有文本用分隔标记拼接，作为一次合并请求提交
//! 2. 按分隔标记拆分响应，数量与输入一致时直接采用
//! 3. 数量不一致或请求失败时，逐条并发请求；单条失败保留原文
//!
//! 翻译服务可能在分隔标记处合并、丢弃或重排片段，因此合并结果只有在
//! 数量严格相等时才被信任。

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::translation::config::{constants::BATCH_DELIMITER, BatchMode, TranslationConfig};
use crate::translation::core::provider::TranslationProvider;

/// 实际采用的翻译策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStrategy {
    /// 输入为空，没有发起请求
    Empty,
    /// 合并请求成功
    Combined,
    /// 合并请求失败或数量不符后逐条翻译
    Fallback,
    /// 配置为逐条翻译
    PerItem,
}

/// 一次批次翻译的结果
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// 与输入等长、同序的译文
    pub translations: Vec<String>,
    pub strategy: BatchStrategy,
    /// 第 i 项为 true 表示该项翻译失败，`translations[i]` 是原文
    pub failed: Vec<bool>,
    /// 发起的请求总数
    pub requests: usize,
}

impl BatchReport {
    fn empty() -> Self {
        Self {
            translations: Vec::new(),
            strategy: BatchStrategy::Empty,
            failed: Vec::new(),
            requests: 0,
        }
    }

    pub fn failed_count(&self) -> usize {
        self.failed.iter().filter(|failed| **failed).count()
    }

    pub fn is_fully_translated(&self) -> bool {
        self.failed_count() == 0
    }
}

/// 批次翻译器配置
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub mode: BatchMode,
    pub source_lang: String,
    pub max_concurrent_requests: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::from(&TranslationConfig::default())
    }
}

impl From<&TranslationConfig> for BatchConfig {
    fn from(config: &TranslationConfig) -> Self {
        Self {
            mode: config.batch_mode,
            source_lang: config.source_lang.clone(),
            max_concurrent_requests: config.max_concurrent_requests.max(1),
        }
    }
}

/// 批次翻译器
pub struct BatchTranslator<P> {
    provider: Arc<P>,
    config: BatchConfig,
    semaphore: Semaphore,
}

impl<P: TranslationProvider> BatchTranslator<P> {
    pub fn new(provider: Arc<P>, config: BatchConfig) -> Self {
        let semaphore = Semaphore::new(config.max_concurrent_requests.max(1));
        Self {
            provider,
            config,
            semaphore,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// 翻译一组文本
    ///
    /// # Arguments
    ///
    /// * `values` - 待翻译文本，顺序即结果顺序
    /// * `target_lang` - 翻译服务语言代码
    ///
    /// # Returns
    ///
    /// 与输入等长的结果；空输入不会发起任何请求
    pub async fn translate_batch(&self, values: &[String], target_lang: &str) -> BatchReport {
        if values.is_empty() {
            return BatchReport::empty();
        }

        if self.config.mode == BatchMode::PerItem {
            let mut report = self.translate_each(values, target_lang).await;
            report.strategy = BatchStrategy::PerItem;
            return report;
        }

        if let Some(translations) = self.translate_combined(values, target_lang).await {
            return BatchReport {
                failed: vec![false; translations.len()],
                translations,
                strategy: BatchStrategy::Combined,
                requests: 1,
            };
        }

        let mut report = self.translate_each(values, target_lang).await;
        report.requests += 1;
        report
    }

    /// 合并请求；数量不符或请求失败时返回 None
    async fn translate_combined(&self, values: &[String], target_lang: &str) -> Option<Vec<String>> {
        let combined = values.join(&format!("\n{}\n", BATCH_DELIMITER));

        match self
            .provider
            .translate(&combined, &self.config.source_lang, target_lang)
            .await
        {
            Ok(translated) => {
                let parts: Vec<&str> = translated.split(BATCH_DELIMITER).collect();
                if parts.len() == values.len() {
                    tracing::debug!("合并请求成功: {} 项 -> {}", values.len(), target_lang);
                    Some(parts.into_iter().map(|part| part.trim().to_string()).collect())
                } else {
                    tracing::warn!(
                        "合并请求片段数量不符 ({} != {})，改为逐条翻译: {}",
                        parts.len(),
                        values.len(),
                        target_lang
                    );
                    None
                }
            }
            Err(e) => {
                tracing::warn!("合并请求失败，改为逐条翻译 ({}): {}", target_lang, e);
                None
            }
        }
    }

    /// 逐条并发翻译，单条失败保留原文
    async fn translate_each(&self, values: &[String], target_lang: &str) -> BatchReport {
        let tasks = values.iter().enumerate().map(|(index, value)| async move {
            // 信号量从不关闭，acquire 只会等待
            let _permit = self.semaphore.acquire().await.ok();
            match self
                .provider
                .translate(value, &self.config.source_lang, target_lang)
                .await
            {
                Ok(translated) => (translated, false),
                Err(e) => {
                    tracing::warn!(
                        "第 {} 项翻译失败，保留原文 ({}): {}",
                        index + 1,
                        target_lang,
                        e
                    );
                    (value.clone(), true)
                }
            }
        });

        let (translations, failed): (Vec<String>, Vec<bool>) =
            join_all(tasks).await.into_iter().unzip();

        BatchReport {
            translations,
            strategy: BatchStrategy::Fallback,
            failed,
            requests: values.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::error::{TranslationError, TranslationResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 给每个片段加上目标语言前缀；`drop_delimiters` 时模拟服务吞掉分隔标记
    struct TaggingProvider {
        calls: AtomicUsize,
        drop_delimiters: bool,
        fail_on: Option<&'static str>,
    }

    impl TaggingProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                drop_delimiters: false,
                fail_on: None,
            }
        }
    }

    impl TranslationProvider for TaggingProvider {
        async fn translate(
            &self,
            text: &str,
            _source_lang: &str,
            target_lang: &str,
        ) -> TranslationResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.is_some_and(|needle| text.contains(needle)) {
                return Err(TranslationError::NetworkError("connection reset".into()));
            }
            if self.drop_delimiters && text.contains(BATCH_DELIMITER) {
                return Ok(format!("[{}] {}", target_lang, text.replace(BATCH_DELIMITER, "")));
            }
            Ok(text
                .split(BATCH_DELIMITER)
                .map(|segment| format!("\n[{}] {}\n", target_lang, segment.trim()))
                .collect::<Vec<_>>()
                .join(BATCH_DELIMITER))
        }

        fn name(&self) -> &str {
            "tagging"
        }
    }

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_request() {
        let provider = Arc::new(TaggingProvider::new());
        let translator = BatchTranslator::new(Arc::clone(&provider), BatchConfig::default());

        let report = translator.translate_batch(&[], "de").await;
        assert!(report.translations.is_empty());
        assert_eq!(report.strategy, BatchStrategy::Empty);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_combined_request_is_split_and_trimmed() {
        let provider = Arc::new(TaggingProvider::new());
        let translator = BatchTranslator::new(Arc::clone(&provider), BatchConfig::default());

        let report = translator
            .translate_batch(&values(&["Hello", "Save file", "Quit"]), "de")
            .await;
        assert_eq!(report.strategy, BatchStrategy::Combined);
        assert_eq!(
            report.translations,
            values(&["[de] Hello", "[de] Save file", "[de] Quit"])
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert!(report.is_fully_translated());
    }

    #[tokio::test]
    async fn test_mismatch_falls_back_to_per_item() {
        let provider = Arc::new(TaggingProvider {
            drop_delimiters: true,
            ..TaggingProvider::new()
        });
        let translator = BatchTranslator::new(Arc::clone(&provider), BatchConfig::default());

        let report = translator.translate_batch(&values(&["One", "Two"]), "fr").await;
        assert_eq!(report.strategy, BatchStrategy::Fallback);
        assert_eq!(report.translations, values(&["\n[fr] One\n", "\n[fr] Two\n"]));
        assert_eq!(report.requests, 3);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_item_failure_keeps_original() {
        let provider = Arc::new(TaggingProvider {
            fail_on: Some("Broken"),
            ..TaggingProvider::new()
        });
        let translator = BatchTranslator::new(Arc::clone(&provider), BatchConfig::default());

        // 合并请求包含 "Broken"，整体失败后逐条翻译
        let report = translator
            .translate_batch(&values(&["Fine", "Broken", "Also fine"]), "it")
            .await;
        assert_eq!(report.strategy, BatchStrategy::Fallback);
        assert_eq!(report.translations[1], "Broken");
        assert_eq!(report.failed, vec![false, true, false]);
        assert_eq!(report.failed_count(), 1);
        assert!(report.translations[0].contains("[it] Fine"));
        assert!(report.translations[2].contains("[it] Also fine"));
    }

    #[tokio::test]
    async fn test_per_item_mode_skips_combined_request() {
        let provider = Arc::new(TaggingProvider::new());
        let config = BatchConfig {
            mode: BatchMode::PerItem,
            max_concurrent_requests: 1,
            ..BatchConfig::default()
        };
        let translator = BatchTranslator::new(Arc::clone(&provider), config);

        let report = translator.translate_batch(&values(&["a", "b", "c"]), "ja").await;
        assert_eq!(report.strategy, BatchStrategy::PerItem);
        assert_eq!(report.requests, 3);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }
}
