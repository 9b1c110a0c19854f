//! 翻译服务核心实现
//!
//! 本模块提供统一的翻译服务接口，整合语言区域解析、文本收集、批次翻译和缓存。
//! 这是翻译系统的主要入口点。
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! use lang_translator::translation::{TranslationConfig, TranslationService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TranslationService::create_default(TranslationConfig::default())?;
//! let run = service
//!     .translate_locales("greeting=Hello", &["de_DE".to_string(), "fr_FR".to_string()])
//!     .await?;
//! println!("{}", run.preview());
//! # Ok(())
//! # }
//! ```

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Instant;

use futures::future::join_all;

use crate::parsers::lang::{count_entries, format_lang_file, parse_lang_file, LineRecord};
use crate::translation::{
    config::{LocaleTable, TranslationConfig},
    core::provider::{GoogleTranslateProvider, TranslationProvider},
    error::{TranslationError, TranslationResult},
    pipeline::{
        batch::{BatchConfig, BatchStrategy, BatchTranslator},
        collector::{collect_translatable, merge_translations},
    },
    storage::cache::{CacheConfig, CacheManager},
};

/// 单个语言区域的翻译输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleOutput {
    pub locale: String,
    pub text: String,
}

/// 一次完整翻译的结果
///
/// 代替全局的“上次原文 / 上次译文”状态：调用方持有结果，
/// 新的翻译不会覆盖旧的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRun {
    pub source_text: String,
    /// 与请求的语言区域顺序一致
    pub outputs: Vec<LocaleOutput>,
}

impl TranslationRun {
    /// 拼接预览：每个区域以 `# <locale>` 开头，区域之间空一行
    pub fn preview(&self) -> String {
        self.outputs
            .iter()
            .map(|output| format!("# {}\n{}", output.locale, output.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// 按顺序列出语言区域
    pub fn locales(&self) -> Vec<String> {
        self.outputs.iter().map(|output| output.locale.clone()).collect()
    }

    pub fn output(&self, locale: &str) -> Option<&LocaleOutput> {
        self.outputs.iter().find(|output| output.locale == locale)
    }
}

/// 统一的翻译服务
///
/// 持有翻译提供者、语言区域表、批次翻译器和缓存。服务本身不保存任何
/// 与单次翻译相关的状态，可以被多个并发的翻译共享。
pub struct TranslationService<P> {
    config: TranslationConfig,
    locales: LocaleTable,
    batch: BatchTranslator<P>,
    cache: CacheManager,
    stats: ServiceStats,
}

impl TranslationService<GoogleTranslateProvider> {
    /// 使用默认 HTTP 翻译提供者创建服务
    pub fn create_default(config: TranslationConfig) -> TranslationResult<Self> {
        let provider = GoogleTranslateProvider::new(&config)?;
        Self::new(provider, config)
    }
}

impl<P: TranslationProvider> TranslationService<P> {
    /// 创建新的翻译服务实例
    ///
    /// # Errors
    ///
    /// 配置验证失败时返回 [`TranslationError::ConfigError`]
    pub fn new(provider: P, config: TranslationConfig) -> TranslationResult<Self> {
        config.validate()?;

        let locales = LocaleTable::with_overrides(&config.locale_overrides);
        let batch = BatchTranslator::new(Arc::new(provider), BatchConfig::from(&config));
        let cache = CacheManager::new(CacheConfig {
            enabled: config.cache_enabled,
            max_entries: config.local_cache_size,
        });

        Ok(Self {
            config,
            locales,
            batch,
            cache,
            stats: ServiceStats::default(),
        })
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn locales(&self) -> &LocaleTable {
        &self.locales
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub fn get_stats(&self) -> &ServiceStats {
        &self.stats
    }

    /// 语言区域对应的翻译服务语言代码，未映射时使用默认语言
    pub fn resolve_lang_code(&self, locale: &str) -> &str {
        self.locales.lang_code(locale, &self.config.fallback_lang)
    }

    /// 翻译一组文本，先查缓存，未命中的部分交给批次翻译器
    pub async fn translate_values(&self, values: &[String], target_lang: &str) -> Vec<String> {
        let source_lang = self.config.source_lang.as_str();
        let mut results: Vec<Option<String>> = values
            .iter()
            .map(|value| self.cache.get(value, source_lang, target_lang))
            .collect();

        let misses: Vec<usize> = results
            .iter()
            .enumerate()
            .filter_map(|(index, cached)| cached.is_none().then_some(index))
            .collect();

        let hits = values.len() - misses.len();
        if self.cache.is_enabled() {
            self.stats.cache_hits.fetch_add(hits, Ordering::Relaxed);
            self.stats.cache_misses.fetch_add(misses.len(), Ordering::Relaxed);
        }

        let pending: Vec<String> = misses.iter().map(|&index| values[index].clone()).collect();
        let report = self.batch.translate_batch(&pending, target_lang).await;

        match report.strategy {
            BatchStrategy::Empty => {}
            BatchStrategy::Combined => {
                self.stats.combined_requests.fetch_add(1, Ordering::Relaxed);
            }
            BatchStrategy::Fallback => {
                self.stats.combined_requests.fetch_add(1, Ordering::Relaxed);
                self.stats.combined_mismatches.fetch_add(1, Ordering::Relaxed);
                self.stats.item_requests.fetch_add(pending.len(), Ordering::Relaxed);
            }
            BatchStrategy::PerItem => {
                self.stats.item_requests.fetch_add(pending.len(), Ordering::Relaxed);
            }
        }
        self.stats.item_failures.fetch_add(report.failed_count(), Ordering::Relaxed);

        for (position, &index) in misses.iter().enumerate() {
            let Some(translated) = report.translations.get(position) else {
                continue;
            };
            let failed = report.failed.get(position).copied().unwrap_or(true);
            if !failed {
                self.cache.insert(&values[index], translated, source_lang, target_lang);
            }
            results[index] = Some(translated.clone());
        }

        results
            .into_iter()
            .zip(values)
            .map(|(result, original)| result.unwrap_or_else(|| original.clone()))
            .collect()
    }

    /// 翻译行记录到指定语言区域
    ///
    /// 注释、空行、无效行和空值条目原样保留；输出与输入等长且顺序不变。
    pub async fn translate_entries(
        &self,
        records: &[LineRecord],
        target_locale: &str,
    ) -> Vec<LineRecord> {
        let target_lang = self.resolve_lang_code(target_locale);
        let collected = collect_translatable(records);
        self.stats
            .values_collected
            .fetch_add(collected.len(), Ordering::Relaxed);

        tracing::debug!(
            "{} ({}): {} 个待翻译条目",
            target_locale,
            target_lang,
            collected.len()
        );

        let translations = self.translate_values(&collected.values(), target_lang).await;
        merge_translations(records, &collected, &translations)
    }

    /// 翻译到多个语言区域
    ///
    /// 各区域并发处理，互不共享数据；结果顺序与 `locales` 一致。
    ///
    /// # Errors
    ///
    /// - [`TranslationError::NoEntries`]: 输入中没有 `key=value` 条目
    /// - [`TranslationError::NoLocalesSelected`]: `locales` 为空
    pub async fn translate_locales(
        &self,
        source_text: &str,
        locales: &[String],
    ) -> TranslationResult<TranslationRun> {
        let records = parse_lang_file(source_text);

        if count_entries(&records) == 0 {
            return Err(TranslationError::NoEntries);
        }

        if locales.is_empty() {
            return Err(TranslationError::NoLocalesSelected);
        }

        let start = Instant::now();
        let total = locales.len();
        let completed = AtomicUsize::new(0);
        tracing::info!("Translating 0/{} locales (0%)...", total);

        let tasks = locales.iter().map(|locale| {
            let records = &records;
            let completed = &completed;
            async move {
                let translated = self.translate_entries(records, locale).await;
                let text = format_lang_file(&translated);

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                self.stats.locales_completed.fetch_add(1, Ordering::Relaxed);
                let percent = (done * 100 + total / 2) / total;
                tracing::info!("Translating {}/{} locales ({}%)...", done, total, percent);

                LocaleOutput {
                    locale: locale.clone(),
                    text,
                }
            }
        });

        let outputs = join_all(tasks).await;
        tracing::info!("Translation complete. ({:.2?})", start.elapsed());

        Ok(TranslationRun {
            source_text: source_text.to_string(),
            outputs,
        })
    }
}

/// 服务运行统计信息
///
/// 使用原子计数器，多个语言区域并发翻译时无需加锁。
#[derive(Debug, Default)]
pub struct ServiceStats {
    /// 收集到的可翻译值数量（按区域累计）
    pub values_collected: AtomicUsize,
    /// 合并请求次数
    pub combined_requests: AtomicUsize,
    /// 合并请求数量不符或失败的次数
    pub combined_mismatches: AtomicUsize,
    /// 逐条请求次数
    pub item_requests: AtomicUsize,
    /// 逐条请求失败、保留原文的次数
    pub item_failures: AtomicUsize,
    pub cache_hits: AtomicUsize,
    pub cache_misses: AtomicUsize,
    /// 完成的语言区域数量
    pub locales_completed: AtomicUsize,
}

/// 统计信息快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceStatsSnapshot {
    pub values_collected: usize,
    pub combined_requests: usize,
    pub combined_mismatches: usize,
    pub item_requests: usize,
    pub item_failures: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub locales_completed: usize,
}

impl ServiceStats {
    /// 获取当前统计的快照
    pub fn snapshot(&self) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            values_collected: self.values_collected.load(Ordering::Relaxed),
            combined_requests: self.combined_requests.load(Ordering::Relaxed),
            combined_mismatches: self.combined_mismatches.load(Ordering::Relaxed),
            item_requests: self.item_requests.load(Ordering::Relaxed),
            item_failures: self.item_failures.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            locales_completed: self.locales_completed.load(Ordering::Relaxed),
        }
    }

    /// 重置所有统计计数器
    pub fn reset(&self) {
        for counter in [
            &self.values_collected,
            &self.combined_requests,
            &self.combined_mismatches,
            &self.item_requests,
            &self.item_failures,
            &self.cache_hits,
            &self.cache_misses,
            &self.locales_completed,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl ServiceStatsSnapshot {
    /// 发起的翻译请求总数
    pub fn total_requests(&self) -> usize {
        self.combined_requests + self.item_requests
    }
}

impl std::fmt::Display for ServiceStatsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} 个区域, {} 个值, {} 次请求 (合并 {}, 回退 {}, 逐条 {}, 失败 {}), 缓存命中 {}/{}",
            self.locales_completed,
            self.values_collected,
            self.total_requests(),
            self.combined_requests,
            self.combined_mismatches,
            self.item_requests,
            self.item_failures,
            self.cache_hits,
            self.cache_hits + self.cache_misses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_format() {
        let run = TranslationRun {
            source_text: "a=b".to_string(),
            outputs: vec![
                LocaleOutput {
                    locale: "de_DE".to_string(),
                    text: "a=c".to_string(),
                },
                LocaleOutput {
                    locale: "fr_FR".to_string(),
                    text: "a=d".to_string(),
                },
            ],
        };

        assert_eq!(run.preview(), "# de_DE\na=c\n\n# fr_FR\na=d");
        assert_eq!(run.locales(), vec!["de_DE".to_string(), "fr_FR".to_string()]);
        assert_eq!(run.output("fr_FR").map(|o| o.text.as_str()), Some("a=d"));
    }

    #[test]
    fn test_stats_snapshot_and_reset() {
        let stats = ServiceStats::default();
        stats.combined_requests.fetch_add(2, Ordering::Relaxed);
        stats.item_requests.fetch_add(3, Ordering::Relaxed);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_requests(), 5);

        stats.reset();
        assert_eq!(stats.snapshot(), ServiceStatsSnapshot::default());
    }
}
