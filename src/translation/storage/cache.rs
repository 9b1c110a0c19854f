//! 翻译缓存模块
//!
//! 在同一个服务实例内复用相同文本的翻译结果。例如 `en_US` 与 `en_GB`
//! 都映射到 `en`，第二个区域可以直接命中缓存。

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use lru::LruCache;

/// 缓存配置
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: crate::translation::config::constants::DEFAULT_LOCAL_CACHE_SIZE,
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub insertions: u64,
    pub total_entries: usize,
}

impl CacheStats {
    /// 命中率
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_requests as f64
        }
    }
}

/// 缓存管理器
pub struct CacheManager {
    entries: Mutex<LruCache<String, String>>,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
}

impl CacheManager {
    /// 创建新的缓存管理器
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            enabled: config.enabled,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            insertions: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 生成缓存键：源语言、目标语言与原文的 blake3 摘要
    pub fn cache_key(text: &str, source_lang: &str, target_lang: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(source_lang.as_bytes());
        hasher.update(&[0]);
        hasher.update(target_lang.as_bytes());
        hasher.update(&[0]);
        hasher.update(text.as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    /// 获取缓存的翻译
    pub fn get(&self, text: &str, source_lang: &str, target_lang: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = Self::cache_key(text, source_lang, target_lang);
        let found = self
            .entries
            .lock()
            .ok()
            .and_then(|mut entries| entries.get(&key).cloned());

        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// 插入翻译结果
    pub fn insert(&self, text: &str, translated: &str, source_lang: &str, target_lang: &str) {
        if !self.enabled {
            return;
        }

        let key = Self::cache_key(text, source_lang, target_lang);
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(key, translated.to_string());
            self.insertions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// 当前条目数
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 清空缓存
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// 获取统计信息
    pub fn stats(&self) -> CacheStats {
        let cache_hits = self.hits.load(Ordering::Relaxed);
        let cache_misses = self.misses.load(Ordering::Relaxed);
        CacheStats {
            total_requests: cache_hits + cache_misses,
            cache_hits,
            cache_misses,
            insertions: self.insertions.load(Ordering::Relaxed),
            total_entries: self.len(),
        }
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
