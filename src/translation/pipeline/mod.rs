//! 文本处理管道：收集可翻译值、批次翻译

pub mod batch;
pub mod collector;

pub use batch::{BatchConfig, BatchReport, BatchStrategy, BatchTranslator};
pub use collector::{collect_translatable, merge_translations, CollectedTexts, TextItem};
