//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制。网络层的失败在批次翻译内部被吸收，
//! 能到达调用方的只有配置、输入、输出相关的错误。

use std::fmt;

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 网络错误
    #[error("网络错误: {0}")]
    NetworkError(String),

    /// 超时错误
    #[error("操作超时: {0}")]
    TimeoutError(String),

    /// 输入验证错误
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 翻译服务返回了非成功状态
    #[error("翻译服务错误: {0}")]
    TranslationServiceError(String),

    /// 响应解析错误
    #[error("解析错误: {0}")]
    ParseError(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerializationError(String),

    /// 打包输出错误
    #[error("打包错误: {0}")]
    ArchiveError(String),

    /// 文件读写错误
    #[error("IO错误: {0}")]
    IoError(String),

    /// 输入中没有任何 `key=value` 条目
    #[error("No valid .lang entries found.")]
    NoEntries,

    /// 没有选择目标语言
    #[error("Select at least one target locale.")]
    NoLocalesSelected,

    /// 内部错误
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl TranslationError {
    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::NetworkError(_) => true,
            TranslationError::TimeoutError(_) => true,
            TranslationError::TranslationServiceError(_) => true,
            TranslationError::ConfigError(_) => false,
            TranslationError::InvalidInput(_) => false,
            TranslationError::ParseError(_) => false,
            TranslationError::SerializationError(_) => false,
            TranslationError::ArchiveError(_) => false,
            TranslationError::IoError(_) => false,
            TranslationError::NoEntries => false,
            TranslationError::NoLocalesSelected => false,
            TranslationError::InternalError(_) => false,
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::NetworkError(_) => ErrorSeverity::Warning,
            TranslationError::TimeoutError(_) => ErrorSeverity::Warning,
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
            TranslationError::TranslationServiceError(_) => ErrorSeverity::Warning,
            TranslationError::ParseError(_) => ErrorSeverity::Warning,
            TranslationError::SerializationError(_) => ErrorSeverity::Error,
            TranslationError::ArchiveError(_) => ErrorSeverity::Error,
            TranslationError::IoError(_) => ErrorSeverity::Error,
            TranslationError::NoEntries => ErrorSeverity::Info,
            TranslationError::NoLocalesSelected => ErrorSeverity::Info,
            TranslationError::InternalError(_) => ErrorSeverity::Critical,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::NetworkError(_) => ErrorCategory::Network,
            TranslationError::TimeoutError(_) => ErrorCategory::Timeout,
            TranslationError::InvalidInput(_) => ErrorCategory::Input,
            TranslationError::NoEntries => ErrorCategory::Input,
            TranslationError::NoLocalesSelected => ErrorCategory::Input,
            TranslationError::TranslationServiceError(_) => ErrorCategory::Service,
            TranslationError::ParseError(_) => ErrorCategory::Parsing,
            TranslationError::SerializationError(_) => ErrorCategory::Serialization,
            TranslationError::ArchiveError(_) => ErrorCategory::Output,
            TranslationError::IoError(_) => ErrorCategory::Output,
            TranslationError::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// 是否为面向用户的状态提示，而不是真正的故障
    pub fn is_status(&self) -> bool {
        matches!(
            self,
            TranslationError::NoEntries | TranslationError::NoLocalesSelected
        )
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        match &mut self {
            TranslationError::ConfigError(msg)
            | TranslationError::NetworkError(msg)
            | TranslationError::TimeoutError(msg)
            | TranslationError::InvalidInput(msg)
            | TranslationError::TranslationServiceError(msg)
            | TranslationError::ParseError(msg)
            | TranslationError::SerializationError(msg)
            | TranslationError::ArchiveError(msg)
            | TranslationError::IoError(msg)
            | TranslationError::InternalError(msg) => {
                *msg = format!("{} (上下文: {})", msg, context);
            }
            TranslationError::NoEntries | TranslationError::NoLocalesSelected => {}
        }

        self
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Timeout,
    Input,
    Service,
    Parsing,
    Serialization,
    Output,
    Internal,
}

/// 标准错误转换
impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::SerializationError(format!("JSON序列化错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<toml::ser::Error> for TranslationError {
    fn from(error: toml::ser::Error) -> Self {
        TranslationError::SerializationError(format!("TOML序列化错误: {}", error))
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::TimeoutError(error.to_string())
        } else if let Some(status) = error.status() {
            TranslationError::TranslationServiceError(format!("HTTP {}: {}", status, error))
        } else {
            TranslationError::NetworkError(error.to_string())
        }
    }
}

impl From<zip::result::ZipError> for TranslationError {
    fn from(error: zip::result::ZipError) -> Self {
        TranslationError::ArchiveError(error.to_string())
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &TranslationError) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("{}", error),
            ErrorSeverity::Warning => tracing::warn!("翻译警告: {}", error),
            ErrorSeverity::Error => tracing::error!("翻译错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("翻译严重错误: {}", error),
        }
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ConfigError(msg.to_string())
    }

    /// 创建输入验证错误
    pub fn validation_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::InvalidInput(msg.to_string())
    }
}
