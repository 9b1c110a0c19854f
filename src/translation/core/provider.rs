//! 翻译服务提供者
//!
//! 定义外部翻译能力的抽象接口，并提供基于公开 HTTP 接口的默认实现。
//! 核心逻辑只依赖 [`TranslationProvider`]，测试中可替换为内存实现。

use std::future::Future;

use serde_json::Value;
use url::Url;

use crate::translation::config::TranslationConfig;
use crate::translation::error::{TranslationError, TranslationResult};

/// 外部翻译能力：`translate(text, source_lang, target_lang) -> text`
pub trait TranslationProvider: Send + Sync {
    /// 翻译一段文本
    ///
    /// # Arguments
    ///
    /// * `text` - 原文，可能包含多行
    /// * `source_lang` - 源语言代码，`auto` 表示自动检测
    /// * `target_lang` - 目标语言代码，如 `de`、`zh-CN`
    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> impl Future<Output = TranslationResult<String>> + Send;

    /// 提供者名称，用于日志
    fn name(&self) -> &str;
}

/// 基于 `translate_a/single` 接口的翻译提供者
///
/// 请求参数：`client`、`sl`、`tl`、`dt=t`、`q`。响应是嵌套数组，第一个元素是
/// `[译文片段, 原文片段, ...]` 列表，按顺序拼接各片段的第一个元素即为译文。
#[derive(Debug, Clone)]
pub struct GoogleTranslateProvider {
    client: reqwest::Client,
    endpoint: Url,
    client_id: String,
}

impl GoogleTranslateProvider {
    /// 根据配置创建提供者
    pub fn new(config: &TranslationConfig) -> TranslationResult<Self> {
        let endpoint = Url::parse(&config.api_url).map_err(|e| {
            TranslationError::ConfigError(format!("API URL 无效 '{}': {}", config.api_url, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            client_id: config.client_id.clone(),
        })
    }

    /// 构造请求 URL
    pub fn request_url(&self, text: &str, source_lang: &str, target_lang: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client", &self.client_id)
            .append_pair("sl", source_lang)
            .append_pair("tl", target_lang)
            .append_pair("dt", "t")
            .append_pair("q", text);
        url
    }
}

impl TranslationProvider for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        let url = self.request_url(text, source_lang, target_lang);
        tracing::debug!(
            "请求翻译: {} -> {}，{} 个字符",
            source_lang,
            target_lang,
            text.chars().count()
        );

        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        parse_translate_response(&body)
    }

    fn name(&self) -> &str {
        "google-translate"
    }
}

/// 解析响应体，拼接所有译文片段
pub fn parse_translate_response(body: &str) -> TranslationResult<String> {
    let data: Value = serde_json::from_str(body)
        .map_err(|e| TranslationError::ParseError(format!("响应不是有效的JSON: {}", e)))?;

    let segments = data
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::ParseError("响应缺少译文片段数组".to_string()))?;

    let translated = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect::<String>();

    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_translate_response() {
        let body = r#"[[["Hallo ","Hello ",null,null,10],["Welt","World",null,null,10]],null,"en"]"#;
        assert_eq!(parse_translate_response(body).unwrap(), "Hallo Welt");
    }

    #[test]
    fn test_parse_skips_non_text_segments() {
        let body = r#"[[["Bonjour","Hello"],[null,null,"Bonzhur"]],null,"en"]"#;
        assert_eq!(parse_translate_response(body).unwrap(), "Bonjour");
    }

    #[test]
    fn test_parse_rejects_unexpected_shapes() {
        assert!(parse_translate_response("not json").is_err());
        assert!(parse_translate_response(r#"{"error":"quota"}"#).is_err());
        assert!(parse_translate_response("[null]").is_err());
    }

    #[test]
    fn test_request_url_encoding() {
        let provider = GoogleTranslateProvider::new(&TranslationConfig::default()).unwrap();
        let url = provider.request_url("a=b & c\nd", "auto", "zh-CN");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("client".to_string(), "gtx".to_string()),
                ("sl".to_string(), "auto".to_string()),
                ("tl".to_string(), "zh-CN".to_string()),
                ("dt".to_string(), "t".to_string()),
                ("q".to_string(), "a=b & c\nd".to_string()),
            ]
        );
        assert!(url.as_str().starts_with("https://translate.googleapis.com/translate_a/single?"));
    }
}
