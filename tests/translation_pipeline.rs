//! 翻译管道集成测试
//!
//! 从 `.lang` 文本到多语言区域输出与打包的端到端流程

mod common;

use lang_translator::builders::{write_bundle, MemoryArchive};
use lang_translator::parsers::{format_lang_file, parse_lang_file, Entry, LineRecord};
use lang_translator::translation::{BatchMode, TranslationConfig, TranslationError};

use common::{
    locales, service_with, service_with_config, CombinedBehavior, MockProvider, FOUR_LINE_SAMPLE,
    MIXED_SAMPLE,
};

#[test]
fn test_four_line_sample_parse() {
    let records = parse_lang_file(FOUR_LINE_SAMPLE);

    assert_eq!(
        records,
        vec![
            LineRecord::raw("# header"),
            LineRecord::Entry(Entry {
                key_part: "greeting ".to_string(),
                leading: " ".to_string(),
                core: "Hello".to_string(),
                trailing: " ".to_string(),
            }),
            LineRecord::raw(""),
            LineRecord::raw("bad line"),
        ]
    );
    assert_eq!(format_lang_file(&records), FOUR_LINE_SAMPLE);
}

#[test]
fn test_round_trip_and_trimmed_core() {
    let samples = [
        "",
        "\n",
        "a=b",
        "a=b\n",
        "  key  =  spaced value \t",
        "# c\n; c\n\n=x\nno equals\nk=v=w",
        MIXED_SAMPLE,
    ];

    for sample in samples {
        let records = parse_lang_file(sample);
        assert_eq!(format_lang_file(&records), sample, "round trip: {:?}", sample);

        for entry in records.iter().filter_map(LineRecord::as_entry) {
            assert_eq!(entry.core.trim(), entry.core, "core of {:?}", sample);
        }
    }
}

#[tokio::test]
async fn test_combined_translation_preserves_layout() {
    let provider = MockProvider::new();
    let service = service_with(&provider);

    let records = parse_lang_file(MIXED_SAMPLE);
    let translated = service.translate_entries(&records, "de_DE").await;

    assert_eq!(translated.len(), records.len());
    assert_eq!(
        format_lang_file(&translated),
        concat!(
            "## Menu\n",
            "menu.play=[de] Play\n",
            "menu.options = [de] Options\n",
            "menu.quit=\t[de] Quit game  \n",
            "\n",
            "; legacy\n",
            "empty.value=\n",
            "=orphan value\n",
            "not an entry",
        )
    );
    assert_eq!(provider.call_count(), 1);
    assert_eq!(provider.combined_calls(), 1);
}

#[tokio::test]
async fn test_mismatch_uses_per_item_results() {
    let provider = MockProvider::new().with_combined(CombinedBehavior::MergeSegments);
    let service = service_with(&provider);

    let run = service
        .translate_locales("a=One\nb=Two\nc=Three", &locales(&["fr_FR"]))
        .await
        .unwrap();

    assert_eq!(run.outputs[0].text, "a=[fr] One\nb=[fr] Two\nc=[fr] Three");
    // 一次合并请求加三次逐条请求
    assert_eq!(provider.call_count(), 4);

    let stats = service.get_stats().snapshot();
    assert_eq!(stats.combined_mismatches, 1);
    assert_eq!(stats.item_requests, 3);
    assert_eq!(stats.item_failures, 0);
}

#[tokio::test]
async fn test_failed_item_keeps_original_and_is_not_cached() {
    let provider = MockProvider::new()
        .with_combined(CombinedBehavior::Fail)
        .failing_on(&["Options"]);
    let service = service_with(&provider);
    let source = "play=Play\noptions=Options\nquit=Quit";

    let run = service
        .translate_locales(source, &locales(&["it_IT"]))
        .await
        .unwrap();
    assert_eq!(run.outputs[0].text, "play=[it] Play\noptions=Options\nquit=[it] Quit");
    assert_eq!(service.get_stats().snapshot().item_failures, 1);

    let before = provider.call_count();
    let again = service
        .translate_locales(source, &locales(&["it_IT"]))
        .await
        .unwrap();
    assert_eq!(again.outputs, run.outputs);

    let retried: Vec<String> = provider.calls()[before..]
        .iter()
        .map(|call| call.text.clone())
        .collect();
    assert!(!retried.is_empty());
    assert!(retried.iter().all(|text| text == "Options"));
}

#[tokio::test]
async fn test_blank_values_make_no_request() {
    let provider = MockProvider::new();
    let service = service_with(&provider);
    let source = "a=\nb=   \n# comment";

    let run = service
        .translate_locales(source, &locales(&["de_DE", "ja_JP"]))
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 0);
    assert!(run.outputs.iter().all(|output| output.text == source));
}

#[tokio::test]
async fn test_locales_do_not_contaminate_each_other() {
    let provider = MockProvider::new();
    let service = service_with(&provider);

    let run = service
        .translate_locales(MIXED_SAMPLE, &locales(&["de_DE", "fr_FR", "zh_CN"]))
        .await
        .unwrap();

    assert_eq!(run.locales(), locales(&["de_DE", "fr_FR", "zh_CN"]));
    for (output, tag) in run.outputs.iter().zip(["[de]", "[fr]", "[zh-CN]"]) {
        let records = parse_lang_file(&output.text);
        for entry in records.iter().filter_map(LineRecord::as_entry) {
            if entry.is_translatable() {
                assert!(
                    entry.core.starts_with(tag),
                    "{} got {:?}",
                    output.locale,
                    entry.core
                );
            }
        }
    }

    let targets: Vec<String> = provider.calls().into_iter().map(|c| c.target_lang).collect();
    assert_eq!(targets.len(), 3);
    assert!(targets.contains(&"de".to_string()));
    assert!(targets.contains(&"fr".to_string()));
    assert!(targets.contains(&"zh-CN".to_string()));
}

#[tokio::test]
async fn test_unmapped_locale_uses_fallback_code() {
    let provider = MockProvider::new();
    let service = service_with(&provider);

    let run = service
        .translate_locales("k=Value", &locales(&["xx_YY"]))
        .await
        .unwrap();

    assert_eq!(run.outputs[0].text, "k=[en] Value");
    assert_eq!(provider.calls()[0].target_lang, "en");
    assert_eq!(provider.calls()[0].source_lang, "auto");
}

#[tokio::test]
async fn test_bundle_manifests_follow_selection_order() {
    let provider = MockProvider::new();
    let service = service_with(&provider);

    let run = service
        .translate_locales("k=Value", &locales(&["fr_FR", "de_DE", "xx_YY"]))
        .await
        .unwrap();
    let files = write_bundle(&run, MemoryArchive::new(), "lang", service.locales()).unwrap();

    let names: Vec<&str> = files.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "fr_FR.lang",
            "de_DE.lang",
            "xx_YY.lang",
            "languages.json",
            "language_names.json"
        ]
    );

    let ids: Vec<String> = serde_json::from_slice(&files[3].1).unwrap();
    assert_eq!(ids, locales(&["fr_FR", "de_DE", "xx_YY"]));

    let display: Vec<(String, String)> = serde_json::from_slice(&files[4].1).unwrap();
    assert_eq!(
        display,
        vec![
            ("fr_FR".to_string(), "Français (France)".to_string()),
            ("de_DE".to_string(), "Deutsch (Deutschland)".to_string()),
            ("xx_YY".to_string(), "xx_YY".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_shared_language_code_reuses_cache() {
    let provider = MockProvider::new();
    let service = service_with(&provider);

    let us = service
        .translate_locales(MIXED_SAMPLE, &locales(&["en_US"]))
        .await
        .unwrap();
    let calls = provider.call_count();

    let gb = service
        .translate_locales(MIXED_SAMPLE, &locales(&["en_GB"]))
        .await
        .unwrap();

    assert_eq!(provider.call_count(), calls);
    assert_eq!(us.outputs[0].text, gb.outputs[0].text);
    assert_eq!(service.get_stats().snapshot().cache_hits, 3);
}

#[tokio::test]
async fn test_cache_disabled_translates_again() {
    let provider = MockProvider::new();
    let config = TranslationConfig {
        cache_enabled: false,
        ..TranslationConfig::default()
    };
    let service = service_with_config(&provider, config);

    for _ in 0..2 {
        service
            .translate_locales("k=Value", &locales(&["de_DE"]))
            .await
            .unwrap();
    }
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_per_item_mode_skips_combined_request() {
    let provider = MockProvider::new();
    let config = TranslationConfig {
        batch_mode: BatchMode::PerItem,
        ..TranslationConfig::default()
    };
    let service = service_with_config(&provider, config);

    let run = service
        .translate_locales(MIXED_SAMPLE, &locales(&["ko_KR"]))
        .await
        .unwrap();

    assert_eq!(provider.combined_calls(), 0);
    assert_eq!(provider.call_count(), 3);
    assert!(run.outputs[0].text.contains("menu.play=[ko] Play"));
}

#[tokio::test]
async fn test_status_errors_before_any_request() {
    let provider = MockProvider::new();
    let service = service_with(&provider);

    let no_entries = service
        .translate_locales("# only comments\n\nnot an entry", &locales(&["de_DE"]))
        .await;
    assert!(matches!(no_entries, Err(TranslationError::NoEntries)));

    // 没有条目时优先报告 NoEntries
    let both = service.translate_locales("", &[]).await;
    assert!(matches!(both, Err(TranslationError::NoEntries)));

    let no_locales = service.translate_locales(MIXED_SAMPLE, &[]).await;
    match no_locales {
        Err(e) => assert_eq!(e.to_string(), "Select at least one target locale."),
        Ok(_) => panic!("expected NoLocalesSelected"),
    }

    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_preview_concatenates_locales() {
    let provider = MockProvider::new();
    let service = service_with(&provider);

    let run = service
        .translate_locales("k=Value", &locales(&["de_DE", "fr_FR"]))
        .await
        .unwrap();

    assert_eq!(run.source_text, "k=Value");
    assert_eq!(run.preview(), "# de_DE\nk=[de] Value\n\n# fr_FR\nk=[fr] Value");
    assert_eq!(service.get_stats().snapshot().locales_completed, 2);
}
