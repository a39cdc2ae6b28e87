use std::sync::Arc;

use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use i18nify::core::{
    FileKind, FragmentKind, KeyGeneratorFn, LocaleMap, MatchKind, MatchOrigin, OverrideFn,
    Provider, TransformError, TransformOptions, VueProvider, slug_key, transform,
};
use i18nify::utils::contains_alphabetic;

mod scenarios;

/// Options over a single-language locale map.
pub fn options_with(messages: Value, kind: FileKind) -> Result<TransformOptions> {
    let locales = LocaleMap::new(json!({ "en": messages }))?;
    Ok(TransformOptions::new(Arc::new(locales), kind))
}

pub fn hello_options(kind: FileKind) -> Result<TransformOptions> {
    options_with(json!({"message": {"hello": "hello world"}, "plain": "plain"}), kind)
}

#[test]
fn test_transform_is_deterministic() -> Result<()> {
    let source = concat!(
        "<template>\n",
        "  <p title=\"plain\">hello world</p>\n",
        "  <input :placeholder=\"'plain'\" />\n",
        "</template>\n",
        "<script setup>\n",
        "const a = 'hello world'\n",
        "const b = { label: 'plain' }\n",
        "</script>\n",
    );
    let opts = hello_options(FileKind::Vue)?;

    let first = transform(source, &opts)?;
    let second = transform(source, &opts)?;
    assert_eq!(first.code, second.code);
    assert_eq!(first.matches, second.matches);
    Ok(())
}

#[test]
fn test_second_run_finds_nothing_new() -> Result<()> {
    let source = concat!(
        "<template><p>hello world</p><i :title=\"['plain']\"></i></template>\n",
        "<script setup>\n",
        "const a = 'hello world'\n",
        "const b = { label: 'plain' }\n",
        "function greet() { return 'plain' }\n",
        "</script>\n",
    );
    let opts = hello_options(FileKind::Vue)?;

    let first = transform(source, &opts)?;
    assert!(!first.matches.is_empty());
    let second = transform(&first.code, &opts)?;
    assert_eq!(second.code, first.code);
    assert!(second.matches.is_empty());
    Ok(())
}

#[test]
fn test_blank_text_is_never_translated() -> Result<()> {
    let mut opts = hello_options(FileKind::Vue)?;
    let generator: KeyGeneratorFn = Arc::new(|_| Some("always".to_string()));
    opts.generator = Some(generator);

    let source = concat!(
        "<template><p>   </p><i title=\" \"></i></template>\n",
        "<script setup>\n",
        "const a = ''\n",
        "const b = '  '\n",
        "</script>\n",
    );
    let result = transform(source, &opts)?;
    assert_eq!(result.code, source);
    assert!(result.matches.is_empty());
    Ok(())
}

#[test]
fn test_custom_override_wins_over_dictionary() -> Result<()> {
    let mut opts = hello_options(FileKind::Markup)?;
    let custom: OverrideFn = Arc::new(|text| (text == "hello world").then(|| "greeting".into()));
    opts.custom = Some(custom);
    opts.provider = Some(Provider::from(VueProvider));

    let result = transform("<p>hello world</p><b>plain</b>", &opts)?;
    assert_eq!(result.code, "<p>{{ $t('greeting') }}</p><b>{{ $t('plain') }}</b>");
    let origins: Vec<MatchOrigin> = result.matches.iter().map(|m| m.origin).collect();
    assert_eq!(origins, vec![MatchOrigin::Custom, MatchOrigin::Dictionary]);
    Ok(())
}

#[test]
fn test_generated_keys_for_unknown_text() -> Result<()> {
    let mut opts = hello_options(FileKind::Vue)?;
    let generator: KeyGeneratorFn =
        Arc::new(|text| contains_alphabetic(text).then(|| slug_key("auto", text)));
    opts.generator = Some(generator);

    let result = transform("<template><p>Sign in</p><p>2024</p></template>\n", &opts)?;
    assert_eq!(
        result.code,
        "<template><p>{{ $t('auto.sign_in') }}</p><p>2024</p></template>\n"
    );
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].origin, MatchOrigin::Generated);

    // Without its own gate the generator sees every unmatched literal.
    let mut opts = hello_options(FileKind::Vue)?;
    let generator: KeyGeneratorFn = Arc::new(|text| Some(slug_key("auto", text)));
    opts.generator = Some(generator);
    let result = transform("<template><p>2024</p></template>\n", &opts)?;
    assert_eq!(result.code, "<template><p>{{ $t('auto.2024') }}</p></template>\n");
    Ok(())
}

#[test]
fn test_missing_locale_map_is_a_configuration_error() {
    let err = transform("<p>hello world</p>", &TransformOptions::default()).unwrap_err();
    assert!(matches!(err, TransformError::Configuration(_)));
    assert_eq!(err.fragment(), None);
}

#[test]
fn test_match_positions_are_file_relative() -> Result<()> {
    let source = concat!(
        "<template>\n",
        "  <p>plain</p>\n",
        "</template>\n",
        "\n",
        "<script setup>\n",
        "\n",
        "const a = 'hello world'\n",
        "</script>\n",
    );
    let result = transform(source, &hello_options(FileKind::Vue)?)?;

    let positions: Vec<(MatchKind, Option<usize>, Option<usize>)> = result
        .matches
        .iter()
        .map(|m| (m.kind, m.line, m.col))
        .collect();
    assert_eq!(
        positions,
        vec![
            (MatchKind::TemplateText, Some(2), Some(6)),
            (MatchKind::StringLiteral, Some(7), Some(12)),
        ]
    );
    assert_eq!(&source[result.matches[0].offset..][..5], "plain");
    Ok(())
}

#[test]
fn test_errors_name_their_fragment() -> Result<()> {
    let source =
        "<template><div>plain</template>\n<script setup>\nconst a = 'hello world'\n</script>\n";
    let result = transform(source, &hello_options(FileKind::Vue)?)?;

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].fragment(), Some(FragmentKind::Markup));
    assert!(result.code.starts_with("<template><div>plain</template>\n"));
    assert!(result.code.contains("computed(() => t('message.hello'))"));
    Ok(())
}
