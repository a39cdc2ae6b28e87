//! End-to-end behaviour over single fragments, one per documented scenario.

use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use i18nify::core::{
    FileKind, FragmentKind, MatchKind, Provider, ReactProvider, VueProvider, transform,
};

use crate::{hello_options, options_with};

#[test]
fn test_text_node_becomes_interpolation() -> Result<()> {
    let mut opts = hello_options(FileKind::Markup)?;
    opts.provider = Some(Provider::from(VueProvider));

    let result = transform("<div>hello world</div>", &opts)?;
    assert_eq!(result.code, "<div>{{ $t('message.hello') }}</div>");
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].kind, MatchKind::TemplateText);
    assert_eq!(result.matches[0].kind.as_str(), "template-text");
    assert_eq!(result.matches[0].key, "message.hello");
    Ok(())
}

#[test]
fn test_top_level_declaration_is_wrapped_once() -> Result<()> {
    let mut opts = hello_options(FileKind::Script { jsx: false })?;
    opts.provider = Some(Provider::from(VueProvider));
    opts.wrap_reactive = true;

    let result = transform("const a = 'hello world'\n", &opts)?;
    assert!(
        result
            .code
            .contains("const a = computed(() => t('message.hello'))"),
        "{}",
        result.code
    );
    assert_eq!(result.code.matches("computed(() =>").count(), 1);
    assert_eq!(result.matches.len(), 1);
    Ok(())
}

#[test]
fn test_react_declaration_is_memoized() -> Result<()> {
    let mut opts = hello_options(FileKind::Script { jsx: true })?;
    opts.provider = Some(Provider::from(ReactProvider));

    let result = transform("const a = 'hello world';\n", &opts)?;
    assert!(
        result
            .code
            .contains("const a = useMemo(() => t('message.hello'), [t])"),
        "{}",
        result.code
    );
    assert_eq!(result.code.matches("useMemo(() =>").count(), 1);
    Ok(())
}

#[test]
fn test_unknown_literal_is_untouched() -> Result<()> {
    let source = concat!(
        "<template><p>notMatch</p></template>\n",
        "<script setup>\n",
        "const a = 'notMatch'\n",
        "</script>\n",
    );
    let result = transform(source, &hello_options(FileKind::Vue)?)?;

    assert_eq!(result.code, source);
    assert!(result.matches.is_empty());
    assert!(result.errors.is_empty());
    Ok(())
}

#[test]
fn test_static_attribute_becomes_bound() -> Result<()> {
    let opts = options_with(json!({"plain": "plain"}), FileKind::Vue)?;

    let result = transform(
        "<template><input placeholder=\"plain\" /></template>\n",
        &opts,
    )?;
    assert_eq!(
        result.code,
        "<template><input :placeholder=\"$t('plain')\" /></template>\n"
    );
    assert!(!result.code.contains(" placeholder="));
    assert_eq!(result.matches[0].kind, MatchKind::StaticAttribute);
    Ok(())
}

#[test]
fn test_malformed_markup_is_left_as_is() -> Result<()> {
    let mut opts = hello_options(FileKind::Markup)?;
    opts.provider = Some(Provider::from(VueProvider));

    let source = "<div><span>hello world</div>";
    let result = transform(source, &opts)?;
    assert_eq!(result.code, source);
    assert!(result.matches.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].is_parse_error());
    assert_eq!(result.errors[0].fragment(), Some(FragmentKind::Markup));
    Ok(())
}

#[test]
fn test_omitted_end_tags_are_valid_markup() -> Result<()> {
    let opts = options_with(json!({"save": "Save", "home": "Home"}), FileKind::Vue)?;

    let result = transform("<template><ul><li>Save<li>Home</ul></template>\n", &opts)?;
    assert!(result.errors.is_empty());
    assert_eq!(
        result.code,
        "<template><ul><li>{{ $t('save') }}<li>{{ $t('home') }}</ul></template>\n"
    );
    Ok(())
}
