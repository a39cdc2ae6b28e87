use anyhow::{Context, Result};
use insta::assert_snapshot;
use serde_json::Value;

use crate::{CliTest, stdout};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success());
    assert_snapshot!(stdout(&output).trim_end(), @"✓ Created .i18nifyrc.json");

    let content = test.read_file(".i18nifyrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["localesRoot"], "./locales");
    assert_eq!(parsed["primaryLocale"], "en");
    assert_eq!(parsed["includes"][0], "src");
    assert_eq!(parsed["wrapReactive"], true);
    assert!(parsed["provider"].is_null());
    assert!(content.ends_with("}\n"));

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".i18nifyrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert_snapshot!(stdout(&output).trim_end(), @"✘ .i18nifyrc.json already exists");
    assert_eq!(test.read_file(".i18nifyrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;

    test.write_file("src/App.vue", "<template><p>Save</p></template>\n")?;
    test.write_file("locales/en.json", r#"{"save": "Save"}"#)?;

    let output = test.transform_command().output()?;
    assert!(
        output.status.success(),
        "transform should work with the initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(())
}
