use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

const LOCALES: &str = r#"{
  "message": { "hello": "hello world" },
  "save": "Save"
}"#;

const APP_VUE: &str = r#"<template>
  <button title="Save">hello world</button>
</template>

<script setup>
const label = 'Save'
</script>
"#;

fn vue_project() -> Result<CliTest> {
    let test = CliTest::with_locales(LOCALES)?;
    test.write_file("src/App.vue", APP_VUE)?;
    Ok(test)
}

#[test]
fn test_dry_run_reports_and_keeps_files() -> Result<()> {
    let test = vue_project()?;

    let output = test.transform_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.starts_with("src/App.vue\n"));
    assert!(out.contains("2:18  \"Save\"         -> save  static-attribute"));
    assert!(out.contains("2:24  \"hello world\"  -> message.hello  template-text"));
    assert!(out.contains("6:16  \"Save\"         -> save  string-literal"));
    assert!(out.contains("Found 3 translatable strings in 1 of 1 file"));
    assert!(out.contains("hint: run with --apply to write the changes"));

    assert_eq!(test.read_file("src/App.vue")?, APP_VUE);
    Ok(())
}

#[test]
fn test_apply_rewrites_files() -> Result<()> {
    let test = vue_project()?;

    let output = test.transform_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Replaced 3 strings in 1 file"));

    assert_eq!(
        test.read_file("src/App.vue")?,
        r#"<template>
  <button :title="$t('save')">{{ $t('message.hello') }}</button>
</template>

<script setup>
import { useI18n } from 'vue-i18n'
import { computed } from 'vue'
const { t } = useI18n()

const label = computed(() => t('save'))
</script>
"#
    );

    // A second run finds nothing left to do.
    let output = test.transform_command().arg("--apply").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Checked 1 file - nothing to transform"));
    Ok(())
}

#[test]
fn test_react_and_script_files() -> Result<()> {
    let test = CliTest::with_locales(LOCALES)?;
    test.write_file(
        "src/Nav.tsx",
        "export function Nav() {\n  return <button>Save</button>;\n}\n",
    )?;
    test.write_file("src/alert.js", "alert('hello world');\n")?;

    let output = test.transform_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_file("src/Nav.tsx")?,
        concat!(
            "import { useTranslation } from 'react-i18next';\n",
            "const { t } = useTranslation();\n",
            "\n",
            "export function Nav() {\n",
            "  return <button>{t('save')}</button>;\n",
            "}\n",
        )
    );
    assert_eq!(
        test.read_file("src/alert.js")?,
        "alert(i18n.t('message.hello'));\n"
    );
    Ok(())
}

#[test]
fn test_json_format() -> Result<()> {
    let test = vue_project()?;

    let output = test
        .transform_command()
        .args(["--format", "json"])
        .output()?;
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["summary"]["files"], 1);
    assert_eq!(json["summary"]["matches"], 3);
    assert_eq!(json["summary"]["applied"], false);
    let file = &json["files"][0];
    assert_eq!(file["path"], "src/App.vue");
    assert_eq!(file["changed"], true);
    assert_eq!(file["matches"][1]["key"], "message.hello");
    assert_eq!(file["matches"][1]["origin"], "dictionary");
    Ok(())
}

#[test]
fn test_fragment_error_exits_with_failure() -> Result<()> {
    let test = CliTest::with_locales(LOCALES)?;
    test.write_file(
        "src/Broken.vue",
        "<template><p>hello world</p></template>\n<script>\nconst = 'Save'\n</script>\n",
    )?;

    let output = test.transform_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    assert!(out.contains("error: failed to parse script fragment"));
    assert!(out.contains("  --> src/Broken.vue"));

    // The template was still rewritten; the script block kept its text.
    assert_eq!(
        test.read_file("src/Broken.vue")?,
        concat!(
            "<template><p>{{ $t('message.hello') }}</p></template>\n",
            "<script>\n",
            "const = 'Save'\n",
            "</script>\n",
        )
    );
    Ok(())
}

#[test]
fn test_explicit_paths_and_overrides() -> Result<()> {
    let test = vue_project()?;
    test.write_file("src/Other.vue", "<template><p>Save</p></template>\n")?;

    let output = test
        .transform_command()
        .args(["src/App.vue", "--apply", "--no-script"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let app = test.read_file("src/App.vue")?;
    assert!(app.contains("{{ $t('message.hello') }}"));
    assert!(app.contains("const label = 'Save'"));
    assert_eq!(
        test.read_file("src/Other.vue")?,
        "<template><p>Save</p></template>\n"
    );
    Ok(())
}

#[test]
fn test_ignores_from_config() -> Result<()> {
    let test = vue_project()?;
    test.write_file(".i18nifyrc.json", r#"{"ignores": ["**/legacy/**"]}"#)?;
    test.write_file("src/legacy/Old.vue", "<template><p>Save</p></template>\n")?;

    let output = test.transform_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_file("src/legacy/Old.vue")?,
        "<template><p>Save</p></template>\n"
    );
    Ok(())
}

#[test]
fn test_write_locales_adds_generated_keys() -> Result<()> {
    let test = CliTest::with_locales(LOCALES)?;
    test.write_file(".i18nifyrc.json", r#"{"generatedKeyPrefix": "auto"}"#)?;
    test.write_file(
        "src/Banner.vue",
        "<template><p>Welcome back</p><p>42</p></template>\n",
    )?;

    let output = test
        .transform_command()
        .args(["--apply", "--write-locales"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("(generated)"));

    assert_eq!(
        test.read_file("src/Banner.vue")?,
        "<template><p>{{ $t('auto.welcome_back') }}</p><p>42</p></template>\n"
    );
    let en: Value = serde_json::from_str(&test.read_file("locales/en.json")?)?;
    assert_eq!(en["auto"]["welcome_back"], "Welcome back");
    assert_eq!(en["save"], "Save");
    Ok(())
}

#[test]
fn test_missing_locales_is_fatal() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("src/App.vue", APP_VUE)?;

    let output = test.transform_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Locales directory"));
    Ok(())
}

#[test]
fn test_invalid_config_is_fatal() -> Result<()> {
    let test = vue_project()?;
    test.write_file(".i18nifyrc.json", r#"{"ignores": ["[invalid"]}"#)?;

    let output = test.transform_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("ignores"));
    Ok(())
}
