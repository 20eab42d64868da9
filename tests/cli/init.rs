use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["includes"], serde_json::json!(["manifests", "site"]));
    assert_eq!(parsed["ignores"], serde_json::json!([]));
    assert_eq!(
        parsed["internalPrefixes"],
        serde_json::json!(["role", "profile"])
    );
    assert_eq!(parsed["forgeUrl"], "https://forge.puppet.com/");
    assert_eq!(parsed["failFast"], true);

    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.init_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created ./.modrefrc.json

    ----- stderr -----
    ");

    assert!(test.root().join(".modrefrc.json").exists());
    let content = test.read_file(".modrefrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".modrefrc.json", "{}")?;

    assert_cmd_snapshot!(test.init_command(), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    error: .modrefrc.json already exists
    ");

    assert_eq!(test.read_file(".modrefrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_used_by_check() -> Result<()> {
    let test = CliTest::new()?;
    test.init_command().output()?;
    test.write_file(
        "site/profile/manifests/init.pp",
        "class profile {\n  include role::web\n}\n",
    )?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: Module role::web not referenced in the comments  internal-reference
      --> ./site/profile/manifests/init.pp:2:11
      |
    2 |   include role::web
      |           ^
      = note: in class profile

    ✘ 1 problem (0 errors, 1 warning)

    ----- stderr -----
    ");

    Ok(())
}
