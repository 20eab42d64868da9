use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

const DOCUMENTED: &str = r#"# Web server stack.
#
# @ref apache
# @note puppetlabs-apache
# @see https://forge.puppet.com/modules/puppetlabs/apache
#
# @see profile::base
# @see profile::monitoring - Feature "monitoring"
class profile::web () {
  include profile::base
  class { 'apache':
    default_vhost => false,
  }
  role::include_features({
    'monitoring' => [
      profile::monitoring,
    ],
  })
}
"#;

#[test]
fn test_documented_manifest() -> Result<()> {
    let test = CliTest::with_file("manifests/web.pp", DOCUMENTED)?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 1 manifest - no issues found

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_undocumented_internal_reference() -> Result<()> {
    let test = CliTest::with_file(
        "manifests/init.pp",
        "class test () {\n  include profile::test\n}\n",
    )?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: Module profile::test not referenced in the comments  internal-reference
      --> ./manifests/init.pp:2:11
      |
    2 |   include profile::test
      |           ^
      = note: in class test

    ✘ 1 problem (0 errors, 1 warning)

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_undocumented_component() -> Result<()> {
    let test = CliTest::with_file(
        "manifests/init.pp",
        "class test {\n  class { 'apache': }\n}\n",
    )?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: Can't find @ref tag for reference apache  component-reference
      --> ./manifests/init.pp:1:1
      |
    1 | class test {
      | ^
      = note: in class test

    ✘ 1 problem (0 errors, 1 warning)

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_structural_error_does_not_stop_the_file() -> Result<()> {
    let test = CliTest::with_file(
        "manifests/init.pp",
        "class a {\n  include class\n}\nclass b {\n  include profile::y\n}\n",
    )?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: Can not process the token 'class' in the state awaiting_include_name  unexpected-token
      --> ./manifests/init.pp:2:11
      |
    2 |   include class
      |           ^
      = note: in class a; references after this token were not checked

    warning: Module profile::y not referenced in the comments  internal-reference
      --> ./manifests/init.pp:5:11
      |
    5 |   include profile::y
      |           ^
      = note: in class b

    ✘ 2 problems (0 errors, 2 warnings)

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "manifests/init.pp",
        "# @ref apache\n# @note puppetlabs-apache\n# @see https://example.com\nclass test {\n  include apache\n}\n",
    )?;
    test.write_file(
        "site/profile/manifests/order.pp",
        "# @see profile::b\n# @see profile::a\nclass profile::order {\n  include profile::a\n  include profile::b\n}\n",
    )?;

    assert_cmd_snapshot!(test.check_command().args(["--format", "json"]), @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    [
      {
        "file": "./manifests/init.pp",
        "line": 1,
        "column": 1,
        "severity": "warning",
        "rule": "component-reference",
        "message": "First @see for reference apache is not the Puppet forge"
      },
      {
        "file": "./site/profile/manifests/order.pp",
        "line": 1,
        "column": 1,
        "severity": "warning",
        "rule": "reference-order",
        "message": "profile::a sorted after profile::b"
      }
    ]

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_json_output_without_issues() -> Result<()> {
    let test = CliTest::with_file("manifests/web.pp", DOCUMENTED)?;

    assert_cmd_snapshot!(test.check_command().args(["--format", "json"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    []

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_explicit_paths_override_includes() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "manifests/init.pp",
        "class test {\n  include profile::test\n}\n",
    )?;
    test.write_file("modules/web/manifests/init.pp", DOCUMENTED)?;

    assert_cmd_snapshot!(test.check_command().arg("modules"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 1 manifest - no issues found

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_config_ignores() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".modrefrc.json",
        r#"{
         "includes": ["manifests"],
         "ignores": ["manifests/legacy"]
     }"#,
    )?;
    test.write_file(
        "manifests/legacy/old.pp",
        "class old {\n  include profile::gone\n}\n",
    )?;
    test.write_file("manifests/web.pp", DOCUMENTED)?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 1 manifest - no issues found

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_config_internal_prefixes() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".modrefrc.json", r#"{ "internalPrefixes": ["site"] }"#)?;
    test.write_file(
        "manifests/init.pp",
        "class test {\n  include site::base\n}\n",
    )?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: Module site::base not referenced in the comments  internal-reference
      --> ./manifests/init.pp:2:11
      |
    2 |   include site::base
      |           ^
      = note: in class test

    ✘ 1 problem (0 errors, 1 warning)

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_fail_fast_stops_at_first_failing_declaration() -> Result<()> {
    let test = CliTest::with_file(
        "manifests/init.pp",
        "class a {\n  include profile::x\n}\nclass b {\n  include profile::y\n}\n",
    )?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: Module profile::x not referenced in the comments  internal-reference
      --> ./manifests/init.pp:2:11
      |
    2 |   include profile::x
      |           ^
      = note: in class a

    ✘ 1 problem (0 errors, 1 warning)

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_fail_fast_disabled_reports_every_declaration() -> Result<()> {
    let test = CliTest::with_file(
        "manifests/init.pp",
        "class a {\n  include profile::x\n}\nclass b {\n  include profile::y\n}\n",
    )?;
    test.write_file(".modrefrc.json", r#"{ "failFast": false }"#)?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: Module profile::x not referenced in the comments  internal-reference
      --> ./manifests/init.pp:2:11
      |
    2 |   include profile::x
      |           ^
      = note: in class a

    warning: Module profile::y not referenced in the comments  internal-reference
      --> ./manifests/init.pp:5:11
      |
    5 |   include profile::y
      |           ^
      = note: in class b

    ✘ 2 problems (0 errors, 2 warnings)

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_control_comments() -> Result<()> {
    let test = CliTest::with_file(
        "manifests/init.pp",
        "# lint:ignore:module_reference\nclass test {\n  include profile::test\n}\n# lint:endignore\n",
    )?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 1 manifest - no issues found

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".modrefrc.json", r#"{ "internalPrefixes": [] }"#)?;
    test.write_file("manifests/init.pp", DOCUMENTED)?;

    assert_cmd_snapshot!(test.check_command(), @r#"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: Failed to load configuration from .: Invalid config file: "./.modrefrc.json": 'internalPrefixes' must name at least one prefix
    "#);

    Ok(())
}

#[test]
fn test_missing_root_is_an_error() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.check_command().args(["--root", "does-not-exist"]), @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: Root directory does not exist: does-not-exist
    ");

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert!(stdout.contains("check"));
    assert!(stdout.contains("init"));

    Ok(())
}
