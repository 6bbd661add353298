use anyhow::Result;
use insta::assert_snapshot;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_check_reports_templated_calls() -> Result<()> {
    let test = CliTest::with_sample()?;

    let output = test.check_command().output()?;
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    assert!(out.contains("  --> src/OrderService.cs:9:13"));
    assert!(out.contains("  --> src/UserService.cs:12:13"));
    assert!(out.contains("12 | _logger.LogInformation(\"User {UserId} logged in\", userId)"));
    assert!(out.contains("= note: LGEN001 in Demo.UserService"));
    assert!(out.ends_with("3 problems (0 errors, 3 warnings)\n"));

    // Sorted by path, then line.
    let order = out.find("OrderService.cs").unwrap();
    let user = out.find("UserService.cs").unwrap();
    assert!(order < user);

    Ok(())
}

#[test]
fn test_check_single_issue_output() -> Result<()> {
    let test = CliTest::with_sample()?;
    test.write_file(".loggenrc.json", r#"{ "ignores": ["src/UserService.cs"] }"#)?;

    let output = test.check_command().output()?;
    assert_eq!(output.status.code(), Some(1));
    assert_snapshot!(stdout(&output), @r#"
    warning: "Use a generated LoggerMessage method instead of 'LogError'"  templated-log-call
      --> src/OrderService.cs:9:13
      |
    9 | _logger.LogError("Order failed")
      |         ^
      = note: LGEN001 in Demo.OrderService

    ✘ 1 problems (0 errors, 1 warning)
    "#);

    Ok(())
}

#[test]
fn test_check_clean_snapshot() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "loggen.snapshot.json",
        r#"{ "documents": [{ "path": "src/Empty.cs", "types": [] }] }"#,
    )?;

    let output = test.check_command().output()?;
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "\u{2713} Checked 1 document - no templated log calls found\n"
    );

    Ok(())
}

#[test]
fn test_check_snapshot_flag_overrides_default() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("build/app.json", crate::SAMPLE_SNAPSHOT)?;

    let output = test
        .check_command()
        .args(["--snapshot", "build/app.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    Ok(())
}

#[test]
fn test_check_missing_snapshot_is_an_error() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.check_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Error: Failed to read snapshot"));

    Ok(())
}

#[test]
fn test_check_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_sample()?;
    test.write_file(".loggenrc.json", r#"{ "logClassName": "2Log" }"#)?;

    let output = test.check_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("logClassName"));

    Ok(())
}
