use anyhow::Result;

use crate::{CliTest, SAMPLE_SNAPSHOT, stderr, stdout};

fn member_names(snapshot: &serde_json::Value, document: usize) -> Vec<String> {
    snapshot["documents"][document]["types"][0]["members"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|member| member["name"].as_str().map(str::to_string))
        .collect()
}

#[test]
fn test_fix_dry_run_previews_without_writing() -> Result<()> {
    let test = CliTest::with_sample()?;

    let output = test.fix_command().output()?;
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    assert!(out.contains("rewrite: src/UserService.cs"));
    assert!(out.contains("rewrite: src/OrderService.cs"));
    assert!(out.contains("Log.UserLoggedIn(_logger, userId);"));
    assert!(out.contains("Log.CacheMiss(_logger);"));
    assert!(out.contains("Log.OrderFailed(_logger);"));
    assert!(out.contains(
        "[LoggerMessage(Level = LogLevel.Information, Message = \"User {UserId} logged in\")]"
    ));
    assert!(out.contains("public static partial void UserLoggedIn(ILogger logger, int userId);"));
    assert!(out.contains(
        "Would rewrite 3 log call(s) with 3 generated method(s) in 2 document(s)."
    ));
    assert!(out.contains("Run with --apply to write the snapshot."));

    assert_eq!(test.read_file("loggen.snapshot.json")?, SAMPLE_SNAPSHOT);

    Ok(())
}

#[test]
fn test_fix_apply_writes_snapshot() -> Result<()> {
    let test = CliTest::with_sample()?;

    let output = test.fix_command().arg("--apply").output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        stderr(&output)
    );
    assert!(stdout(&output).contains(
        "Rewrote 3 log call(s) with 3 generated method(s) in 2 document(s)."
    ));

    let snapshot = test.read_snapshot()?;
    assert!(member_names(&snapshot, 0).contains(&"Log".to_string()));
    assert!(member_names(&snapshot, 1).contains(&"Log".to_string()));
    assert_eq!(
        snapshot["documents"][0]["types"][0]["modifiers"],
        serde_json::json!(["public", "partial"])
    );
    let usings = snapshot["documents"][0]["usings"].as_array().unwrap();
    assert!(usings.contains(&serde_json::json!("Microsoft.Extensions.Logging")));

    // Nothing left to report afterwards.
    let output = test.check_command().output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Checked 2 documents - no templated log calls found"));

    Ok(())
}

#[test]
fn test_fix_instance_strategy() -> Result<()> {
    let test = CliTest::with_sample()?;

    let output = test
        .fix_command()
        .args(["--strategy", "instance", "--document", "src/UserService.cs"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    assert!(out.contains("LogUserLoggedIn(userId);"));
    assert!(out.contains("private partial void LogUserLoggedIn(int userId);"));
    assert!(!out.contains("rewrite: src/OrderService.cs"));
    assert!(!out.contains("static partial class Log"));

    Ok(())
}

#[test]
fn test_fix_type_scope_leaves_other_types() -> Result<()> {
    let test = CliTest::with_sample()?;

    let output = test
        .fix_command()
        .args(["--type", "Demo.OrderService", "--apply"])
        .output()?;
    assert!(output.status.success());

    let snapshot = test.read_snapshot()?;
    assert!(!member_names(&snapshot, 0).contains(&"Log".to_string()));
    assert!(member_names(&snapshot, 1).contains(&"Log".to_string()));

    let output = test.check_command().output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("2 problems (0 errors, 2 warnings)"));

    Ok(())
}

#[test]
fn test_fix_strategy_from_config() -> Result<()> {
    let test = CliTest::with_sample()?;
    test.write_file(".loggenrc.json", r#"{ "strategy": "instance" }"#)?;

    let output = test.fix_command().output()?;
    assert!(stdout(&output).contains("private partial void LogOrderFailed();"));

    Ok(())
}

#[test]
fn test_fix_custom_log_class_name() -> Result<()> {
    let test = CliTest::with_sample()?;
    test.write_file(".loggenrc.json", r#"{ "logClassName": "Diagnostics" }"#)?;

    let output = test.fix_command().output()?;
    let out = stdout(&output);
    assert!(out.contains("Diagnostics.OrderFailed(_logger);"));
    assert!(out.contains("private static partial class Diagnostics"));

    Ok(())
}

#[test]
fn test_fix_nothing_to_do() -> Result<()> {
    let test = CliTest::with_sample()?;

    let output = test
        .fix_command()
        .args(["--type", "Demo.Missing"])
        .output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("no templated log calls found"));

    Ok(())
}

#[test]
fn test_fix_document_conflicts_with_type() -> Result<()> {
    let test = CliTest::with_sample()?;

    let output = test
        .fix_command()
        .args(["--document", "src/UserService.cs", "--type", "Demo.UserService"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));

    Ok(())
}
