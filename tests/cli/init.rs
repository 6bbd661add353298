use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, SAMPLE_SNAPSHOT, stderr, stdout};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("\u{2713} Created .loggenrc.json\n"));
    assert!(test.root().join(".loggenrc.json").exists());

    let content = test.read_file(".loggenrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["snapshot"], "./loggen.snapshot.json");
    assert_eq!(parsed["strategy"], "shared");
    assert_eq!(parsed["logClassName"], "Log");
    assert_eq!(parsed["loggingNamespace"], "Microsoft.Extensions.Logging");
    assert!(parsed["ignores"].as_array().is_some_and(Vec::is_empty));

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".loggenrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: .loggenrc.json already exists"));
    assert_eq!(test.read_file(".loggenrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file("loggen.snapshot.json", SAMPLE_SNAPSHOT)?;

    let output = test.check_command().output()?;
    assert_eq!(
        output.status.code(),
        Some(1),
        "stderr: {}",
        stderr(&output)
    );

    Ok(())
}
