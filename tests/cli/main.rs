use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod check;
mod fix;
mod init;

const BIN_NAME: &str = "loggen";

const SNAPSHOT_FILE: &str = "loggen.snapshot.json";

/// Two documents with three templated log calls:
/// `UserService.Login` (`LogInformation` with one argument, `LogWarning`)
/// and `OrderService.Place` (`LogError`).
pub const SAMPLE_SNAPSHOT: &str = r#"{
  "documents": [
    {
      "path": "src/UserService.cs",
      "usings": ["System"],
      "namespace": "Demo",
      "types": [
        {
          "id": 1,
          "kind": "class",
          "name": "UserService",
          "modifiers": ["public"],
          "members": [
            { "member": "field", "id": 2, "modifiers": ["private", "readonly"], "type": "ILogger<UserService>", "name": "_logger" },
            {
              "member": "method",
              "id": 3,
              "modifiers": ["public"],
              "return_type": "void",
              "name": "Login",
              "params": [{ "type": "int", "name": "userId" }],
              "body": [
                {
                  "stmt": "expr",
                  "expr": {
                    "expr": "call",
                    "id": 10,
                    "callee": { "expr": "member", "id": 100, "target": { "expr": "ident", "id": 11, "name": "_logger" }, "name": "LogInformation" },
                    "args": [
                      { "expr": "str", "id": 12, "value": "User {UserId} logged in" },
                      { "expr": "ident", "id": 13, "name": "userId" }
                    ],
                    "span": { "line": 12, "col": 13 }
                  }
                },
                {
                  "stmt": "expr",
                  "expr": {
                    "expr": "call",
                    "id": 20,
                    "callee": { "expr": "member", "id": 200, "target": { "expr": "ident", "id": 21, "name": "_logger" }, "name": "LogWarning" },
                    "args": [{ "expr": "str", "id": 22, "value": "Cache miss" }],
                    "span": { "line": 13, "col": 13 }
                  }
                }
              ]
            }
          ]
        }
      ]
    },
    {
      "path": "src/OrderService.cs",
      "namespace": "Demo",
      "types": [
        {
          "id": 30,
          "kind": "class",
          "name": "OrderService",
          "modifiers": ["public"],
          "members": [
            { "member": "field", "id": 31, "modifiers": ["private", "readonly"], "type": "ILogger<OrderService>", "name": "_logger" },
            {
              "member": "method",
              "id": 32,
              "modifiers": ["public"],
              "return_type": "void",
              "name": "Place",
              "body": [
                {
                  "stmt": "expr",
                  "expr": {
                    "expr": "call",
                    "id": 40,
                    "callee": { "expr": "member", "id": 400, "target": { "expr": "ident", "id": 41, "name": "_logger" }, "name": "LogError" },
                    "args": [{ "expr": "str", "id": 42, "value": "Order failed" }],
                    "span": { "line": 9, "col": 13 }
                  }
                }
              ]
            }
          ]
        }
      ]
    }
  ],
  "types": {
    "types": {
      "Microsoft.Extensions.Logging.ILogger": {},
      "Microsoft.Extensions.Logging.ILogger<Demo.UserService>": { "interfaces": ["Microsoft.Extensions.Logging.ILogger"] },
      "Microsoft.Extensions.Logging.ILogger<Demo.OrderService>": { "interfaces": ["Microsoft.Extensions.Logging.ILogger"] },
      "Microsoft.Extensions.Logging.LoggerExtensions": { "base": "System.Object" }
    },
    "expressions": {
      "11": "Microsoft.Extensions.Logging.ILogger<Demo.UserService>",
      "13": "System.Int32",
      "21": "Microsoft.Extensions.Logging.ILogger<Demo.UserService>",
      "41": "Microsoft.Extensions.Logging.ILogger<Demo.OrderService>"
    },
    "methods": {
      "10": { "name": "LogInformation", "declaring_type": "Microsoft.Extensions.Logging.LoggerExtensions" },
      "20": { "name": "LogWarning", "declaring_type": "Microsoft.Extensions.Logging.LoggerExtensions" },
      "40": { "name": "LogError", "declaring_type": "Microsoft.Extensions.Logging.LoggerExtensions" }
    }
  }
}
"#;

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Stop config lookup at the temp dir.
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// A project with [`SAMPLE_SNAPSHOT`] at the default snapshot path.
    pub fn with_sample() -> Result<Self> {
        let test = Self::new()?;
        test.write_file(SNAPSHOT_FILE, SAMPLE_SNAPSHOT)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }

    pub fn read_snapshot(&self) -> Result<serde_json::Value> {
        let content = self.read_file(SNAPSHOT_FILE)?;
        serde_json::from_str(&content).context("Snapshot should be valid JSON")
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn check_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("check");
        cmd
    }

    pub fn fix_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("fix");
        cmd
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
