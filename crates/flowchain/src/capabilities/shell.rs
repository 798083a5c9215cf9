use std::io::Write;
use std::process::Command;

use async_trait::async_trait;
use serde_json::json;
use tempfile::NamedTempFile;

use super::{Capability, MACOS_ONLY};
use crate::errors::{ToolError, ToolResult};
use crate::models::tool::{Tool, ToolCall, ToolOutput};

/// OS automation: run shell commands, run model-generated scripts, and drive
/// macOS Shortcuts.
pub struct ShellCapability {
    tools: Vec<Tool>,
}

impl ShellCapability {
    pub fn new() -> Self {
        let run_command = Tool::new(
            "run_command",
            "Run a shell command on the user's machine and return its output",
            json!({
                "type": "object",
                "required": ["command"],
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "The shell command to run"
                    }
                }
            }),
        );

        let run_script = Tool::new(
            "generate_and_run_script",
            "Execute a generated script. Use `applescript` to automate macOS \
             applications when no dedicated tool exists, `bash` otherwise.",
            json!({
                "type": "object",
                "required": ["language", "script"],
                "properties": {
                    "language": {
                        "enum": ["applescript", "bash"],
                        "description": "The language of the script"
                    },
                    "script": {
                        "type": "string",
                        "description": "The full script source to execute"
                    }
                }
            }),
        );

        let run_shortcut = Tool::new(
            "run_shortcut",
            "Runs the macOS shortcut with the given name, e.g. 'Start Pomodoro'",
            json!({
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "The name of the shortcut to run"
                    }
                }
            }),
        );

        let get_shortcuts = Tool::new(
            "get_shortcuts",
            "List the names of the shortcuts available on the user's machine",
            json!({"type": "object", "properties": {}}),
        );

        Self {
            tools: vec![run_command, run_script, run_shortcut, get_shortcuts],
        }
    }

    fn run_command(&self, call: &ToolCall) -> ToolResult<ToolOutput> {
        let command = call
            .str_arg("command")
            .ok_or_else(|| ToolError::InvalidArguments("`command` is required".to_string()))?;

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        Ok(ToolOutput::Record(json!({
            "status": output.status.code(),
            "stdout": String::from_utf8_lossy(&output.stdout),
            "stderr": String::from_utf8_lossy(&output.stderr),
        })))
    }

    fn run_script(&self, call: &ToolCall) -> ToolResult<ToolOutput> {
        let language = call
            .str_arg("language")
            .ok_or_else(|| ToolError::InvalidArguments("`language` is required".to_string()))?;
        let script = call
            .str_arg("script")
            .ok_or_else(|| ToolError::InvalidArguments("`script` is required".to_string()))?;

        let interpreter = match language {
            "applescript" => {
                if !cfg!(target_os = "macos") {
                    return Ok(ToolOutput::text(MACOS_ONLY));
                }
                "osascript"
            }
            "bash" => "bash",
            other => {
                return Err(ToolError::InvalidArguments(format!(
                    "unsupported script language: {other}"
                )))
            }
        };

        let mut file = NamedTempFile::new().map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        file.write_all(script.as_bytes())
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        let output = Command::new(interpreter)
            .arg(file.path())
            .output()
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        if output.status.success() {
            Ok(ToolOutput::text(
                String::from_utf8_lossy(&output.stdout).to_string(),
            ))
        } else {
            Err(ToolError::ExecutionFailed(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ))
        }
    }

    fn run_shortcut(&self, call: &ToolCall) -> ToolResult<ToolOutput> {
        let name = call
            .str_arg("name")
            .ok_or_else(|| ToolError::InvalidArguments("`name` is required".to_string()))?;

        if !cfg!(target_os = "macos") {
            return Ok(ToolOutput::text(MACOS_ONLY));
        }

        let status = Command::new("shortcuts")
            .arg("run")
            .arg(name)
            .status()
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        if status.success() {
            Ok(ToolOutput::text(format!("Successfully ran shortcut {name}")))
        } else {
            Err(ToolError::ExecutionFailed(format!(
                "shortcut {name} exited with {status}"
            )))
        }
    }

    fn get_shortcuts(&self) -> ToolResult<ToolOutput> {
        if !cfg!(target_os = "macos") {
            return Ok(ToolOutput::text(MACOS_ONLY));
        }

        let output = Command::new("shortcuts")
            .arg("list")
            .output()
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        let names: Vec<serde_json::Value> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| json!(line))
            .collect();

        Ok(ToolOutput::Many(names))
    }
}

impl Default for ShellCapability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capability for ShellCapability {
    fn name(&self) -> &str {
        "shell"
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, call: ToolCall) -> ToolResult<ToolOutput> {
        match call.name.as_str() {
            "run_command" => self.run_command(&call),
            "generate_and_run_script" => self.run_script(&call),
            "run_shortcut" => self.run_shortcut(&call),
            "get_shortcuts" => self.get_shortcuts(),
            _ => Err(ToolError::NotFound(call.name)),
        }
    }
}
