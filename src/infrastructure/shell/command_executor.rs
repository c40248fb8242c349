//! Command executor for running the captured curl command
//!
//! The response example can be produced by actually running the command;
//! this module owns spawning it, capturing its output and enforcing a timeout.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Failures while running a shell command
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to execute command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' timed out after {}s", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },
}

/// Trait for executing shell commands
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute `command` through the shell, giving up after `timeout`
    async fn execute(&self, command: &str, timeout: Duration)
    -> Result<CommandResult, CommandError>;
}

/// Result of command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Check if the command was successful
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Default command executor using tokio::process
pub struct ShellCommandExecutor;

impl ShellCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShellCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for ShellCommandExecutor {
    async fn execute(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<CommandResult, CommandError> {
        let (shell, shell_arg) = if cfg!(target_os = "windows") {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };

        debug!(%command, timeout_secs = timeout.as_secs(), "Executing command");
        let child = Command::new(shell)
            .arg(shell_arg)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                command: command.to_string(),
                source,
            })?;

        // Dropping the pending future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => output.map_err(|source| CommandError::Spawn {
                command: command.to_string(),
                source,
            })?,
            Err(_) => {
                warn!(%command, "Command timed out, killed");
                return Err(CommandError::Timeout {
                    command: command.to_string(),
                    timeout,
                });
            }
        };

        Ok(CommandResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Mock command executor for testing
#[cfg(test)]
pub struct MockCommandExecutor {
    pub results: std::collections::HashMap<String, CommandResult>,
    pub executed: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockCommandExecutor {
    pub fn new() -> Self {
        Self {
            results: std::collections::HashMap::new(),
            executed: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_result(
        mut self,
        command: &str,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        self.results.insert(
            command.to_string(),
            CommandResult {
                exit_code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl CommandExecutor for MockCommandExecutor {
    async fn execute(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<CommandResult, CommandError> {
        self.executed.lock().unwrap().push(command.to_string());
        self.results
            .get(command)
            .cloned()
            .ok_or_else(|| CommandError::Timeout {
                command: command.to_string(),
                timeout,
            })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shell_command_executor_success() {
        let result = ShellCommandExecutor::new()
            .execute("printf '{\"ok\":true}'", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(result.is_success());
        assert_eq!(result.stdout, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_shell_command_executor_failure_exit_code() {
        let result = ShellCommandExecutor::new()
            .execute("echo oops >&2; exit 3", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(!result.is_success());
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_shell_command_executor_timeout() {
        let err = ShellCommandExecutor::new()
            .execute("sleep 5", Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_mock_executor_records_commands() {
        let mock = MockCommandExecutor::new().with_result("curl x", 0, "[]", "");
        let result = mock.execute("curl x", Duration::from_secs(1)).await.unwrap();
        assert_eq!(result.stdout, "[]");
        assert!(mock.execute("curl y", Duration::from_secs(1)).await.is_err());
        assert_eq!(mock.executed(), vec!["curl x", "curl y"]);
    }
}
