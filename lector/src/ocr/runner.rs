use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{LectorError, Result};

/// Captured result of one tesseract invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout followed by stderr, trimmed.
    pub fn combined(&self) -> String {
        let mut combined = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        combined.push_str(self.stdout.trim_end());
        if !combined.is_empty() && !self.stderr.trim().is_empty() {
            combined.push('\n');
        }
        combined.push_str(self.stderr.trim_end());
        combined.trim().to_string()
    }
}

/// Seam over process execution. The OCR invoker and health prober only ever
/// talk to tesseract through this, which keeps their parsing testable
/// without the binary installed.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the OCR binary with `args`. An `Err` means the process could not
    /// be run at all; a non-zero exit is reported through [`CommandOutput`].
    async fn run(&self, args: &[String]) -> Result<CommandOutput>;
}

/// Runs the real binary with `tokio::process`, bounded by a timeout.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    binary: String,
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, args: &[String]) -> Result<CommandOutput> {
        debug!(binary = %self.binary, ?args, "Executing OCR command");

        let mut command = Command::new(&self.binary);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(LectorError::OcrExecution(format!(
                    "Failed to run {}: {e}",
                    self.binary
                )))
            }
            Err(_) => {
                return Err(LectorError::OcrExecution(format!(
                    "{} timed out after {} seconds",
                    self.binary,
                    self.timeout.as_secs()
                )))
            }
        };

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn combined_joins_both_streams() {
        let output = CommandOutput {
            exit_code: Some(1),
            stdout: "partial\n".to_string(),
            stderr: "Error opening data file\n".to_string(),
        };
        assert_eq!(output.combined(), "partial\nError opening data file");
        assert!(!output.success());
    }

    #[test]
    fn combined_handles_empty_stdout() {
        let output = CommandOutput {
            exit_code: Some(1),
            stdout: String::new(),
            stderr: "  boom \n".to_string(),
        };
        assert_eq!(output.combined(), "boom");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn process_runner_captures_streams_and_exit_code() {
        let runner = ProcessRunner::new("sh", Duration::from_secs(10));
        let output = runner
            .run(&args(&["-c", "echo out; echo err >&2; exit 3"]))
            .await
            .unwrap();

        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[tokio::test]
    async fn missing_binary_is_an_execution_error() {
        let runner = ProcessRunner::new("lector-no-such-binary", Duration::from_secs(5));
        let result = runner.run(&args(&["--version"])).await;
        assert!(matches!(result, Err(LectorError::OcrExecution(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_process_times_out() {
        let runner = ProcessRunner::new("sh", Duration::from_millis(200));
        let result = runner.run(&args(&["-c", "sleep 5"])).await;
        match result {
            Err(LectorError::OcrExecution(msg)) => assert!(msg.contains("timed out")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
