//! In-memory [`CommandRunner`] for exercising the OCR and health paths
//! without a tesseract install.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{LectorError, Result};

use super::runner::{CommandOutput, CommandRunner};

/// Replays canned outputs and records every argument list it receives.
///
/// Queued responses (see [`ScriptedRunner::push`]) are consumed first, in
/// order. After that, the first rule registered with
/// [`ScriptedRunner::when_arg`] whose argument appears in the call answers.
/// Anything else fails as if the binary were missing.
#[derive(Default)]
pub struct ScriptedRunner {
    queued: Mutex<VecDeque<Result<CommandOutput>>>,
    rules: Mutex<Vec<(String, CommandOutput)>>,
    calls: Mutex<Vec<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedRunner {
    pub fn push(&self, response: Result<CommandOutput>) {
        lock(&self.queued).push_back(response);
    }

    pub fn when_arg(&self, arg: impl Into<String>, output: CommandOutput) {
        lock(&self.rules).push((arg.into(), output));
    }

    /// Convenience for a successful run printing `stdout`.
    pub fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    /// Convenience for a failed run printing `stderr`.
    pub fn failed(code: i32, stderr: &str) -> CommandOutput {
        CommandOutput {
            exit_code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, args: &[String]) -> Result<CommandOutput> {
        lock(&self.calls).push(args.to_vec());

        if let Some(response) = lock(&self.queued).pop_front() {
            return response;
        }

        lock(&self.rules)
            .iter()
            .find(|(arg, _)| args.iter().any(|a| a == arg))
            .map(|(_, output)| output.clone())
            .ok_or_else(|| {
                LectorError::OcrExecution("Failed to run tesseract: not found".to_string())
            })
    }
}
