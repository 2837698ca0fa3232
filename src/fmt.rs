//! Formatter boundary.
//!
//! The emitter produces valid but loosely laid out Go; the final layout comes
//! from an external canonical formatter (`gofmt` by default).

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

use crate::error::{NormError, NormResult};

/// Canonicalizes generated source before it is written.
pub trait SourceFormatter {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    fn format(&self, source: &str) -> NormResult<String>;
}

/// Pipes source through an external program, `gofmt` by default: source on
/// stdin, formatted source on stdout.
#[derive(Debug, Clone)]
pub struct ExternalFormatter {
    program: String,
    args: Vec<String>,
}

impl ExternalFormatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn fail(&self, message: impl Into<String>) -> NormError {
        NormError::Formatter {
            program: self.program.clone(),
            message: message.into(),
        }
    }
}

impl Default for ExternalFormatter {
    fn default() -> Self {
        Self::new("gofmt", Vec::new())
    }
}

impl SourceFormatter for ExternalFormatter {
    fn name(&self) -> &str {
        &self.program
    }

    fn format(&self, source: &str) -> NormResult<String> {
        debug!(program = %self.program, args = ?self.args, bytes = source.len(), "running formatter");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.fail(format!("failed to start: {}", e)))?;

        // Feed stdin from a separate thread so a full stdout pipe cannot block us.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.fail("stdin unavailable"))?;
        let input = source.to_owned();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child
            .wait_with_output()
            .map_err(|e| self.fail(format!("waiting for exit: {}", e)))?;
        let written = writer
            .join()
            .map_err(|_| self.fail("stdin writer panicked"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            return Err(self.fail(if detail.is_empty() {
                format!("exited with {}", output.status)
            } else {
                detail.to_string()
            }));
        }
        written.map_err(|e| self.fail(format!("writing input: {}", e)))?;

        String::from_utf8(output.stdout).map_err(|e| self.fail(format!("output is not UTF-8: {}", e)))
    }
}

/// Leaves the source untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl SourceFormatter for Passthrough {
    fn name(&self) -> &str {
        "none"
    }

    fn format(&self, source: &str) -> NormResult<String> {
        Ok(source.to_string())
    }
}
