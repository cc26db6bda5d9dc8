//! Subprocess render engine
//!
//! Pipes the document into an external converter on stdin and reads the PDF
//! from stdout. With the default arguments this runs `weasyprint - -`.

use std::io::Write;
use std::process::{Command, Stdio};

use super::{RenderEngine, RenderError};
use crate::config::RenderConfig;

/// Magic bytes every PDF document starts with
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Render engine that shells out to a converter binary
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }
}

impl RenderEngine for CommandEngine {
    fn name(&self) -> &str {
        &self.program
    }

    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                command: self.program.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RenderError::other("io_error", "Converter stdin unavailable"))?;

        // Feed stdin from a separate thread; a converter that streams output
        // before consuming all input would otherwise deadlock on full pipes.
        let output = std::thread::scope(|scope| {
            let writer = scope.spawn(move || {
                let result = stdin.write_all(html.as_bytes());
                drop(stdin);
                result
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (output, written)
        });

        let (output, written) = output;
        let output = output?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        // A broken pipe only matters if the converter also failed to produce output
        if let Err(e) = written {
            if output.stdout.is_empty() {
                return Err(RenderError::Io(e));
            }
            tracing::debug!(error = %e, "Converter closed stdin early");
        }

        if output.stdout.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        if !output.stdout.starts_with(PDF_MAGIC) {
            return Err(RenderError::InvalidOutput);
        }

        Ok(output.stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandEngine {
        CommandEngine::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let engine = CommandEngine::new("definitely-not-a-real-converter-binary", vec![]);
        let err = engine.render("<html></html>").unwrap_err();
        assert_eq!(err.kind(), "engine_unavailable");
    }

    #[test]
    fn test_stdout_is_returned() {
        let engine = sh("cat >/dev/null; printf '%%PDF-1.7 fake'");
        let bytes = engine.render("<p>hello</p>").unwrap();
        assert_eq!(bytes, b"%PDF-1.7 fake");
    }

    #[test]
    fn test_stdin_is_piped() {
        // Echo input back behind a PDF header
        let engine = sh("printf '%%PDF-'; cat");
        let bytes = engine.render("<p>body</p>").unwrap();
        assert_eq!(bytes, b"%PDF-<p>body</p>");
    }

    #[test]
    fn test_nonzero_exit_is_render_failure() {
        let engine = sh("cat >/dev/null; echo 'bad markup' >&2; exit 3");
        let err = engine.render("<p>x</p>").unwrap_err();
        assert_eq!(err.kind(), "render_failed");
        assert!(err.summary().contains("bad markup"));
    }

    #[test]
    fn test_empty_and_invalid_output() {
        let err = sh("cat >/dev/null").render("<p>x</p>").unwrap_err();
        assert_eq!(err.kind(), "empty_output");

        let err = sh("cat >/dev/null; printf 'not a pdf'").render("<p>x</p>").unwrap_err();
        assert_eq!(err.kind(), "invalid_output");
    }
}
