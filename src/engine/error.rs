//! Render engine error types

use thiserror::Error;

/// Longest summary handed back to clients
const SUMMARY_MAX_CHARS: usize = 200;

/// Failure reported by a render engine
#[derive(Debug, Error)]
pub enum RenderError {
    /// The converter process could not be started
    #[error("Failed to start converter `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Piping data to or from the converter failed
    #[error("Converter IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The converter exited unsuccessfully
    #[error("Converter exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    /// The converter succeeded but produced nothing
    #[error("Converter produced no output")]
    EmptyOutput,

    /// The converter output is not a PDF
    #[error("Converter output is not a PDF document")]
    InvalidOutput,

    /// Any other engine-reported failure
    #[error("{message}")]
    Other { kind: String, message: String },
}

impl RenderError {
    /// Coarse failure category reported to clients as `error_type`
    pub fn kind(&self) -> &str {
        match self {
            RenderError::Spawn { .. } => "engine_unavailable",
            RenderError::Io(_) => "io_error",
            RenderError::Failed { .. } => "render_failed",
            RenderError::EmptyOutput => "empty_output",
            RenderError::InvalidOutput => "invalid_output",
            RenderError::Other { kind, .. } => kind,
        }
    }

    /// Client-safe message: the first line of the error, bounded in length.
    ///
    /// The full error (including converter stderr) is only logged.
    pub fn summary(&self) -> String {
        let full = match self {
            RenderError::Failed { status, stderr } => {
                let first = stderr.lines().map(str::trim).find(|l| !l.is_empty());
                match first {
                    Some(line) => format!("Converter exited with {}: {}", status, line),
                    None => format!("Converter exited with {}", status),
                }
            }
            RenderError::Spawn { command, .. } => {
                format!("Failed to start converter `{}`", command)
            }
            other => other.to_string(),
        };

        let line = full.lines().next().unwrap_or_default();
        if line.chars().count() > SUMMARY_MAX_CHARS {
            let truncated: String = line.chars().take(SUMMARY_MAX_CHARS).collect();
            format!("{}...", truncated)
        } else {
            line.to_string()
        }
    }

    pub fn other(kind: impl Into<String>, message: impl Into<String>) -> Self {
        RenderError::Other {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_uses_first_stderr_line() {
        let err = RenderError::Failed {
            status: "exit status: 1".to_string(),
            stderr: "\nERROR: cannot parse stylesheet\n  at line 3\n".to_string(),
        };
        assert_eq!(err.kind(), "render_failed");
        assert_eq!(
            err.summary(),
            "Converter exited with exit status: 1: ERROR: cannot parse stylesheet"
        );
    }

    #[test]
    fn test_summary_is_bounded() {
        let err = RenderError::other("render_failed", "x".repeat(1000));
        let summary = err.summary();
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS + 3);
    }

    #[test]
    fn test_spawn_summary_hides_os_detail() {
        let err = RenderError::Spawn {
            command: "weasyprint".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        };
        assert_eq!(err.kind(), "engine_unavailable");
        assert_eq!(err.summary(), "Failed to start converter `weasyprint`");
    }
}
