//! Configuration management for the PDF API

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on the request body accepted by `/convert`
    pub max_body_bytes: usize,
    /// Default response mode for `/convert` when the request does not pick one
    pub response_mode: ResponseMode,
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Number of renders allowed to run at once
    pub workers: usize,
    /// Requests admitted beyond `workers` that may wait for a free slot
    pub queue_depth: usize,
    /// Per-request render timeout, covering queue wait and execution
    pub timeout: Duration,
    /// Converter binary invoked by the command engine
    pub command: String,
    /// Arguments for the converter; the default reads stdin and writes stdout
    pub args: Vec<String>,
}

/// How a successful conversion is returned to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// JSON envelope with the PDF as base64
    #[default]
    Json,
    /// Raw `application/pdf` attachment
    Pdf,
}

impl std::str::FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseMode::Json),
            "pdf" => Ok(ResponseMode::Pdf),
            other => Err(other.to_string()),
        }
    }
}

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_QUEUE_DEPTH: usize = 8;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_RENDER_COMMAND: &str = "weasyprint";
pub const DEFAULT_RENDER_ARGS: &str = "- -";

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
                max_body_bytes: DEFAULT_MAX_BODY_BYTES,
                response_mode: ResponseMode::Json,
            },
            render: RenderConfig {
                workers: DEFAULT_WORKERS,
                queue_depth: DEFAULT_QUEUE_DEPTH,
                timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
                command: DEFAULT_RENDER_COMMAND.to_string(),
                args: split_args(DEFAULT_RENDER_ARGS),
            },
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Missing keys fall back to their defaults; present but unparseable
    /// values are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let workers: usize = parse_or(&lookup, "RENDER_WORKERS", DEFAULT_WORKERS)?;
        if workers == 0 {
            return Err(ConfigError::Invalid {
                key: "RENDER_WORKERS",
                value: "0".to_string(),
            });
        }

        let timeout_ms: u64 = parse_or(&lookup, "RENDER_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;
        if timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "RENDER_TIMEOUT_MS",
                value: "0".to_string(),
            });
        }

        Ok(Config {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
                max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
                response_mode: parse_or(&lookup, "RESPONSE_MODE", ResponseMode::Json)?,
            },
            render: RenderConfig {
                workers,
                queue_depth: parse_or(&lookup, "RENDER_QUEUE_DEPTH", DEFAULT_QUEUE_DEPTH)?,
                timeout: Duration::from_millis(timeout_ms),
                command: lookup("RENDER_COMMAND")
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_RENDER_COMMAND.to_string()),
                args: split_args(
                    &lookup("RENDER_ARGS").unwrap_or_else(|| DEFAULT_RENDER_ARGS.to_string()),
                ),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn split_args(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.render.workers, 4);
        assert_eq!(config.render.timeout, Duration::from_millis(30_000));
        assert_eq!(config.render.command, "weasyprint");
        assert_eq!(config.render.args, vec!["-", "-"]);
        assert_eq!(config.server.response_mode, ResponseMode::Json);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("RENDER_WORKERS", "2"),
            ("RENDER_QUEUE_DEPTH", "0"),
            ("RENDER_TIMEOUT_MS", "1500"),
            ("RENDER_COMMAND", "wkhtmltopdf"),
            ("RENDER_ARGS", "--quiet - -"),
            ("RESPONSE_MODE", "PDF"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.render.workers, 2);
        assert_eq!(config.render.queue_depth, 0);
        assert_eq!(config.render.timeout, Duration::from_millis(1500));
        assert_eq!(config.render.command, "wkhtmltopdf");
        assert_eq!(config.render.args, vec!["--quiet", "-", "-"]);
        assert_eq!(config.server.response_mode, ResponseMode::Pdf);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));

        let err = Config::from_lookup(lookup(&[("RENDER_WORKERS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "RENDER_WORKERS", .. }));

        let err = Config::from_lookup(lookup(&[("RESPONSE_MODE", "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "RESPONSE_MODE", .. }));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = Config::from_lookup(lookup(&[("PORT", "  "), ("RENDER_COMMAND", "")])).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.render.command, "weasyprint");
    }
}
