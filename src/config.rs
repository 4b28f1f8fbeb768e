//! Configuration management for the PDF/UA server

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default upload ceiling: 16MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Process-wide configuration, built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub tools: ToolsConfig,
    pub workspace: WorkspaceConfig,
    pub debug: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Maximum accepted request body size in bytes
    pub max_bytes: usize,
}

impl UploadConfig {
    /// Ceiling expressed in whole megabytes, for user-facing messages
    pub fn max_megabytes(&self) -> usize {
        self.max_bytes / (1024 * 1024)
    }
}

#[derive(Debug, Clone)]
pub struct ToolsConfig {
    /// Ghostscript executable (name on PATH or absolute path)
    pub converter: String,
    /// veraPDF executable (name on PATH or absolute path)
    pub validator: String,
    /// Run the validator after a successful conversion
    pub validate_output: bool,
    /// Exit code the validator uses to report a compliant document
    pub compliant_exit_code: i32,
    /// Upper bound on a single tool run; `None` lets tools run to completion
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// Directory for per-request scratch files (default: system temp)
    pub scratch_dir: Option<PathBuf>,
}

impl WorkspaceConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(env::temp_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            upload: UploadConfig {
                max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            tools: ToolsConfig::default(),
            workspace: WorkspaceConfig { scratch_dir: None },
            debug: false,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            converter: "gs".to_string(),
            validator: "verapdf".to_string(),
            validate_output: true,
            compliant_exit_code: 0,
            timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT")?.unwrap_or(defaults.server.port),
            },
            upload: UploadConfig {
                max_bytes: parse_var("MAX_UPLOAD_BYTES")?.unwrap_or(defaults.upload.max_bytes),
            },
            tools: ToolsConfig {
                converter: env::var("CONVERTER_PATH").unwrap_or(defaults.tools.converter),
                validator: env::var("VALIDATOR_PATH").unwrap_or(defaults.tools.validator),
                validate_output: parse_flag("VALIDATE_OUTPUT")?
                    .unwrap_or(defaults.tools.validate_output),
                compliant_exit_code: parse_var("VALIDATOR_COMPLIANT_EXIT_CODE")?
                    .unwrap_or(defaults.tools.compliant_exit_code),
                timeout: parse_var::<u64>("TOOL_TIMEOUT_SECS")?
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs),
            },
            workspace: WorkspaceConfig {
                scratch_dir: env::var_os("SCRATCH_DIR")
                    .filter(|dir| !dir.is_empty())
                    .map(PathBuf::from),
            },
            debug: parse_flag("APP_DEBUG")?.unwrap_or(defaults.debug),
        })
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(None),
    }
}

fn parse_flag(var: &'static str) -> Result<Option<bool>, ConfigError> {
    match env::var(var) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue { var, value }),
        },
        Err(_) => Ok(None),
    }
}
