//! Console configuration.
//!
//! Read from TOML; every key is optional:
//!
//! ```toml
//! default-context = "home"
//! primary-context = "creator"
//! dedupe = true
//! bucket-warn-threshold = 64
//! sweep-chunk = 32
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use vigil_primitives::Context;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("I/O error reading {path}: {error}")]
	Io { path: PathBuf, error: std::io::Error },

	/// A value parsed but is outside its allowed range.
	#[error("invalid value for {field}: {reason}")]
	Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ConsoleConfig {
	/// Permanent context that can never be deactivated.
	pub default_context: Context,
	/// Context shown when a session starts.
	pub primary_context: Context,
	/// Whether [`Console::log`](crate::Console::log) deduplicates.
	pub dedupe: bool,
	/// Bucket capacity above which growth is logged as a warning.
	pub bucket_warn_threshold: usize,
	/// Entries a sweep buffers before handing them to the control thread.
	pub sweep_chunk: usize,
}

impl Default for ConsoleConfig {
	fn default() -> Self {
		Self {
			default_context: Context::Home,
			primary_context: Context::Home,
			dedupe: true,
			bucket_warn_threshold: 64,
			sweep_chunk: 32,
		}
	}
}

impl ConsoleConfig {
	pub fn parse(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&content)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.sweep_chunk == 0 {
			return Err(ConfigError::Invalid {
				field: "sweep-chunk",
				reason: "must be at least 1".into(),
			});
		}
		if self.bucket_warn_threshold == 0 {
			return Err(ConfigError::Invalid {
				field: "bucket-warn-threshold",
				reason: "must be at least 1".into(),
			});
		}
		Ok(())
	}
}
