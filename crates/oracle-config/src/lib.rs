//! Configuration loading for the oracle.
//!
//! TOML files with `${VAR_NAME}` environment substitution, a small set of
//! `ORACLE_`-prefixed environment overrides, and startup validation. A
//! configuration that fails validation prevents the process from serving
//! anything.

mod types;

pub use types::{
	ApiSettings, ChainSettings, OracleConfig, OracleSettings, PollerSettings, SignerSettings,
};

use oracle_types::parse_felt;
use std::env;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Configuration loader with environment variable substitution.
#[derive(Default)]
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "ORACLE_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<OracleConfig, ConfigError> {
		let mut config = if let Some(file_path) = &self.file_path {
			self.load_from_file(file_path).await?
		} else {
			return Err(ConfigError::FileNotFound(
				"No configuration file specified".to_string(),
			));
		};

		self.apply_env_overrides(&mut config)?;
		validate_config(&config)?;

		Ok(config)
	}

	async fn load_from_file(&self, file_path: &str) -> Result<OracleConfig, ConfigError> {
		let content = tokio::fs::read_to_string(file_path).await?;
		let substituted_content = self.substitute_env_vars(&content)?;

		let config: OracleConfig = toml::from_str(&substituted_content)
			.map_err(|e| ConfigError::ParseError(e.to_string()))?;

		Ok(config)
	}

	fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
		let mut result = content.to_string();

		// Find and replace ${VAR_NAME} patterns
		let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

		for cap in re.captures_iter(content) {
			let full_match = &cap[0];
			let var_name = &cap[1];

			let env_value = env::var(var_name)
				.map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

			result = result.replace(full_match, &env_value);
		}

		Ok(result)
	}

	fn apply_env_overrides(&self, config: &mut OracleConfig) -> Result<(), ConfigError> {
		if let Ok(port) = env::var(format!("{}HTTP_PORT", self.env_prefix)) {
			config.api.port = port
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid HTTP port: {}", e)))?;
		}

		if let Ok(interval) = env::var(format!("{}POLL_INTERVAL_SECS", self.env_prefix)) {
			config.poller.poll_interval_secs = interval.parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid poll interval: {}", e))
			})?;
		}

		Ok(())
	}
}

fn validate_config(config: &OracleConfig) -> Result<(), ConfigError> {
	if config.chain.server.is_empty() {
		return Err(ConfigError::ValidationError(
			"chain.server must not be empty".to_string(),
		));
	}

	if config.chain.event_name.is_empty() {
		return Err(ConfigError::ValidationError(
			"chain.event_name must not be empty".to_string(),
		));
	}

	if parse_felt(&config.chain.gateway_address).is_err() {
		return Err(ConfigError::ValidationError(format!(
			"chain.gateway_address {:?} is not a valid felt value",
			config.chain.gateway_address
		)));
	}

	if config.oracle.protocol.is_empty() {
		return Err(ConfigError::ValidationError(
			"oracle.protocol must not be empty".to_string(),
		));
	}

	for (i, signer) in config.signers.iter().enumerate() {
		match (&signer.mnemonic, &signer.private_key) {
			(Some(_), Some(_)) => {
				return Err(ConfigError::ValidationError(format!(
					"signers[{}] sets both mnemonic and private_key",
					i
				)))
			}
			(None, None) => {
				return Err(ConfigError::ValidationError(format!(
					"signers[{}] sets neither mnemonic nor private_key",
					i
				)))
			}
			_ => {}
		}
		if signer.index.is_some() && signer.mnemonic.is_none() {
			return Err(ConfigError::ValidationError(format!(
				"signers[{}] sets index without a mnemonic",
				i
			)));
		}
	}

	if !config.api.enabled && !config.poller.enabled {
		return Err(ConfigError::ValidationError(
			"neither the API nor the poller is enabled".to_string(),
		));
	}

	if config.poller.enabled && config.poller.poll_interval_secs == 0 {
		return Err(ConfigError::ValidationError(
			"poller.poll_interval_secs must be at least 1".to_string(),
		));
	}

	Ok(())
}
