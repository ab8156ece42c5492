//! Error types for the oracle.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OracleError>;

#[derive(Error, Debug)]
pub enum OracleError {
	#[error("Configuration error: {0}")]
	Config(String),

	#[error("Chain fetch failed for {what}: {reason}")]
	ChainFetch { what: String, reason: String },

	#[error("No qualifying event found in transaction {0}")]
	EventNotFound(String),

	#[error("Encoding error: {0}")]
	Encoding(String),

	#[error("Signing error: {0}")]
	Signing(String),

	#[error("Request validation error: {0}")]
	RequestValidation(String),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}
