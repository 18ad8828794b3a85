//! Configuration module for the permit2 swap executor.
//!
//! Configuration is read from TOML. String values may reference environment
//! variables as `${VAR}` or `${VAR:-default}`, which is how the signing key,
//! the aggregator API key and the RPC URL are normally supplied. A missing
//! variable, a missing section or a blank credential is a startup error; the
//! swap pipeline never runs with partial configuration.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["secrets.toml"]` to include other config files
//! - Each top-level section must be unique across all files

#[cfg(any(test, feature = "testing"))]
pub mod builders;
mod loader;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use swap_types::{Address, SecretString, MAX_BASIS_POINTS};
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message, drop the echoed input
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// The trade to execute.
	pub swap: SwapConfig,
	/// Aggregator endpoint and credentials.
	pub aggregator: AggregatorConfig,
	/// Chain RPC endpoint and confirmation policy.
	pub network: NetworkConfig,
	/// Trader account.
	pub account: AccountConfig,
}

/// The trade to execute.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SwapConfig {
	/// Chain the swap settles on.
	pub chain_id: u64,
	/// Token being sold.
	pub sell_token: Address,
	/// Token being bought.
	pub buy_token: Address,
	/// Amount to sell in whole-token units, e.g. "0.1".
	/// Scaled by the sell token's on-chain decimals at run time.
	pub sell_amount: String,
	/// Affiliate fee in basis points. Defaults to 100 (1%).
	#[serde(default = "default_affiliate_fee_bps")]
	pub affiliate_fee_bps: u16,
	/// Whether the aggregator may collect trade surplus. Defaults to true.
	#[serde(default = "default_surplus_collection")]
	pub surplus_collection: bool,
}

fn default_affiliate_fee_bps() -> u16 {
	100
}

fn default_surplus_collection() -> bool {
	true
}

/// Aggregator endpoint and credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AggregatorConfig {
	/// Base URL of the swap API.
	#[serde(default = "default_aggregator_url")]
	pub base_url: String,
	/// API key sent with every request.
	pub api_key: SecretString,
	/// API version tag sent with every request.
	#[serde(default = "default_api_version")]
	pub api_version: String,
	/// HTTP request timeout in seconds.
	#[serde(default = "default_request_timeout")]
	pub timeout_seconds: u64,
}

fn default_aggregator_url() -> String {
	"https://api.0x.org".to_string()
}

fn default_api_version() -> String {
	"v2".to_string()
}

fn default_request_timeout() -> u64 {
	30
}

/// Chain RPC endpoint and confirmation policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// HTTP(S) JSON-RPC endpoint.
	pub rpc_url: String,
	/// Block explorer base URL used to print transaction links.
	#[serde(default)]
	pub explorer_url: Option<String>,
	/// Upper bound on waiting for the approval transaction to be mined.
	#[serde(default = "default_approval_timeout")]
	pub approval_timeout_seconds: u64,
	/// Interval between receipt polls while waiting.
	#[serde(default = "default_poll_interval")]
	pub receipt_poll_interval_seconds: u64,
}

fn default_approval_timeout() -> u64 {
	300
}

fn default_poll_interval() -> u64 {
	2
}

/// Trader account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Hex-encoded secp256k1 private key.
	pub private_key: SecretString,
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		result.push_str(&input[last..full_match.start()]);
		result.push_str(&value);
		last = full_match.end();
	}
	result.push_str(&input[last..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	/// Validates the configuration.
	///
	/// Checks credentials are present, the trade is well formed and the
	/// network timing values are usable.
	fn validate(&self) -> Result<(), ConfigError> {
		// Swap
		if self.swap.chain_id == 0 {
			return Err(ConfigError::Validation("swap.chain_id cannot be 0".into()));
		}
		if self.swap.sell_token == Address::ZERO || self.swap.buy_token == Address::ZERO {
			return Err(ConfigError::Validation(
				"swap.sell_token and swap.buy_token must be non-zero addresses".into(),
			));
		}
		if self.swap.sell_token == self.swap.buy_token {
			return Err(ConfigError::Validation(
				"swap.sell_token and swap.buy_token must differ".into(),
			));
		}
		validate_decimal_amount(&self.swap.sell_amount)?;
		if self.swap.affiliate_fee_bps > MAX_BASIS_POINTS {
			return Err(ConfigError::Validation(format!(
				"swap.affiliate_fee_bps cannot exceed {}",
				MAX_BASIS_POINTS
			)));
		}

		// Aggregator
		validate_http_url("aggregator.base_url", &self.aggregator.base_url)?;
		if self.aggregator.api_key.is_blank() {
			return Err(ConfigError::Validation(
				"aggregator.api_key cannot be empty".into(),
			));
		}
		if self.aggregator.api_version.trim().is_empty() {
			return Err(ConfigError::Validation(
				"aggregator.api_version cannot be empty".into(),
			));
		}
		if self.aggregator.timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"aggregator.timeout_seconds must be greater than 0".into(),
			));
		}

		// Network
		validate_http_url("network.rpc_url", &self.network.rpc_url)?;
		if self.network.approval_timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"network.approval_timeout_seconds must be greater than 0".into(),
			));
		}
		if self.network.receipt_poll_interval_seconds == 0 {
			return Err(ConfigError::Validation(
				"network.receipt_poll_interval_seconds must be greater than 0".into(),
			));
		}
		if self.network.receipt_poll_interval_seconds > self.network.approval_timeout_seconds {
			return Err(ConfigError::Validation(
				"network.receipt_poll_interval_seconds cannot exceed approval_timeout_seconds"
					.into(),
			));
		}

		// Account
		if self.account.private_key.is_blank() {
			return Err(ConfigError::Validation(
				"account.private_key cannot be empty".into(),
			));
		}

		Ok(())
	}
}

fn validate_http_url(field: &str, url: &str) -> Result<(), ConfigError> {
	let url = url.trim();
	if url.is_empty() {
		return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
	}
	if !(url.starts_with("http://") || url.starts_with("https://")) {
		return Err(ConfigError::Validation(format!(
			"{} must be an http(s) URL, got '{}'",
			field, url
		)));
	}
	Ok(())
}

/// Accepts plain positive decimals such as "1", "0.1" or "250.75".
fn validate_decimal_amount(amount: &str) -> Result<(), ConfigError> {
	let amount = amount.trim();
	let (integer, fraction) = amount.split_once('.').unwrap_or((amount, ""));
	let well_formed = !(integer.is_empty() && fraction.is_empty())
		&& integer.chars().all(|c| c.is_ascii_digit())
		&& fraction.chars().all(|c| c.is_ascii_digit());
	if !well_formed {
		return Err(ConfigError::Validation(format!(
			"swap.sell_amount '{}' is not a decimal number",
			amount
		)));
	}
	if integer.chars().chain(fraction.chars()).all(|c| c == '0') {
		return Err(ConfigError::Validation(
			"swap.sell_amount must be greater than zero".into(),
		));
	}
	Ok(())
}

/// Parses configuration from a TOML string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
