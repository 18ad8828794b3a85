//! Configuration builder for creating test and development configurations.
//!
//! Produces a `Config` pointing at local endpoints with well-known test
//! credentials, so pipeline tests can run without a TOML file.

use crate::{AccountConfig, AggregatorConfig, Config, NetworkConfig, SwapConfig};
use swap_types::{Address, SecretString};

/// Private key of the first default anvil/hardhat account.
const TEST_PRIVATE_KEY: &str =
	"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Builder for creating `Config` instances with a fluent API.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	chain_id: u64,
	sell_token: Address,
	buy_token: Address,
	sell_amount: String,
	affiliate_fee_bps: u16,
	surplus_collection: bool,
	aggregator_url: String,
	rpc_url: String,
	explorer_url: Option<String>,
	approval_timeout_seconds: u64,
	receipt_poll_interval_seconds: u64,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with default values suitable for testing.
	pub fn new() -> Self {
		Self {
			chain_id: 8453,
			sell_token: Address::repeat_byte(0x11),
			buy_token: Address::repeat_byte(0x22),
			sell_amount: "0.1".to_string(),
			affiliate_fee_bps: 100,
			surplus_collection: true,
			aggregator_url: "http://127.0.0.1:0".to_string(),
			rpc_url: "http://127.0.0.1:8545".to_string(),
			explorer_url: None,
			approval_timeout_seconds: 1,
			receipt_poll_interval_seconds: 1,
		}
	}

	/// Sets the chain ID.
	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = chain_id;
		self
	}

	/// Sets the sell and buy tokens.
	pub fn tokens(mut self, sell_token: Address, buy_token: Address) -> Self {
		self.sell_token = sell_token;
		self.buy_token = buy_token;
		self
	}

	/// Sets the human-readable sell amount.
	pub fn sell_amount(mut self, amount: impl Into<String>) -> Self {
		self.sell_amount = amount.into();
		self
	}

	/// Sets the affiliate fee in basis points.
	pub fn affiliate_fee_bps(mut self, bps: u16) -> Self {
		self.affiliate_fee_bps = bps;
		self
	}

	/// Sets whether surplus collection is requested.
	pub fn surplus_collection(mut self, enabled: bool) -> Self {
		self.surplus_collection = enabled;
		self
	}

	/// Sets the aggregator base URL.
	pub fn aggregator_url(mut self, url: impl Into<String>) -> Self {
		self.aggregator_url = url.into();
		self
	}

	/// Sets the block explorer base URL.
	pub fn explorer_url(mut self, url: Option<String>) -> Self {
		self.explorer_url = url;
		self
	}

	/// Sets the approval confirmation timeout in seconds.
	pub fn approval_timeout_seconds(mut self, seconds: u64) -> Self {
		self.approval_timeout_seconds = seconds;
		self
	}

	/// Builds the `Config` with the configured values.
	pub fn build(self) -> Config {
		Config {
			swap: SwapConfig {
				chain_id: self.chain_id,
				sell_token: self.sell_token,
				buy_token: self.buy_token,
				sell_amount: self.sell_amount,
				affiliate_fee_bps: self.affiliate_fee_bps,
				surplus_collection: self.surplus_collection,
			},
			aggregator: AggregatorConfig {
				base_url: self.aggregator_url,
				api_key: SecretString::from("test-api-key"),
				api_version: "v2".to_string(),
				timeout_seconds: 5,
			},
			network: NetworkConfig {
				rpc_url: self.rpc_url,
				explorer_url: self.explorer_url,
				approval_timeout_seconds: self.approval_timeout_seconds,
				receipt_poll_interval_seconds: self.receipt_poll_interval_seconds,
			},
			account: AccountConfig {
				private_key: SecretString::from(TEST_PRIVATE_KEY),
			},
		}
	}
}
