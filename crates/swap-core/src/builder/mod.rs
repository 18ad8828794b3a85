//! Builder for constructing swap engines.
//!
//! By default the engine is wired to a local private-key account, an
//! alloy HTTP chain client and the 0x aggregator, all taken from the
//! configuration. The chain client and the aggregator can be replaced
//! before building.

use crate::engine::SwapEngine;
use std::sync::Arc;
use swap_account::implementations::local::LocalAccount;
use swap_account::AccountService;
use swap_config::Config;
use swap_delivery::implementations::evm::alloy::AlloyDelivery;
use swap_delivery::{DeliveryInterface, DeliveryService};
use swap_quote::implementations::zeroex::ZeroExAggregator;
use swap_quote::{AggregatorInterface, QuoteService};
use thiserror::Error;

/// Errors that can occur during swap engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Failed to create {component}: {reason}")]
	Component {
		component: &'static str,
		reason: String,
	},
}

/// Builder for constructing a SwapEngine.
pub struct SwapBuilder {
	config: Config,
	delivery: Option<Box<dyn DeliveryInterface>>,
	aggregator: Option<Box<dyn AggregatorInterface>>,
}

impl SwapBuilder {
	/// Creates a new SwapBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self {
			config,
			delivery: None,
			aggregator: None,
		}
	}

	/// Uses the given chain client instead of the configured RPC endpoint.
	pub fn with_delivery(mut self, delivery: Box<dyn DeliveryInterface>) -> Self {
		self.delivery = Some(delivery);
		self
	}

	/// Uses the given aggregator instead of the configured 0x endpoint.
	pub fn with_aggregator(mut self, aggregator: Box<dyn AggregatorInterface>) -> Self {
		self.aggregator = Some(aggregator);
		self
	}

	/// Builds the SwapEngine.
	pub fn build(self) -> Result<SwapEngine, BuilderError> {
		let local = LocalAccount::from_secret(&self.config.account.private_key)
			.map_err(|e| component_error("account", e))?;
		tracing::info!(component = "account", "Loaded");
		let account = Arc::new(AccountService::new(Box::new(local)));

		let delivery = match self.delivery {
			Some(delivery) => delivery,
			None => Box::new(
				AlloyDelivery::new(&self.config.network.rpc_url)
					.map_err(|e| component_error("delivery", e))?,
			),
		};
		tracing::info!(component = "delivery", chain_id = self.config.swap.chain_id, "Loaded");
		let delivery = Arc::new(DeliveryService::new(
			delivery,
			account.clone(),
			self.config.swap.chain_id,
		));

		let aggregator = match self.aggregator {
			Some(aggregator) => aggregator,
			None => Box::new(
				ZeroExAggregator::from_config(&self.config.aggregator)
					.map_err(|e| component_error("aggregator", e))?,
			),
		};
		tracing::info!(component = "aggregator", base_url = %self.config.aggregator.base_url, "Loaded");
		let quotes = QuoteService::new(aggregator);

		Ok(SwapEngine::new(self.config, account, delivery, quotes))
	}
}

fn component_error(component: &'static str, error: impl std::fmt::Display) -> BuilderError {
	tracing::error!(component, error = %error, "Failed to create component");
	BuilderError::Component {
		component,
		reason: error.to_string(),
	}
}
