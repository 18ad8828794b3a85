//! Quote acquisition for the swap executor.
//!
//! The aggregator is asked twice for the same trade: an advisory *price*
//! request, then the binding *quote* that carries the permit payload and the
//! prepared transaction. Both requests are derived from one
//! [`TradeRequest`] so their parameters cannot drift apart.

use async_trait::async_trait;
use swap_types::{PriceResult, Quote, TradeRequest};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod zeroex;
}

/// Errors that can occur while talking to the aggregator.
#[derive(Debug, Error)]
pub enum QuoteError {
	/// The aggregator could not be reached or answered with a non-success status.
	#[error("Aggregator unavailable{}: {message}", status_suffix(.status))]
	Unavailable {
		/// HTTP status, absent when no response was received.
		status: Option<u16>,
		/// Transport error or response body text.
		message: String,
	},
	/// The aggregator answered with a body that is not the expected JSON.
	#[error("Invalid aggregator response: {0}")]
	InvalidResponse(String),
	/// The client could not be constructed from its configuration.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

fn status_suffix(status: &Option<u16>) -> String {
	status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

/// Trait defining the interface for liquidity aggregators.
#[async_trait]
pub trait AggregatorInterface: Send + Sync {
	/// Lists the liquidity sources the aggregator routes through on a chain.
	async fn sources(&self, chain_id: u64) -> Result<Vec<String>, QuoteError>;

	/// Requests an indicative price for a trade.
	async fn price(&self, request: &TradeRequest) -> Result<PriceResult, QuoteError>;

	/// Requests a firm quote for a trade.
	async fn quote(&self, request: &TradeRequest) -> Result<Quote, QuoteError>;
}

/// Service that manages quote acquisition.
pub struct QuoteService {
	/// The underlying aggregator implementation.
	implementation: Box<dyn AggregatorInterface>,
}

impl QuoteService {
	/// Creates a new QuoteService with the specified implementation.
	pub fn new(implementation: Box<dyn AggregatorInterface>) -> Self {
		Self { implementation }
	}

	/// Fetches the liquidity sources available on a chain.
	pub async fn fetch_sources(&self, chain_id: u64) -> Result<Vec<String>, QuoteError> {
		let sources = self.implementation.sources(chain_id).await?;
		tracing::debug!(chain_id, count = sources.len(), "Fetched liquidity sources");
		Ok(sources)
	}

	/// Fetches the advisory price for a trade.
	#[tracing::instrument(skip_all, fields(sell_amount = %request.sell_amount))]
	pub async fn fetch_price(&self, request: &TradeRequest) -> Result<PriceResult, QuoteError> {
		let price = self.implementation.price(request).await?;
		if price.liquidity_available == Some(false) {
			tracing::warn!("Aggregator reports no liquidity for this pair");
		}
		tracing::info!(buy_amount = ?price.buy_amount, "Received price");
		Ok(price)
	}

	/// Fetches the binding quote for a trade.
	#[tracing::instrument(skip_all, fields(sell_amount = %request.sell_amount))]
	pub async fn fetch_quote(&self, request: &TradeRequest) -> Result<Quote, QuoteError> {
		let quote = self.implementation.quote(request).await?;
		tracing::info!(
			buy_amount = ?quote.buy_amount,
			has_permit = quote.permit_eip712().is_some(),
			has_transaction = quote.call_data().is_some(),
			"Received quote"
		);
		Ok(quote)
	}
}
