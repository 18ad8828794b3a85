//! 0x Swap API client.
//!
//! Talks to the permit2 flavour of the 0x API:
//! - `GET /swap/v1/sources` lists liquidity sources
//! - `GET /swap/permit2/price` returns an indicative price
//! - `GET /swap/permit2/quote` returns a firm quote with permit payload
//!
//! Every request carries the API key and version headers. There is no retry
//! policy; a failed call fails the run.

use crate::{AggregatorInterface, QuoteError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::time::Duration;
use swap_config::AggregatorConfig;
use swap_types::{PriceResult, Quote, SecretString, SourcesResponse, TradeRequest};

const SOURCES_PATH: &str = "/swap/v1/sources";
const PRICE_PATH: &str = "/swap/permit2/price";
const QUOTE_PATH: &str = "/swap/permit2/quote";

/// HTTP client for the 0x aggregator.
pub struct ZeroExAggregator {
	client: reqwest::Client,
	base_url: String,
}

impl ZeroExAggregator {
	/// Creates a client with the authentication headers preset.
	pub fn new(
		base_url: &str,
		api_key: &SecretString,
		api_version: &str,
		timeout: Duration,
	) -> Result<Self, QuoteError> {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

		let mut key = api_key
			.with_exposed(HeaderValue::from_str)
			.map_err(|_| QuoteError::Configuration("API key is not a valid header value".into()))?;
		key.set_sensitive(true);
		headers.insert("0x-api-key", key);

		let version = HeaderValue::from_str(api_version).map_err(|_| {
			QuoteError::Configuration(format!("Invalid API version '{}'", api_version))
		})?;
		headers.insert("0x-version", version);

		let client = reqwest::Client::builder()
			.default_headers(headers)
			.timeout(timeout)
			.build()
			.map_err(|e| QuoteError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
		})
	}

	/// Creates a client from the `[aggregator]` configuration section.
	pub fn from_config(config: &AggregatorConfig) -> Result<Self, QuoteError> {
		Self::new(
			&config.base_url,
			&config.api_key,
			&config.api_version,
			Duration::from_secs(config.timeout_seconds),
		)
	}

	async fn get<T: DeserializeOwned>(
		&self,
		path: &str,
		query: &[(&'static str, String)],
	) -> Result<T, QuoteError> {
		let url = format!("{}{}", self.base_url, path);
		tracing::debug!(%url, "Aggregator request");

		let response = self
			.client
			.get(&url)
			.query(query)
			.send()
			.await
			.map_err(|e| QuoteError::Unavailable {
				status: e.status().map(|s| s.as_u16()),
				message: e.to_string(),
			})?;

		let status = response.status();
		let body = response.text().await.map_err(|e| QuoteError::Unavailable {
			status: Some(status.as_u16()),
			message: format!("Failed to read response body: {}", e),
		})?;

		if !status.is_success() {
			return Err(QuoteError::Unavailable {
				status: Some(status.as_u16()),
				message: body,
			});
		}

		serde_json::from_str(&body).map_err(|e| QuoteError::InvalidResponse(e.to_string()))
	}
}

#[async_trait]
impl AggregatorInterface for ZeroExAggregator {
	async fn sources(&self, chain_id: u64) -> Result<Vec<String>, QuoteError> {
		let response: SourcesResponse = self
			.get(SOURCES_PATH, &[("chainId", chain_id.to_string())])
			.await?;
		Ok(response
			.sources
			.iter()
			.map(|source| source.name().to_string())
			.collect())
	}

	async fn price(&self, request: &TradeRequest) -> Result<PriceResult, QuoteError> {
		self.get(PRICE_PATH, &request.query_pairs()).await
	}

	async fn quote(&self, request: &TradeRequest) -> Result<Quote, QuoteError> {
		self.get(QUOTE_PATH, &request.query_pairs()).await
	}
}
