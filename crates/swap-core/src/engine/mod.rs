//! Swap engine orchestrating one run of the pipeline.
//!
//! The engine owns every collaborator for the lifetime of a run and drives
//! the stages in order. It returns a [`SwapReport`] describing what was
//! quoted and what was sent.

use crate::stages::allowance::{AllowanceManager, AllowanceOutcome};
use crate::stages::permit::PermitSigner;
use crate::stages::submit::Submitter;
use crate::PipelineError;
use std::sync::Arc;
use std::time::Duration;
use swap_account::AccountService;
use swap_config::Config;
use swap_delivery::DeliveryService;
use swap_quote::QuoteService;
use swap_types::{to_base_units, PriceResult, Quote, TradeRequest, TransactionHash};
use tracing::instrument;

/// Per-run overrides of the configured behaviour.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
	/// Replaces `swap.sell_amount`.
	pub sell_amount: Option<String>,
	/// Stop after the quote: no allowance, no signing, no broadcast.
	pub dry_run: bool,
}

/// Everything a run learned and did.
#[derive(Debug)]
pub struct SwapReport {
	/// The request sent to both aggregator endpoints.
	pub request: TradeRequest,
	/// Decimals of the sell token.
	pub sell_decimals: u8,
	/// Decimals of the buy token, if they could be read.
	pub buy_decimals: Option<u8>,
	/// Liquidity sources on the chain; empty if the listing failed.
	pub sources: Vec<String>,
	/// The advisory price.
	pub price: PriceResult,
	/// The binding quote.
	pub quote: Quote,
	/// Allowance stage result; `None` on a dry run.
	pub allowance: Option<AllowanceOutcome>,
	/// Hash of the broadcast swap, if one was sent.
	pub tx_hash: Option<TransactionHash>,
	/// Whether the run stopped after quoting.
	pub dry_run: bool,
}

/// Main swap engine.
pub struct SwapEngine {
	/// Run configuration.
	config: Config,
	/// Trader account.
	account: Arc<AccountService>,
	/// Chain access.
	delivery: Arc<DeliveryService>,
	/// Aggregator access.
	quotes: QuoteService,
}

impl SwapEngine {
	/// Creates a new engine from already constructed services.
	pub fn new(
		config: Config,
		account: Arc<AccountService>,
		delivery: Arc<DeliveryService>,
		quotes: QuoteService,
	) -> Self {
		Self {
			config,
			account,
			delivery,
			quotes,
		}
	}

	/// Executes the swap.
	///
	/// This method:
	/// 1. Resolves the taker and scales the sell amount by the token's decimals
	/// 2. Fetches the price, then the quote, with the same request
	/// 3. Grants the allowance the quote asks for
	/// 4. Signs the permit and broadcasts the swap
	#[instrument(skip_all, fields(chain_id = self.config.swap.chain_id))]
	pub async fn run(&self, options: RunOptions) -> Result<SwapReport, PipelineError> {
		let swap = &self.config.swap;
		let taker = self.account.get_address().await?;
		self.delivery.verify_chain().await?;
		tracing::info!(taker = %taker, "Starting swap");

		let sources = match self.quotes.fetch_sources(swap.chain_id).await {
			Ok(sources) => sources,
			Err(e) => {
				tracing::warn!(error = %e, "Could not list liquidity sources");
				Vec::new()
			},
		};

		let sell_decimals = self.delivery.token_decimals(swap.sell_token).await?;
		let buy_decimals = match self.delivery.token_decimals(swap.buy_token).await {
			Ok(decimals) => Some(decimals),
			Err(e) => {
				tracing::warn!(token = %swap.buy_token, error = %e, "Could not read buy token decimals");
				None
			},
		};

		let amount = options.sell_amount.as_deref().unwrap_or(&swap.sell_amount);
		let sell_amount = to_base_units(amount, sell_decimals)
			.map_err(|e| PipelineError::Config(e.to_string()))?;

		let request = TradeRequest {
			chain_id: swap.chain_id,
			sell_token: swap.sell_token,
			buy_token: swap.buy_token,
			sell_amount,
			taker,
			affiliate_fee_bps: swap.affiliate_fee_bps,
			surplus_collection: swap.surplus_collection,
		};

		let price = self.quotes.fetch_price(&request).await?;
		if let Some(balance) = price.balance_issue() {
			tracing::warn!(
				token = %balance.token,
				actual = ?balance.actual,
				expected = ?balance.expected,
				"Taker balance is below the sell amount"
			);
		}
		if let Some(allowance) = price.allowance_issue() {
			tracing::info!(spender = %allowance.spender, "Price check reports an allowance is needed");
		}

		let quote = self.quotes.fetch_quote(&request).await?;

		let mut report = SwapReport {
			request,
			sell_decimals,
			buy_decimals,
			sources,
			price,
			quote,
			allowance: None,
			tx_hash: None,
			dry_run: options.dry_run,
		};

		if options.dry_run {
			tracing::info!("Dry run, stopping after quote");
			return Ok(report);
		}

		let network = &self.config.network;
		let allowance = AllowanceManager::new(
			self.delivery.clone(),
			taker,
			Duration::from_secs(network.approval_timeout_seconds),
			Duration::from_secs(network.receipt_poll_interval_seconds),
		);
		report.allowance = Some(
			allowance
				.ensure_allowance(swap.sell_token, report.quote.allowance_issue())
				.await?,
		);

		let (Some(eip712), Some(_)) = (report.quote.permit_eip712(), report.quote.call_data())
		else {
			tracing::warn!("Quote carries no permit payload or call data, nothing to sign");
			return Ok(report);
		};

		let permit = PermitSigner::new(self.account.clone())
			.sign_permit(eip712)
			.await?;

		report.tx_hash = Submitter::new(self.delivery.clone(), taker)
			.submit(&report.quote, Some(permit))
			.await?;

		if let Some(tx_hash) = &report.tx_hash {
			tracing::info!(tx_hash = %tx_hash, "Swap submitted");
		}
		Ok(report)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::{
		full_quote, AccountCalls, ChainCalls, MockAccount, MockAggregator, MockChain, CHAIN_ID,
	};
	use alloy_consensus::{TxEnvelope, TxLegacy};
	use alloy_eips::eip2718::Decodable2718;
	use std::sync::Mutex;
	use swap_config::builders::ConfigBuilder;
	use swap_delivery::DeliveryError;
	use swap_types::{Address, Bytes, U256};

	fn decode_legacy(raw: &Bytes) -> TxLegacy {
		match TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap() {
			TxEnvelope::Legacy(signed) => signed.tx().clone(),
			other => panic!("expected a legacy transaction, got {:?}", other.tx_type()),
		}
	}

	fn price_json() -> serde_json::Value {
		serde_json::json!({
			"liquidityAvailable": true,
			"buyAmount": "100037537",
			"issues": {
				"allowance": {
					"actual": "0",
					"spender": "0x000000000022d473030f116ddee9f6b43ac78ba3"
				},
				"balance": {
					"token": "0x1111111111111111111111111111111111111111",
					"actual": "0",
					"expected": "100000000000000000"
				}
			}
		})
	}

	struct Harness {
		engine: SwapEngine,
		account_calls: Arc<Mutex<AccountCalls>>,
		chain_calls: Arc<Mutex<ChainCalls>>,
		requests: Arc<Mutex<Vec<(&'static str, TradeRequest)>>>,
	}

	fn harness(chain: MockChain, quote: serde_json::Value) -> Harness {
		let config = ConfigBuilder::new()
			.tokens(Address::repeat_byte(0x11), Address::repeat_byte(0x22))
			.build();

		let account = MockAccount::new();
		let account_calls = account.calls.clone();
		let account = Arc::new(AccountService::new(Box::new(account)));

		let chain_calls = chain.calls.clone();
		let delivery = Arc::new(DeliveryService::new(Box::new(chain), account.clone(), CHAIN_ID));

		let aggregator = MockAggregator::new(price_json(), quote);
		let requests = aggregator.requests.clone();

		Harness {
			engine: SwapEngine::new(config, account, delivery, QuoteService::new(Box::new(aggregator))),
			account_calls,
			chain_calls,
			requests,
		}
	}

	#[tokio::test]
	async fn test_full_run_approves_signs_and_submits() {
		let h = harness(MockChain::new(), full_quote());

		let report = h.engine.run(RunOptions::default()).await.unwrap();

		assert_eq!(report.request.sell_amount, U256::from(100_000_000_000_000_000u128));
		assert_eq!(report.sources, vec!["Uniswap_V3", "Aerodrome"]);
		assert!(matches!(report.allowance, Some(AllowanceOutcome::Granted { .. })));
		assert!(report.tx_hash.is_some());

		// approval + swap
		assert_eq!(h.chain_calls.lock().unwrap().raw.len(), 2);
		assert_eq!(h.account_calls.lock().unwrap().typed_data, 1);
		assert_eq!(h.account_calls.lock().unwrap().transactions, 2);
	}

	#[tokio::test]
	async fn test_swap_nonce_read_after_approval() {
		let h = harness(MockChain::new(), full_quote());
		h.engine.run(RunOptions::default()).await.unwrap();

		let calls = h.chain_calls.lock().unwrap();
		let approval = decode_legacy(&calls.raw[0]);
		let swap = decode_legacy(&calls.raw[1]);

		assert_eq!(approval.nonce, 0);
		assert_eq!(swap.nonce, 1);
		assert_eq!(approval.chain_id, Some(CHAIN_ID));
		assert_eq!(swap.chain_id, Some(CHAIN_ID));
		assert_eq!(swap.gas_limit, 288_079);
		assert_eq!(swap.gas_price, 4_837_860_000);
	}

	#[tokio::test]
	async fn test_price_and_quote_share_request() {
		let h = harness(MockChain::new(), full_quote());
		h.engine.run(RunOptions::default()).await.unwrap();

		let requests = h.requests.lock().unwrap();
		assert_eq!(requests.len(), 2);
		assert_eq!(requests[0].0, "price");
		assert_eq!(requests[1].0, "quote");
		assert_eq!(requests[0].1, requests[1].1);
		assert_eq!(requests[0].1.query_pairs(), requests[1].1.query_pairs());
	}

	#[tokio::test]
	async fn test_no_allowance_issue_skips_approval() {
		let mut quote = full_quote();
		quote["issues"]["allowance"] = serde_json::Value::Null;
		let h = harness(MockChain::new(), quote);

		let report = h.engine.run(RunOptions::default()).await.unwrap();
		assert_eq!(report.allowance, Some(AllowanceOutcome::AlreadySufficient));

		let calls = h.chain_calls.lock().unwrap();
		// only the swap was broadcast and no receipt was awaited
		assert_eq!(calls.raw.len(), 1);
		assert_eq!(calls.receipt_polls, 0);
	}

	#[tokio::test]
	async fn test_no_permit_neither_signs_nor_broadcasts_swap() {
		let mut quote = full_quote();
		quote["permit2"] = serde_json::Value::Null;
		quote["issues"]["allowance"] = serde_json::Value::Null;
		let h = harness(MockChain::new(), quote);

		let report = h.engine.run(RunOptions::default()).await.unwrap();
		assert!(report.tx_hash.is_none());
		assert_eq!(h.account_calls.lock().unwrap().typed_data, 0);
		assert_eq!(h.account_calls.lock().unwrap().transactions, 0);
		assert!(h.chain_calls.lock().unwrap().raw.is_empty());
	}

	#[tokio::test]
	async fn test_dry_run_only_reads() {
		let h = harness(MockChain::new(), full_quote());

		let report = h
			.engine
			.run(RunOptions {
				sell_amount: Some("2.5".into()),
				dry_run: true,
			})
			.await
			.unwrap();

		assert!(report.dry_run);
		assert!(report.allowance.is_none());
		assert_eq!(
			report.request.sell_amount,
			U256::from(2_500_000_000_000_000_000u128)
		);
		assert!(h.chain_calls.lock().unwrap().raw.is_empty());
		assert_eq!(h.account_calls.lock().unwrap().typed_data, 0);
		assert_eq!(h.account_calls.lock().unwrap().transactions, 0);
	}

	#[tokio::test]
	async fn test_sell_amount_scaled_by_token_decimals() {
		let mut chain = MockChain::new();
		chain.decimals = 6;
		let h = harness(chain, full_quote());

		let report = h
			.engine
			.run(RunOptions {
				sell_amount: Some("1.5".into()),
				dry_run: true,
			})
			.await
			.unwrap();
		assert_eq!(report.sell_decimals, 6);
		assert_eq!(report.request.sell_amount, U256::from(1_500_000u64));
	}

	#[tokio::test]
	async fn test_failed_approval_stops_before_signing() {
		let mut chain = MockChain::new();
		chain.receipt_success = false;
		let h = harness(chain, full_quote());

		let err = h.engine.run(RunOptions::default()).await.unwrap_err();
		assert!(matches!(err, PipelineError::Allowance(_)));
		assert_eq!(h.account_calls.lock().unwrap().typed_data, 0);
		assert_eq!(h.chain_calls.lock().unwrap().raw.len(), 1);
	}

	#[tokio::test]
	async fn test_zero_sell_amount_is_config_error() {
		let h = harness(MockChain::new(), full_quote());
		let err = h
			.engine
			.run(RunOptions {
				sell_amount: Some("0".into()),
				dry_run: true,
			})
			.await
			.unwrap_err();
		assert!(matches!(err, PipelineError::Config(_)));
		assert!(h.requests.lock().unwrap().is_empty());
	}

	#[test]
	fn test_pipeline_error_wraps_chain_error() {
		let err: PipelineError = DeliveryError::Network("down".into()).into();
		assert_eq!(err.to_string(), "Chain error: Network error: down");
	}
}
