//! Aggregator response types for the permit2 price and quote endpoints.
//!
//! Every section the aggregator may omit is an `Option`. Absence is meaningful:
//! - no `issues.allowance` means the spender allowance is already sufficient;
//! - no `permit2.eip712` means the signature path does not apply;
//! - no `transaction.data` means there is nothing to submit.
//!
//! Fields that fail to parse are treated the same as missing ones, field by
//! field, so one malformed value never hides its siblings.

use alloy_dyn_abi::TypedData;
use alloy_primitives::{Address, Bytes, U256};
use serde::Deserialize;

use crate::utils::serde_helpers::{flex_bps, flex_u256, lenient, lenient_or_default, lenient_seq};

/// Binding quote returned by `/swap/permit2/quote`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
	#[serde(default, deserialize_with = "lenient")]
	pub liquidity_available: Option<bool>,
	#[serde(default, deserialize_with = "flex_u256")]
	pub buy_amount: Option<U256>,
	#[serde(default, deserialize_with = "flex_u256")]
	pub sell_amount: Option<U256>,
	#[serde(default, deserialize_with = "flex_u256")]
	pub min_buy_amount: Option<U256>,
	#[serde(default, deserialize_with = "lenient")]
	pub issues: Option<Issues>,
	#[serde(default, deserialize_with = "lenient")]
	pub permit2: Option<Permit2Payload>,
	#[serde(default, deserialize_with = "lenient")]
	pub transaction: Option<QuoteTransaction>,
	#[serde(default, deserialize_with = "lenient")]
	pub route: Option<Route>,
	#[serde(default, deserialize_with = "lenient")]
	pub token_metadata: Option<TokenMetadata>,
	#[serde(default, deserialize_with = "flex_bps")]
	pub affiliate_fee_bps: Option<u32>,
	#[serde(default, deserialize_with = "flex_u256")]
	pub trade_surplus: Option<U256>,
}

impl Quote {
	/// The allowance the aggregator asks for, if any.
	pub fn allowance_issue(&self) -> Option<&AllowanceIssue> {
		self.issues.as_ref().and_then(|i| i.allowance.as_ref())
	}

	/// The typed-data consent message, present only on the permit path.
	pub fn permit_eip712(&self) -> Option<&TypedData> {
		self.permit2.as_ref().and_then(|p| p.eip712.as_ref())
	}

	/// The prepared call data, if the aggregator built a transaction.
	pub fn call_data(&self) -> Option<&Bytes> {
		self.transaction.as_ref().and_then(|t| t.data.as_ref())
	}

	/// Liquidity source breakdown in route order.
	pub fn fills(&self) -> &[Fill] {
		self.route.as_ref().map(|r| r.fills.as_slice()).unwrap_or(&[])
	}

	/// Tax metadata for the buy token.
	pub fn buy_token_taxes(&self) -> Option<&TokenTaxes> {
		self.token_metadata.as_ref().and_then(|m| m.buy_token.as_ref())
	}
}

/// Advisory result of `/swap/permit2/price`.
///
/// Shares the quote's shape but carries neither a permit payload nor a
/// transaction; it is never used as execution parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResult {
	#[serde(default, deserialize_with = "lenient")]
	pub liquidity_available: Option<bool>,
	#[serde(default, deserialize_with = "flex_u256")]
	pub buy_amount: Option<U256>,
	#[serde(default, deserialize_with = "flex_u256")]
	pub sell_amount: Option<U256>,
	#[serde(default, deserialize_with = "flex_u256")]
	pub min_buy_amount: Option<U256>,
	#[serde(default, deserialize_with = "lenient")]
	pub issues: Option<Issues>,
	#[serde(default, deserialize_with = "lenient")]
	pub route: Option<Route>,
	#[serde(default, deserialize_with = "lenient")]
	pub token_metadata: Option<TokenMetadata>,
}

impl PriceResult {
	pub fn allowance_issue(&self) -> Option<&AllowanceIssue> {
		self.issues.as_ref().and_then(|i| i.allowance.as_ref())
	}

	pub fn balance_issue(&self) -> Option<&BalanceIssue> {
		self.issues.as_ref().and_then(|i| i.balance.as_ref())
	}
}

/// Problems the aggregator detected for this taker.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issues {
	#[serde(default, deserialize_with = "lenient")]
	pub allowance: Option<AllowanceIssue>,
	#[serde(default, deserialize_with = "lenient")]
	pub balance: Option<BalanceIssue>,
	#[serde(default, deserialize_with = "lenient_or_default")]
	pub simulation_incomplete: bool,
	#[serde(default, deserialize_with = "lenient_seq")]
	pub invalid_sources_passed: Vec<String>,
}

/// Spender that needs an ERC-20 allowance before the trade can settle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceIssue {
	/// Allowance currently granted to the spender.
	#[serde(default, deserialize_with = "flex_u256")]
	pub actual: Option<U256>,
	pub spender: Address,
}

/// Taker balance shortfall on the sell token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceIssue {
	pub token: Address,
	#[serde(default, deserialize_with = "flex_u256")]
	pub actual: Option<U256>,
	#[serde(default, deserialize_with = "flex_u256")]
	pub expected: Option<U256>,
}

/// Permit2 section of a quote.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permit2Payload {
	#[serde(default, deserialize_with = "lenient")]
	pub eip712: Option<TypedData>,
}

/// Transaction prepared by the aggregator, without signature or nonce.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTransaction {
	#[serde(default, deserialize_with = "lenient")]
	pub to: Option<Address>,
	#[serde(default, deserialize_with = "lenient")]
	pub data: Option<Bytes>,
	#[serde(default, deserialize_with = "flex_u256")]
	pub gas: Option<U256>,
	#[serde(default, deserialize_with = "flex_u256")]
	pub gas_price: Option<U256>,
	#[serde(default, deserialize_with = "flex_u256")]
	pub value: Option<U256>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
	#[serde(default, deserialize_with = "lenient_seq")]
	pub fills: Vec<Fill>,
}

/// Share of the trade routed through one liquidity source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
	#[serde(default, deserialize_with = "lenient")]
	pub from: Option<Address>,
	#[serde(default, deserialize_with = "lenient")]
	pub to: Option<Address>,
	pub source: String,
	#[serde(default, deserialize_with = "flex_bps")]
	pub proportion_bps: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
	#[serde(default, deserialize_with = "lenient")]
	pub buy_token: Option<TokenTaxes>,
	#[serde(default, deserialize_with = "lenient")]
	pub sell_token: Option<TokenTaxes>,
}

/// Transfer taxes of a token, in basis points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTaxes {
	#[serde(default, deserialize_with = "flex_bps")]
	pub buy_tax_bps: Option<u32>,
	#[serde(default, deserialize_with = "flex_bps")]
	pub sell_tax_bps: Option<u32>,
}

/// Body of the liquidity sources endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesResponse {
	#[serde(default, deserialize_with = "lenient_seq")]
	pub sources: Vec<SourceEntry>,
}

/// A source entry, either `{"name": ...}` or a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SourceEntry {
	Named { name: String },
	Plain(String),
}

impl SourceEntry {
	pub fn name(&self) -> &str {
		match self {
			SourceEntry::Named { name } => name,
			SourceEntry::Plain(name) => name,
		}
	}
}
