//! Trade request parameters shared by the price and quote endpoints.
//!
//! A `TradeRequest` is built once per run and serialized to the same query
//! string for both aggregator calls. The quote is only consistent with the
//! price check when both were derived from identical inputs, so the request is
//! immutable and the query encoding lives in exactly one place.

use alloy_primitives::{Address, U256};

/// Maximum affiliate fee, 100% expressed in basis points.
pub const MAX_BASIS_POINTS: u16 = 10_000;

/// Parameters of a single swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRequest {
	/// Chain the swap settles on.
	pub chain_id: u64,
	/// Token being sold.
	pub sell_token: Address,
	/// Token being bought.
	pub buy_token: Address,
	/// Amount sold, already scaled to the sell token's smallest unit.
	pub sell_amount: U256,
	/// Address that signs, pays and receives.
	pub taker: Address,
	/// Affiliate fee charged on the trade, in basis points.
	pub affiliate_fee_bps: u16,
	/// Whether the aggregator may collect positive slippage.
	pub surplus_collection: bool,
}

impl TradeRequest {
	/// Returns the query parameters sent to the aggregator.
	///
	/// Both `price` and `quote` requests must use this exact list.
	pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
		vec![
			("chainId", self.chain_id.to_string()),
			("sellToken", self.sell_token.to_string()),
			("buyToken", self.buy_token.to_string()),
			("sellAmount", self.sell_amount.to_string()),
			("taker", self.taker.to_string()),
			("affiliateFee", self.affiliate_fee_bps.to_string()),
			("surplusCollection", self.surplus_collection.to_string()),
		]
	}
}
