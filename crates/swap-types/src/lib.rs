//! Common types for the permit2 swap executor.
//!
//! This crate defines the data shared by every stage of the swap pipeline:
//! the trade request, the aggregator's price and quote payloads, the
//! transaction and signature types exchanged with the account and chain
//! client, and the formatting helpers used for reporting.

/// Signature bytes produced by accounts.
pub mod account;
/// Transaction, hash and receipt types.
pub mod delivery;
/// Aggregator price and quote payloads.
pub mod quote;
/// Redacting wrapper for credentials.
pub mod secret_string;
/// Trade request parameters.
pub mod trade;
/// Conversion, formatting and serde helpers.
pub mod utils;

pub use account::Signature;
pub use delivery::{Transaction, TransactionHash, TransactionReceipt};
pub use quote::{
	AllowanceIssue, BalanceIssue, Fill, Issues, Permit2Payload, PriceResult, Quote, QuoteTransaction,
	Route, SourceEntry, SourcesResponse, TokenMetadata, TokenTaxes,
};
pub use secret_string::SecretString;
pub use trade::{TradeRequest, MAX_BASIS_POINTS};
pub use utils::{format_bps, format_token_amount, to_base_units, ConversionError};

pub use alloy_dyn_abi::TypedData;
pub use alloy_primitives::{Address, Bytes, B256, U256};
