//! Transaction types exchanged between the pipeline, the account and the chain client.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rpc_types::TransactionRequest;
use std::fmt;

/// Transaction hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionHash(pub B256);

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: TransactionHash,
	/// The block number where the transaction was included.
	pub block_number: u64,
	/// Whether the transaction executed successfully.
	pub success: bool,
}

/// A legacy (EIP-155) transaction as assembled by the pipeline.
///
/// Fields left as `None` are not yet known; a transaction handed to the
/// account for signing must have `nonce`, `gas_limit` and `gas_price` set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
	pub chain_id: u64,
	pub from: Option<Address>,
	pub to: Option<Address>,
	pub data: Bytes,
	pub value: U256,
	pub nonce: Option<u64>,
	pub gas_limit: Option<u64>,
	pub gas_price: Option<u128>,
}

impl Transaction {
	/// Creates a contract call with no value and no gas parameters.
	pub fn call(chain_id: u64, from: Address, to: Address, data: impl Into<Bytes>) -> Self {
		Self {
			chain_id,
			from: Some(from),
			to: Some(to),
			data: data.into(),
			..Default::default()
		}
	}
}

impl From<Transaction> for TransactionRequest {
	fn from(tx: Transaction) -> Self {
		let mut request = TransactionRequest::default()
			.input(tx.data.into())
			.value(tx.value);
		request.chain_id = Some(tx.chain_id);
		if let Some(from) = tx.from {
			request = request.from(from);
		}
		if let Some(to) = tx.to {
			request = request.to(to);
		}
		if let Some(nonce) = tx.nonce {
			request = request.nonce(nonce);
		}
		if let Some(gas_limit) = tx.gas_limit {
			request = request.gas_limit(gas_limit);
		}
		request.gas_price = tx.gas_price;
		request
	}
}
