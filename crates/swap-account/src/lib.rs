//! Account management for the swap executor.
//!
//! The trader's account signs two kinds of payload: the aggregator's
//! EIP-712 permit message and the raw transactions the executor broadcasts
//! (the token approval and the swap itself). This module defines the
//! interface for those operations and a service wrapping an implementation.

use async_trait::async_trait;
use swap_types::{Address, Bytes, Signature, Transaction, TypedData};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs when typed data cannot be hashed.
	#[error("Invalid typed data: {0}")]
	InvalidTypedData(String),
	/// Error that occurs when a transaction is missing fields required for signing.
	#[error("Incomplete transaction: {0}")]
	IncompleteTransaction(String),
}

/// Trait defining the interface for account implementations.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Retrieves the address associated with this account.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Signs an EIP-712 typed-data message.
	///
	/// The returned signature is the 65-byte `r || s || v` encoding over the
	/// message's EIP-712 signing hash.
	async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature, AccountError>;

	/// Signs a transaction and returns its raw EIP-2718 encoding, ready for
	/// `eth_sendRawTransaction`.
	///
	/// The transaction must carry a nonce, gas limit, gas price and recipient.
	async fn sign_transaction(&self, tx: &Transaction) -> Result<Bytes, AccountError>;
}

/// Service that manages account operations.
///
/// Wraps an underlying account implementation.
pub struct AccountService {
	/// The underlying account implementation.
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	/// Creates a new AccountService with the specified implementation.
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Retrieves the address associated with the managed account.
	pub async fn get_address(&self) -> Result<Address, AccountError> {
		self.implementation.address().await
	}

	/// Signs an EIP-712 message using the managed account.
	pub async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature, AccountError> {
		self.implementation.sign_typed_data(typed_data).await
	}

	/// Signs a transaction using the managed account.
	pub async fn sign(&self, tx: &Transaction) -> Result<Bytes, AccountError> {
		self.implementation.sign_transaction(tx).await
	}
}
