//! Transaction delivery for the swap executor.
//!
//! This module talks to the chain: read-only calls, gas and nonce lookups,
//! raw transaction broadcast and receipt polling. The [`DeliveryService`]
//! layers the executor's needs on top of a [`DeliveryInterface`]
//! implementation: filling unset gas fields, signing through the account
//! service, ERC-20 decimals reads and bounded confirmation waits.

use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use swap_account::AccountService;
use swap_types::{Address, Bytes, Transaction, TransactionHash, TransactionReceipt, U256};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

sol! {
	interface IERC20 {
		function approve(address spender, uint256 amount) external returns (bool);
		function decimals() external view returns (uint8);
	}
}

/// Errors that can occur during transaction delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when a call or transaction execution fails.
	#[error("Transaction failed: {0}")]
	TransactionFailed(String),
	/// Error that occurs when a contract return value cannot be decoded.
	#[error("Decode error: {0}")]
	Decode(String),
	/// Error that occurs when signing a transaction fails.
	#[error("Signing error: {0}")]
	Signing(String),
	/// Error that occurs when a transaction is not mined in time.
	#[error("Timed out after {seconds}s waiting for transaction {hash}")]
	Timeout { hash: TransactionHash, seconds: u64 },
}

/// Trait defining the interface for chain clients.
///
/// Implementations are bound to a single network.
#[async_trait]
pub trait DeliveryInterface: Send + Sync {
	/// Executes a read-only call and returns the raw return data.
	///
	/// A revert surfaces as an error.
	async fn call(&self, tx: &Transaction) -> Result<Bytes, DeliveryError>;

	/// Estimates the gas a transaction would consume.
	async fn estimate_gas(&self, tx: &Transaction) -> Result<u64, DeliveryError>;

	/// Gets the current gas price in wei.
	async fn get_gas_price(&self) -> Result<u128, DeliveryError>;

	/// Gets the next nonce for an address, counting pending transactions.
	async fn get_nonce(&self, address: Address) -> Result<u64, DeliveryError>;

	/// Broadcasts a signed raw transaction.
	async fn send_raw_transaction(&self, raw: &Bytes) -> Result<TransactionHash, DeliveryError>;

	/// Retrieves the receipt for a transaction, `None` while it is pending.
	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, DeliveryError>;

	/// Gets the chain ID reported by the node.
	async fn get_chain_id(&self) -> Result<u64, DeliveryError>;
}

/// Builds `approve(spender, amount)` calldata.
pub fn approve_calldata(spender: Address, amount: U256) -> Bytes {
	IERC20::approveCall { spender, amount }.abi_encode().into()
}

/// Service that manages transaction delivery on the swap's network.
pub struct DeliveryService {
	/// The chain client.
	provider: Box<dyn DeliveryInterface>,
	/// Account service for signing transactions.
	account: Arc<AccountService>,
	/// Chain ID stamped on every transaction.
	chain_id: u64,
}

impl DeliveryService {
	/// Creates a new DeliveryService for the given chain.
	pub fn new(
		provider: Box<dyn DeliveryInterface>,
		account: Arc<AccountService>,
		chain_id: u64,
	) -> Self {
		Self {
			provider,
			account,
			chain_id,
		}
	}

	/// Returns the chain ID this service delivers to.
	pub fn chain_id(&self) -> u64 {
		self.chain_id
	}

	/// Checks the node serves the configured chain.
	pub async fn verify_chain(&self) -> Result<(), DeliveryError> {
		let remote = self.provider.get_chain_id().await?;
		if remote != self.chain_id {
			return Err(DeliveryError::Network(format!(
				"RPC endpoint serves chain {} but chain {} is configured",
				remote, self.chain_id
			)));
		}
		Ok(())
	}

	/// Simulates a transaction with `eth_call`.
	///
	/// Returns an error if the call would revert.
	pub async fn simulate(&self, tx: &Transaction) -> Result<Bytes, DeliveryError> {
		self.provider.call(tx).await
	}

	/// Signs and broadcasts a transaction.
	///
	/// This method:
	/// 1. Fills the nonce from the network if unset
	/// 2. Estimates the gas limit and fetches the gas price if unset
	/// 3. Signs the transaction using the account service
	/// 4. Submits the raw transaction through the provider
	pub async fn deliver(&self, mut tx: Transaction) -> Result<TransactionHash, DeliveryError> {
		tx.chain_id = self.chain_id;
		let from = match tx.from {
			Some(from) => from,
			None => {
				let address = self
					.account
					.get_address()
					.await
					.map_err(|e| DeliveryError::Signing(e.to_string()))?;
				tx.from = Some(address);
				address
			},
		};

		if tx.nonce.is_none() {
			tx.nonce = Some(self.provider.get_nonce(from).await?);
		}
		if tx.gas_limit.is_none() {
			tx.gas_limit = Some(self.provider.estimate_gas(&tx).await?);
		}
		if tx.gas_price.is_none() {
			tx.gas_price = Some(self.provider.get_gas_price().await?);
		}

		let raw = self
			.account
			.sign(&tx)
			.await
			.map_err(|e| DeliveryError::Signing(e.to_string()))?;

		let hash = self.provider.send_raw_transaction(&raw).await?;
		tracing::info!(
			tx_hash = %hash,
			chain_id = self.chain_id,
			nonce = ?tx.nonce,
			gas_limit = ?tx.gas_limit,
			"Submitted transaction"
		);
		Ok(hash)
	}

	/// Polls for a receipt until the transaction is mined or `timeout` elapses.
	///
	/// Transient receipt lookup failures are logged and retried until the
	/// deadline.
	pub async fn wait_for_receipt(
		&self,
		hash: &TransactionHash,
		timeout: Duration,
		poll_interval: Duration,
	) -> Result<TransactionReceipt, DeliveryError> {
		let start_time = tokio::time::Instant::now();
		tracing::info!(tx_hash = %hash, timeout_secs = timeout.as_secs(), "Waiting for receipt");

		loop {
			match self.provider.get_receipt(hash).await {
				Ok(Some(receipt)) => return Ok(receipt),
				Ok(None) => {},
				Err(e) => tracing::debug!(tx_hash = %hash, error = %e, "Receipt lookup failed"),
			}

			if start_time.elapsed() + poll_interval > timeout {
				return Err(DeliveryError::Timeout {
					hash: *hash,
					seconds: timeout.as_secs(),
				});
			}
			tokio::time::sleep(poll_interval).await;
		}
	}

	/// Reads an ERC-20 token's decimals.
	pub async fn token_decimals(&self, token: Address) -> Result<u8, DeliveryError> {
		let data = self.read(token, IERC20::decimalsCall {}.abi_encode()).await?;
		let decoded = IERC20::decimalsCall::abi_decode_returns(&data, true)
			.map_err(|e| DeliveryError::Decode(format!("decimals() on {}: {}", token, e)))?;
		Ok(decoded._0)
	}

	async fn read(&self, to: Address, calldata: Vec<u8>) -> Result<Bytes, DeliveryError> {
		let tx = Transaction {
			chain_id: self.chain_id,
			to: Some(to),
			data: calldata.into(),
			..Default::default()
		};
		self.provider.call(&tx).await
	}
}
