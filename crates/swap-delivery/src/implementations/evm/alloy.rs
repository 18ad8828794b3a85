//! Alloy-backed chain client.
//!
//! Implements [`DeliveryInterface`] over JSON-RPC HTTP. Transactions arrive
//! already signed, so the provider carries no wallet.

use crate::{DeliveryError, DeliveryInterface};
use alloy_primitives::Address;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_transport_http::Http;
use async_trait::async_trait;
use std::sync::Arc;
use swap_types::{Bytes, Transaction, TransactionHash, TransactionReceipt};

/// Alloy-based EVM delivery implementation bound to one network.
pub struct AlloyDelivery {
	/// Alloy provider for the network.
	provider: Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
}

impl AlloyDelivery {
	/// Creates a new AlloyDelivery for the given RPC URL.
	pub fn new(rpc_url: &str) -> Result<Self, DeliveryError> {
		let url = rpc_url
			.parse()
			.map_err(|e| DeliveryError::Network(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;

		let provider = ProviderBuilder::new().on_http(url);

		Ok(Self {
			provider: Arc::new(provider),
		})
	}
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	async fn call(&self, tx: &Transaction) -> Result<Bytes, DeliveryError> {
		let request: TransactionRequest = tx.clone().into();
		self.provider
			.call(&request)
			.await
			.map_err(|e| DeliveryError::TransactionFailed(format!("eth_call failed: {}", e)))
	}

	async fn estimate_gas(&self, tx: &Transaction) -> Result<u64, DeliveryError> {
		let request: TransactionRequest = tx.clone().into();
		self.provider
			.estimate_gas(&request)
			.await
			.map_err(|e| DeliveryError::TransactionFailed(format!("Gas estimation failed: {}", e)))
	}

	async fn get_gas_price(&self) -> Result<u128, DeliveryError> {
		self.provider
			.get_gas_price()
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get gas price: {}", e)))
	}

	async fn get_nonce(&self, address: Address) -> Result<u64, DeliveryError> {
		self.provider
			.get_transaction_count(address)
			.pending()
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get nonce: {}", e)))
	}

	async fn send_raw_transaction(&self, raw: &Bytes) -> Result<TransactionHash, DeliveryError> {
		let pending_tx = self
			.provider
			.send_raw_transaction(raw)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to send transaction: {}", e)))?;

		Ok(TransactionHash(*pending_tx.tx_hash()))
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, DeliveryError> {
		let receipt = self
			.provider
			.get_transaction_receipt(hash.0)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get receipt: {}", e)))?;

		Ok(receipt.map(|receipt| TransactionReceipt {
			hash: TransactionHash(receipt.transaction_hash),
			block_number: receipt.block_number.unwrap_or(0),
			success: receipt.status(),
		}))
	}

	async fn get_chain_id(&self) -> Result<u64, DeliveryError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get chain ID: {}", e)))
	}
}
