//! Local private-key account.

use crate::{AccountError, AccountInterface};
use alloy_consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy_eips::eip2718::Encodable2718;
use alloy_network::TxSignerSync;
use alloy_primitives::TxKind;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use swap_types::{Address, Bytes, SecretString, Signature, Transaction, TypedData};

/// Account backed by an in-memory secp256k1 private key.
#[derive(Debug)]
pub struct LocalAccount {
	signer: PrivateKeySigner,
}

impl LocalAccount {
	/// Creates a new local account from a hex-encoded private key.
	///
	/// The key may carry a `0x` prefix.
	pub fn new(private_key_hex: &str) -> Result<Self, AccountError> {
		let signer = private_key_hex
			.trim()
			.parse::<PrivateKeySigner>()
			.map_err(|e| AccountError::InvalidKey(format!("Invalid private key: {}", e)))?;

		Ok(Self { signer })
	}

	/// Creates a new local account from a secret without copying it out.
	pub fn from_secret(private_key: &SecretString) -> Result<Self, AccountError> {
		private_key.with_exposed(Self::new)
	}
}

#[async_trait]
impl AccountInterface for LocalAccount {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature, AccountError> {
		let hash = typed_data
			.eip712_signing_hash()
			.map_err(|e| AccountError::InvalidTypedData(e.to_string()))?;

		let signature = self
			.signer
			.sign_hash(&hash)
			.await
			.map_err(|e| AccountError::SigningFailed(format!("Failed to sign hash: {}", e)))?;

		tracing::debug!(hash = %hash, "Signed EIP-712 message");
		Ok(Signature(signature.as_bytes().to_vec()))
	}

	async fn sign_transaction(&self, tx: &Transaction) -> Result<Bytes, AccountError> {
		let missing = |field: &str| AccountError::IncompleteTransaction(format!("{} not set", field));

		let mut legacy = TxLegacy {
			chain_id: Some(tx.chain_id),
			nonce: tx.nonce.ok_or_else(|| missing("nonce"))?,
			gas_price: tx.gas_price.ok_or_else(|| missing("gas price"))?,
			gas_limit: tx.gas_limit.ok_or_else(|| missing("gas limit"))?,
			to: TxKind::Call(tx.to.ok_or_else(|| missing("recipient"))?),
			value: tx.value,
			input: tx.data.clone(),
		};

		let signature = self
			.signer
			.sign_transaction_sync(&mut legacy)
			.map_err(|e| AccountError::SigningFailed(format!("Failed to sign transaction: {}", e)))?;

		let envelope: TxEnvelope = legacy.into_signed(signature).into();
		Ok(Bytes::from(envelope.encoded_2718()))
	}
}
