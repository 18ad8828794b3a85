//! Permit signature stage.
//!
//! The settlement contract reads the permit signature from the tail of the
//! call data: a 32-byte big-endian length word followed by the signature
//! bytes, appended after the aggregator's calldata.

use std::sync::Arc;
use swap_account::{AccountError, AccountService};
use swap_types::{Bytes, Signature, TypedData, U256};
use thiserror::Error;
use tracing::instrument;

/// Length of an `r || s || v` secp256k1 signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Errors that can occur while signing a permit.
#[derive(Debug, Error)]
pub enum SigningError {
	/// The account refused or failed to sign.
	#[error("Account error: {0}")]
	Account(#[from] AccountError),
	/// The account produced a signature of unexpected size.
	#[error("Expected a 65-byte signature, got {0} bytes")]
	InvalidLength(usize),
}

/// Signature over one permit payload.
///
/// Not `Clone`: a permit is spent by the submission that carries it.
#[derive(Debug, PartialEq, Eq)]
pub struct SignedPermit(Signature);

impl SignedPermit {
	pub fn as_bytes(&self) -> &[u8] {
		self.0.as_bytes()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Signs permit payloads with the trader's account.
pub struct PermitSigner {
	account: Arc<AccountService>,
}

impl PermitSigner {
	pub fn new(account: Arc<AccountService>) -> Self {
		Self { account }
	}

	/// Signs the EIP-712 payload exactly as the aggregator issued it.
	#[instrument(skip_all, fields(primary_type = %eip712.primary_type))]
	pub async fn sign_permit(&self, eip712: &TypedData) -> Result<SignedPermit, SigningError> {
		let signature = self.account.sign_typed_data(eip712).await?;
		if signature.len() != SIGNATURE_LENGTH {
			return Err(SigningError::InvalidLength(signature.len()));
		}
		tracing::info!("Permit signed");
		Ok(SignedPermit(signature))
	}
}

/// Appends a length-prefixed signature to call data.
///
/// Layout: `calldata || uint256(len(signature)) || signature`.
pub fn encode_signature(calldata: &[u8], signature: &[u8]) -> Bytes {
	let length = U256::from(signature.len()).to_be_bytes::<32>();

	let mut data = Vec::with_capacity(calldata.len() + length.len() + signature.len());
	data.extend_from_slice(calldata);
	data.extend_from_slice(&length);
	data.extend_from_slice(signature);
	data.into()
}
