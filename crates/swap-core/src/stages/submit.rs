//! Submission stage.
//!
//! Builds the swap transaction from the quote's prepared transaction and the
//! signed permit, then signs and broadcasts it. The call returns once the
//! transaction is in the mempool; confirmation is not awaited.

use crate::stages::permit::{encode_signature, SignedPermit};
use std::sync::Arc;
use swap_delivery::{DeliveryError, DeliveryService};
use swap_types::{Address, Quote, Transaction, TransactionHash};
use thiserror::Error;
use tracing::instrument;

/// Errors that can occur while assembling or broadcasting the swap.
#[derive(Debug, Error)]
pub enum SubmissionError {
	/// The quote's transaction cannot be turned into a valid transaction.
	#[error("Invalid quote transaction: {0}")]
	InvalidTransaction(String),
	/// Filling, signing or broadcasting failed.
	#[error("Delivery failed: {0}")]
	Delivery(#[from] DeliveryError),
}

/// Assembles and broadcasts the swap transaction.
pub struct Submitter {
	delivery: Arc<DeliveryService>,
	taker: Address,
}

impl Submitter {
	pub fn new(delivery: Arc<DeliveryService>, taker: Address) -> Self {
		Self { delivery, taker }
	}

	/// Builds the swap transaction without a nonce.
	///
	/// Returns `None` when the quote carries no call data. Gas values the
	/// quote leaves out stay unset and are filled from the network at
	/// delivery.
	pub fn assemble(
		&self,
		quote: &Quote,
		permit: &SignedPermit,
	) -> Result<Option<Transaction>, SubmissionError> {
		let Some(prepared) = quote.transaction.as_ref() else {
			return Ok(None);
		};
		let Some(calldata) = prepared.data.as_ref() else {
			return Ok(None);
		};

		let to = prepared.to.ok_or_else(|| {
			SubmissionError::InvalidTransaction("call data present without a recipient".into())
		})?;

		let gas_limit = prepared
			.gas
			.map(u64::try_from)
			.transpose()
			.map_err(|_| SubmissionError::InvalidTransaction("gas does not fit in u64".into()))?;
		let gas_price = prepared
			.gas_price
			.map(u128::try_from)
			.transpose()
			.map_err(|_| {
				SubmissionError::InvalidTransaction("gas price does not fit in u128".into())
			})?;

		Ok(Some(Transaction {
			chain_id: self.delivery.chain_id(),
			from: Some(self.taker),
			to: Some(to),
			data: encode_signature(calldata, permit.as_bytes()),
			value: prepared.value.unwrap_or_default(),
			nonce: None,
			gas_limit,
			gas_price,
		}))
	}

	/// Submits the swap.
	///
	/// Returns `Ok(None)` without signing or broadcasting when there is no
	/// permit or no call data.
	#[instrument(skip_all)]
	pub async fn submit(
		&self,
		quote: &Quote,
		permit: Option<SignedPermit>,
	) -> Result<Option<TransactionHash>, SubmissionError> {
		let Some(permit) = permit else {
			tracing::info!("No permit signature, nothing to submit");
			return Ok(None);
		};
		let Some(tx) = self.assemble(quote, &permit)? else {
			tracing::info!("Quote has no call data, nothing to submit");
			return Ok(None);
		};

		tracing::debug!(
			to = ?tx.to,
			data_len = tx.data.len(),
			gas_limit = ?tx.gas_limit,
			gas_price = ?tx.gas_price,
			"Assembled swap transaction"
		);

		let tx_hash = self.delivery.deliver(tx).await?;
		Ok(Some(tx_hash))
	}
}
