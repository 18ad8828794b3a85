//! Allowance stage.
//!
//! The quote names the spender that needs an ERC-20 allowance on the sell
//! token. When it does, an unlimited approval is simulated, signed,
//! broadcast and waited on before the pipeline continues. When it does not,
//! nothing touches the chain.

use std::sync::Arc;
use std::time::Duration;
use swap_delivery::{approve_calldata, DeliveryError, DeliveryService};
use swap_types::{Address, AllowanceIssue, Transaction, TransactionHash, U256};
use thiserror::Error;
use tracing::instrument;

/// Errors that can occur while granting an allowance.
#[derive(Debug, Error)]
pub enum AllowanceError {
	/// The approval would revert.
	#[error("Approval simulation failed: {0}")]
	Simulation(#[source] DeliveryError),
	/// The approval could not be signed or broadcast.
	#[error("Approval broadcast failed: {0}")]
	Broadcast(#[source] DeliveryError),
	/// The approval was not mined in time.
	#[error("Approval confirmation failed: {0}")]
	Confirmation(#[source] DeliveryError),
	/// The approval was mined but reverted.
	#[error("Approval transaction {0} reverted")]
	Reverted(TransactionHash),
}

/// Result of [`AllowanceManager::ensure_allowance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowanceOutcome {
	/// The aggregator reported no allowance shortfall.
	AlreadySufficient,
	/// An approval was mined.
	Granted { tx_hash: TransactionHash },
}

/// Grants spender allowances on behalf of the trader.
pub struct AllowanceManager {
	delivery: Arc<DeliveryService>,
	owner: Address,
	approval_timeout: Duration,
	poll_interval: Duration,
}

impl AllowanceManager {
	pub fn new(
		delivery: Arc<DeliveryService>,
		owner: Address,
		approval_timeout: Duration,
		poll_interval: Duration,
	) -> Self {
		Self {
			delivery,
			owner,
			approval_timeout,
			poll_interval,
		}
	}

	/// Approves `issue.spender` for the maximum amount of `token`.
	///
	/// Does nothing when `issue` is `None`.
	#[instrument(skip_all, fields(token = %token))]
	pub async fn ensure_allowance(
		&self,
		token: Address,
		issue: Option<&AllowanceIssue>,
	) -> Result<AllowanceOutcome, AllowanceError> {
		let Some(issue) = issue else {
			tracing::debug!("No allowance required");
			return Ok(AllowanceOutcome::AlreadySufficient);
		};

		tracing::info!(
			spender = %issue.spender,
			actual = ?issue.actual,
			"Granting unlimited allowance"
		);

		let tx = Transaction::call(
			self.delivery.chain_id(),
			self.owner,
			token,
			approve_calldata(issue.spender, U256::MAX),
		);

		self.delivery
			.simulate(&tx)
			.await
			.map_err(AllowanceError::Simulation)?;

		let tx_hash = self
			.delivery
			.deliver(tx)
			.await
			.map_err(AllowanceError::Broadcast)?;

		let receipt = self
			.delivery
			.wait_for_receipt(&tx_hash, self.approval_timeout, self.poll_interval)
			.await
			.map_err(AllowanceError::Confirmation)?;

		if !receipt.success {
			return Err(AllowanceError::Reverted(tx_hash));
		}

		tracing::info!(tx_hash = %tx_hash, block = receipt.block_number, "Allowance granted");
		Ok(AllowanceOutcome::Granted { tx_hash })
	}
}
