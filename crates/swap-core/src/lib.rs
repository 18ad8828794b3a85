//! Core swap pipeline for the permit2 swap executor.
//!
//! A run is strictly sequential:
//! 1. Quote acquisition: price, then quote, from one trade request
//! 2. Allowance: grant the permit contract an allowance if the quote asks for one
//! 3. Permit signature: sign the quote's EIP-712 payload
//! 4. Submission: splice the signature into the call data and broadcast
//!
//! Stage failures abort the run. The only side effect that can survive a
//! failed run is a mined allowance grant.

use swap_account::AccountError;
use swap_delivery::DeliveryError;
use swap_quote::QuoteError;
use thiserror::Error;

pub mod builder;
pub mod engine;
pub mod stages;
#[cfg(test)]
pub(crate) mod test_utils;

pub use builder::{BuilderError, SwapBuilder};
pub use engine::{RunOptions, SwapEngine, SwapReport};
pub use stages::allowance::{AllowanceError, AllowanceManager, AllowanceOutcome};
pub use stages::permit::{encode_signature, PermitSigner, SignedPermit, SigningError};
pub use stages::submit::{SubmissionError, Submitter};

/// Errors that terminate a swap run.
#[derive(Debug, Error)]
pub enum PipelineError {
	/// The run parameters are unusable.
	#[error("Configuration error: {0}")]
	Config(String),
	/// The trader account could not be used.
	#[error("Account error: {0}")]
	Account(#[from] AccountError),
	/// A chain read failed.
	#[error("Chain error: {0}")]
	Chain(#[from] DeliveryError),
	/// The aggregator could not provide a price or quote.
	#[error("Quote acquisition failed: {0}")]
	Quote(#[from] QuoteError),
	/// The allowance could not be granted.
	#[error("Allowance failed: {0}")]
	Allowance(#[from] AllowanceError),
	/// The permit could not be signed.
	#[error("Permit signing failed: {0}")]
	Signing(#[from] SigningError),
	/// The swap transaction could not be assembled or broadcast.
	#[error("Submission failed: {0}")]
	Submission(#[from] SubmissionError),
}
