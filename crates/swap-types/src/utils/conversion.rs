//! Conversion between human-readable token amounts and on-chain integers.

use alloy_primitives::{utils::parse_units, U256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
	#[error("Invalid amount '{amount}': {reason}")]
	InvalidAmount { amount: String, reason: String },
	#[error("Amount must be greater than zero")]
	ZeroAmount,
}

/// Scales a decimal amount such as `"0.1"` to the token's smallest unit.
///
/// This is the only place a sell amount is scaled; everything downstream
/// carries the integer.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256, ConversionError> {
	let trimmed = amount.trim();
	if trimmed.starts_with('-') {
		return Err(ConversionError::InvalidAmount {
			amount: amount.to_string(),
			reason: "negative amounts are not allowed".to_string(),
		});
	}

	let parsed =
		parse_units(trimmed, decimals).map_err(|e| ConversionError::InvalidAmount {
			amount: amount.to_string(),
			reason: e.to_string(),
		})?;
	let value = parsed.get_absolute();

	if value.is_zero() {
		return Err(ConversionError::ZeroAmount);
	}
	Ok(value)
}
