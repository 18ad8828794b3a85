//! String formatting utilities for reports and log lines.

use alloy_primitives::{utils::format_units, U256};

/// Formats a basis-point count as a percentage with two decimals.
///
/// `100` becomes `"1.00%"` and `5000` becomes `"50.00%"`.
pub fn format_bps(bps: u32) -> String {
	format!("{}.{:02}%", bps / 100, bps % 100)
}

/// Formats a raw token amount with the token's decimals for display.
///
/// Trailing fractional zeros are trimmed, so one whole token prints as `"1"`.
pub fn format_token_amount(amount: U256, decimals: u8) -> String {
	let formatted = match format_units(amount, decimals) {
		Ok(s) => s,
		Err(_) => return amount.to_string(),
	};
	match formatted.split_once('.') {
		Some((integer, fraction)) => {
			let fraction = fraction.trim_end_matches('0');
			if fraction.is_empty() {
				integer.to_string()
			} else {
				format!("{}.{}", integer, fraction)
			}
		},
		None => formatted,
	}
}
