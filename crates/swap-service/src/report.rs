//! Human-readable run report.

use std::fmt::Write;
use swap_core::{AllowanceOutcome, SwapReport};
use swap_types::{format_bps, format_token_amount, U256};

/// Renders the outcome of a run for the console.
pub fn render(report: &SwapReport, explorer_url: Option<&str>) -> String {
	let mut out = String::new();
	let quote = &report.quote;
	let request = &report.request;

	let buy_amount = |amount: Option<U256>| match (amount, report.buy_decimals) {
		(Some(amount), Some(decimals)) => format_token_amount(amount, decimals),
		(Some(amount), None) => amount.to_string(),
		(None, _) => "unknown".to_string(),
	};

	let _ = writeln!(
		out,
		"Selling {} of {} for {} on chain {}",
		format_token_amount(request.sell_amount, report.sell_decimals),
		request.sell_token,
		request.buy_token,
		request.chain_id
	);

	if report.sources.is_empty() {
		let _ = writeln!(out, "Liquidity sources: unavailable");
	} else {
		let _ = writeln!(out, "Liquidity sources: {}", report.sources.join(", "));
	}

	let _ = writeln!(out, "Indicative buy amount: {}", buy_amount(report.price.buy_amount));
	let _ = writeln!(out, "Quoted buy amount: {}", buy_amount(quote.buy_amount));
	if let Some(min) = quote.min_buy_amount {
		let _ = writeln!(out, "Minimum buy amount: {}", buy_amount(Some(min)));
	}

	match quote.buy_token_taxes() {
		Some(taxes) => {
			let _ = writeln!(
				out,
				"Buy token taxes: buy {}, sell {}",
				format_bps(taxes.buy_tax_bps.unwrap_or(0)),
				format_bps(taxes.sell_tax_bps.unwrap_or(0))
			);
		},
		_ => {
			let _ = writeln!(out, "Buy token taxes: unknown");
		},
	}

	let fills = quote.fills();
	if !fills.is_empty() {
		let _ = writeln!(out, "Route:");
		for fill in fills {
			let share = fill
				.proportion_bps
				.map(format_bps)
				.unwrap_or_else(|| "?".to_string());
			let _ = writeln!(out, "  {}: {}", fill.source, share);
		}
	}

	match quote.affiliate_fee_bps {
		Some(bps) => {
			let _ = writeln!(out, "Affiliate fee: {}", format_bps(bps));
		},
		None => {
			let _ = writeln!(out, "Affiliate fee: none");
		},
	}

	match quote.trade_surplus {
		Some(surplus) if !surplus.is_zero() => {
			let _ = writeln!(out, "Trade surplus collected: {}", buy_amount(Some(surplus)));
		},
		_ => {
			let _ = writeln!(out, "Trade surplus collected: none");
		},
	}

	if report.dry_run {
		let _ = write!(out, "Dry run: nothing was approved, signed or submitted");
		return out;
	}

	if let Some(AllowanceOutcome::Granted { tx_hash }) = &report.allowance {
		let _ = writeln!(out, "Allowance granted: {}", tx_hash);
	}

	match &report.tx_hash {
		Some(tx_hash) => {
			let _ = write!(out, "Swap transaction: {}", tx_hash);
			if let Some(explorer) = explorer_url {
				let _ = write!(out, "\nView on explorer: {}/tx/{}", explorer.trim_end_matches('/'), tx_hash);
			}
		},
		None => {
			let _ = write!(out, "No swap transaction was submitted");
		},
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use swap_config::builders::ConfigBuilder;
	use swap_types::{Address, PriceResult, Quote, TradeRequest, TransactionHash, B256};

	fn report(dry_run: bool) -> SwapReport {
		let config = ConfigBuilder::new().build();
		let quote: Quote = serde_json::from_value(serde_json::json!({
			"buyAmount": "100037537",
			"affiliateFeeBps": "100",
			"tradeSurplus": "0",
			"route": {
				"fills": [
					{ "source": "Uniswap_V3", "proportionBps": "5000" },
					{ "source": "Aerodrome", "proportionBps": "5000" }
				]
			},
			"tokenMetadata": {
				"buyToken": { "buyTaxBps": "0", "sellTaxBps": "0" }
			}
		}))
		.unwrap();

		SwapReport {
			request: TradeRequest {
				chain_id: config.swap.chain_id,
				sell_token: config.swap.sell_token,
				buy_token: config.swap.buy_token,
				sell_amount: U256::from(100_000_000_000_000_000u128),
				taker: Address::repeat_byte(0x42),
				affiliate_fee_bps: 100,
				surplus_collection: true,
			},
			sell_decimals: 18,
			buy_decimals: Some(6),
			sources: vec!["Uniswap_V3".into(), "Aerodrome".into()],
			price: PriceResult::default(),
			quote,
			allowance: Some(AllowanceOutcome::AlreadySufficient),
			tx_hash: (!dry_run).then(|| TransactionHash(B256::repeat_byte(0xab))),
			dry_run,
		}
	}

	#[test]
	fn test_render_percentages_and_amounts() {
		let text = render(&report(false), None);

		assert!(text.contains("Selling 0.1 of"));
		assert!(text.contains("Quoted buy amount: 100.037537"));
		assert!(text.contains("Uniswap_V3: 50.00%"));
		assert!(text.contains("Aerodrome: 50.00%"));
		assert!(text.contains("Affiliate fee: 1.00%"));
		assert!(text.contains("Buy token taxes: buy 0.00%, sell 0.00%"));
		assert!(text.contains("Trade surplus collected: none"));
		assert!(!text.contains("explorer"));
	}

	#[test]
	fn test_render_nonzero_and_missing_taxes() {
		let mut taxed = report(false);
		taxed.quote.token_metadata = serde_json::from_value(serde_json::json!({
			"buyToken": { "buyTaxBps": "300", "sellTaxBps": "0" }
		}))
		.unwrap();
		let text = render(&taxed, None);
		assert!(text.contains("Buy token taxes: buy 3.00%, sell 0.00%"));

		let mut unknown = report(false);
		unknown.quote.token_metadata = None;
		let text = render(&unknown, None);
		assert!(text.contains("Buy token taxes: unknown"));
	}

	#[test]
	fn test_render_explorer_link() {
		let text = render(&report(false), Some("https://basescan.org/"));
		let hash = TransactionHash(B256::repeat_byte(0xab));
		assert!(text.contains(&format!("View on explorer: https://basescan.org/tx/{}", hash)));
	}

	#[test]
	fn test_render_dry_run() {
		let text = render(&report(true), Some("https://basescan.org"));
		assert!(text.ends_with("Dry run: nothing was approved, signed or submitted"));
		assert!(!text.contains("Swap transaction"));
	}
}
