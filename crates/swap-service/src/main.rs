//! Main entry point for the permit2 swap executor.
//!
//! Loads the configuration, runs one swap through the pipeline and prints
//! a report of the quote and the submitted transaction. Any stage failure
//! is logged and ends the process with a non-zero exit status.

use clap::Parser;
use std::path::PathBuf;
use swap_config::Config;
use swap_core::{RunOptions, SwapBuilder};

mod report;

/// Command-line arguments for the swap executor.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	/// Sell amount in whole tokens, overriding the configured amount
	#[arg(long)]
	sell_amount: Option<String>,

	/// Fetch and report the quote without approving, signing or submitting
	#[arg(long)]
	dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt().with_env_filter(env_filter).with_target(true).init();

	let config_path = args
		.config
		.to_str()
		.ok_or("configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await.inspect_err(|e| {
		tracing::error!(path = %config_path, error = %e, "Failed to load configuration");
	})?;
	tracing::info!(
		chain_id = config.swap.chain_id,
		sell_token = %config.swap.sell_token,
		buy_token = %config.swap.buy_token,
		"Loaded configuration"
	);

	let explorer_url = config.network.explorer_url.clone();
	let engine = SwapBuilder::new(config).build()?;

	let options = RunOptions {
		sell_amount: args.sell_amount,
		dry_run: args.dry_run,
	};
	let report = engine.run(options).await.inspect_err(|e| {
		tracing::error!(error = %e, "Swap failed");
	})?;

	println!("{}", report::render(&report, explorer_url.as_deref()));
	Ok(())
}
