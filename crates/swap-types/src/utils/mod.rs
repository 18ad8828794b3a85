//! Utility functions for amount conversion, display formatting and serde.

pub mod conversion;
pub mod formatting;
pub mod serde_helpers;

pub use conversion::{to_base_units, ConversionError};
pub use formatting::{format_bps, format_token_amount};
