//! Signature bytes produced by the trader's account.

/// Raw recoverable signature, `r || s || v` for secp256k1 accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(pub Vec<u8>);

impl Signature {
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}
}
