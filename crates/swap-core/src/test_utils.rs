//! Recording mocks for the account, chain and aggregator interfaces.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use swap_account::implementations::local::LocalAccount;
use swap_account::{AccountError, AccountInterface, AccountService};
use swap_delivery::{DeliveryError, DeliveryInterface, DeliveryService};
use swap_quote::{AggregatorInterface, QuoteError};
use swap_types::{
	Address, Bytes, PriceResult, Quote, Signature, Transaction, TransactionHash,
	TransactionReceipt, TradeRequest, TypedData, B256, U256,
};

pub const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const CHAIN_ID: u64 = 8453;

const DECIMALS_SELECTOR: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

/// Counts of account operations.
#[derive(Debug, Default)]
pub struct AccountCalls {
	pub typed_data: usize,
	pub transactions: usize,
}

/// Local account that records what it was asked to sign.
pub struct MockAccount {
	inner: LocalAccount,
	pub calls: Arc<Mutex<AccountCalls>>,
}

impl MockAccount {
	pub fn new() -> Self {
		Self {
			inner: LocalAccount::new(ANVIL_KEY).unwrap(),
			calls: Arc::default(),
		}
	}
}

#[async_trait]
impl AccountInterface for MockAccount {
	async fn address(&self) -> Result<Address, AccountError> {
		self.inner.address().await
	}

	async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature, AccountError> {
		self.calls.lock().unwrap().typed_data += 1;
		self.inner.sign_typed_data(typed_data).await
	}

	async fn sign_transaction(&self, tx: &Transaction) -> Result<Bytes, AccountError> {
		self.calls.lock().unwrap().transactions += 1;
		self.inner.sign_transaction(tx).await
	}
}

/// What the mock chain saw.
#[derive(Debug, Default)]
pub struct ChainCalls {
	pub calls: Vec<Transaction>,
	pub estimates: Vec<Transaction>,
	pub raw: Vec<Bytes>,
	pub receipt_polls: usize,
}

/// Chain client answering from canned values.
pub struct MockChain {
	pub decimals: u8,
	pub revert_calls: bool,
	pub receipt_success: bool,
	pub mined: bool,
	pub calls: Arc<Mutex<ChainCalls>>,
}

impl MockChain {
	pub fn new() -> Self {
		Self {
			decimals: 18,
			revert_calls: false,
			receipt_success: true,
			mined: true,
			calls: Arc::default(),
		}
	}
}

#[async_trait]
impl DeliveryInterface for MockChain {
	async fn call(&self, tx: &Transaction) -> Result<Bytes, DeliveryError> {
		self.calls.lock().unwrap().calls.push(tx.clone());
		if tx.data.starts_with(&DECIMALS_SELECTOR) {
			return Ok(U256::from(self.decimals).to_be_bytes::<32>().to_vec().into());
		}
		if self.revert_calls {
			return Err(DeliveryError::TransactionFailed("execution reverted".into()));
		}
		Ok(U256::from(1).to_be_bytes::<32>().to_vec().into())
	}

	async fn estimate_gas(&self, tx: &Transaction) -> Result<u64, DeliveryError> {
		self.calls.lock().unwrap().estimates.push(tx.clone());
		Ok(55_000)
	}

	async fn get_gas_price(&self) -> Result<u128, DeliveryError> {
		Ok(1_000_000_000)
	}

	async fn get_nonce(&self, _address: Address) -> Result<u64, DeliveryError> {
		Ok(self.calls.lock().unwrap().raw.len() as u64)
	}

	async fn send_raw_transaction(&self, raw: &Bytes) -> Result<TransactionHash, DeliveryError> {
		let mut calls = self.calls.lock().unwrap();
		calls.raw.push(raw.clone());
		Ok(TransactionHash(B256::repeat_byte(calls.raw.len() as u8)))
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, DeliveryError> {
		self.calls.lock().unwrap().receipt_polls += 1;
		if !self.mined {
			return Ok(None);
		}
		Ok(Some(TransactionReceipt {
			hash: *hash,
			block_number: 1,
			success: self.receipt_success,
		}))
	}

	async fn get_chain_id(&self) -> Result<u64, DeliveryError> {
		Ok(CHAIN_ID)
	}
}

/// Aggregator returning fixed responses and recording requests.
pub struct MockAggregator {
	pub price: serde_json::Value,
	pub quote: serde_json::Value,
	pub requests: Arc<Mutex<Vec<(&'static str, TradeRequest)>>>,
}

impl MockAggregator {
	pub fn new(price: serde_json::Value, quote: serde_json::Value) -> Self {
		Self {
			price,
			quote,
			requests: Arc::default(),
		}
	}
}

#[async_trait]
impl AggregatorInterface for MockAggregator {
	async fn sources(&self, _chain_id: u64) -> Result<Vec<String>, QuoteError> {
		Ok(vec!["Uniswap_V3".to_string(), "Aerodrome".to_string()])
	}

	async fn price(&self, request: &TradeRequest) -> Result<PriceResult, QuoteError> {
		self.requests.lock().unwrap().push(("price", request.clone()));
		serde_json::from_value(self.price.clone())
			.map_err(|e| QuoteError::InvalidResponse(e.to_string()))
	}

	async fn quote(&self, request: &TradeRequest) -> Result<Quote, QuoteError> {
		self.requests.lock().unwrap().push(("quote", request.clone()));
		serde_json::from_value(self.quote.clone())
			.map_err(|e| QuoteError::InvalidResponse(e.to_string()))
	}
}

/// Builds a delivery service over the given chain, returning its call log.
pub fn delivery(chain: MockChain) -> (Arc<DeliveryService>, Arc<Mutex<ChainCalls>>) {
	let calls = chain.calls.clone();
	let account = AccountService::new(Box::new(LocalAccount::new(ANVIL_KEY).unwrap()));
	let service = DeliveryService::new(Box::new(chain), Arc::new(account), CHAIN_ID);
	(Arc::new(service), calls)
}

/// A Permit2 `PermitTransferFrom` message as the aggregator returns it.
pub fn permit_eip712() -> serde_json::Value {
	serde_json::json!({
		"types": {
			"EIP712Domain": [
				{ "name": "name", "type": "string" },
				{ "name": "chainId", "type": "uint256" },
				{ "name": "verifyingContract", "type": "address" }
			],
			"PermitTransferFrom": [
				{ "name": "permitted", "type": "TokenPermissions" },
				{ "name": "spender", "type": "address" },
				{ "name": "nonce", "type": "uint256" },
				{ "name": "deadline", "type": "uint256" }
			],
			"TokenPermissions": [
				{ "name": "token", "type": "address" },
				{ "name": "amount", "type": "uint256" }
			]
		},
		"domain": {
			"name": "Permit2",
			"chainId": 8453,
			"verifyingContract": "0x000000000022d473030f116ddee9f6b43ac78ba3"
		},
		"primaryType": "PermitTransferFrom",
		"message": {
			"permitted": {
				"token": "0x1111111111111111111111111111111111111111",
				"amount": "100000000000000000"
			},
			"spender": "0x7f6cee965959295cc64d0e6c00d99d6532d8e86b",
			"nonce": "2241959297937691820908574931991575",
			"deadline": "1718669420"
		}
	})
}

/// Quote JSON with an allowance issue, a permit payload and a transaction.
pub fn full_quote() -> serde_json::Value {
	serde_json::json!({
		"liquidityAvailable": true,
		"buyAmount": "100037537",
		"sellAmount": "100000000000000000",
		"affiliateFeeBps": "100",
		"tradeSurplus": "0",
		"issues": {
			"allowance": {
				"actual": "0",
				"spender": "0x000000000022d473030f116ddee9f6b43ac78ba3"
			},
			"balance": null,
			"simulationIncomplete": false,
			"invalidSourcesPassed": []
		},
		"permit2": {
			"type": "Permit2",
			"hash": "0xab0c8909f2f8daed2891cfb5e1a0a1e5cb6e3a0d7c3ad4d1c24a1e4c8e5f3a21",
			"eip712": permit_eip712()
		},
		"route": {
			"fills": [
				{ "from": "0x1111111111111111111111111111111111111111", "to": "0x2222222222222222222222222222222222222222", "source": "Uniswap_V3", "proportionBps": "5000" },
				{ "from": "0x1111111111111111111111111111111111111111", "to": "0x2222222222222222222222222222222222222222", "source": "Aerodrome", "proportionBps": "5000" }
			]
		},
		"tokenMetadata": {
			"buyToken": { "buyTaxBps": "0", "sellTaxBps": "0" },
			"sellToken": { "buyTaxBps": "0", "sellTaxBps": "0" }
		},
		"transaction": {
			"to": "0x7f6cee965959295cc64d0e6c00d99d6532d8e86b",
			"data": "0x1fff991f000000000000000000000000f39fd6e51aad88f6f4ce6ab8827279cfffb92266",
			"gas": "288079",
			"gasPrice": "4837860000",
			"value": "0"
		}
	})
}
