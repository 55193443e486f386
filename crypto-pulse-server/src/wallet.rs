//! Wallet integration: a thin pass-through to an EIP-1193 style provider.
//!
//! The provider is resolved once at startup. When none is configured the
//! wallet sits in [`ProviderHandle::Missing`] and every connection attempt
//! fails with [`WalletError::ProviderUnavailable`].

use arc_swap::ArcSwap;
use async_trait::async_trait;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::store::KeyValueStore;

pub const ADDRESS_KEY: &str = "wallet-address";
pub const INSTALL_URL: &str = "https://metamask.io/download/";

/// EIP-1193 code for "user rejected the request".
const USER_REJECTED: i64 = 4001;
const WEI_PER_ETH: f64 = 1e18;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
	ProviderUnavailable,
	ProviderRejected(String),
	Rpc(String),
}

impl Display for WalletError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			WalletError::ProviderUnavailable =>
				write!(f, "No wallet provider found. Install one from {}", INSTALL_URL),
			WalletError::ProviderRejected(msg) => write!(f, "Wallet connection rejected: {}", msg),
			WalletError::Rpc(msg) => write!(f, "Wallet provider error: {}", msg),
		}
	}
}

impl std::error::Error for WalletError {}

#[async_trait]
pub trait WalletProvider: Send + Sync {
	async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError>;
}

pub enum ProviderHandle {
	Available(Arc<dyn WalletProvider>),
	Missing,
}

impl ProviderHandle {
	pub fn from_rpc_url(url: Option<String>) -> Self {
		match url {
			Some(url) => ProviderHandle::Available(Arc::new(JsonRpcProvider::new(url))),
			None => ProviderHandle::Missing,
		}
	}
}

/// Events a provider emits on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum WalletEvent {
	AccountsChanged(Vec<String>),
	ChainChanged(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletState {
	pub provider_available: bool,
	pub address: Option<String>,
	pub chain_id: Option<u64>,
	/// Balance in ETH with four decimals.
	pub balance: Option<String>,
	pub is_connecting: bool,
	pub is_connected: bool,
}

pub struct Wallet {
	provider: ProviderHandle,
	store: Arc<dyn KeyValueStore>,
	state: ArcSwap<WalletState>,
	notice_shown: AtomicBool,
}

impl Wallet {
	pub fn new(provider: ProviderHandle, store: Arc<dyn KeyValueStore>) -> Self {
		let state = WalletState {
			provider_available: matches!(provider, ProviderHandle::Available(_)),
			..Default::default()
		};
		Self { provider, store, state: ArcSwap::from_pointee(state), notice_shown: AtomicBool::new(false) }
	}

	pub fn state(&self) -> WalletState {
		self.state.load().as_ref().clone()
	}

	fn update<F: FnOnce(&mut WalletState)>(&self, change: F) {
		let mut state = self.state();
		change(&mut state);
		state.is_connected = state.address.is_some();
		self.state.store(Arc::new(state));
	}

	fn provider(&self) -> Result<&Arc<dyn WalletProvider>, WalletError> {
		match &self.provider {
			ProviderHandle::Available(provider) => Ok(provider),
			ProviderHandle::Missing => Err(WalletError::ProviderUnavailable),
		}
	}

	/// Reconnects silently when an address was saved by an earlier session.
	pub async fn restore(&self) {
		let saved = match self.store.get(ADDRESS_KEY) {
			Ok(saved) => saved,
			Err(e) => {
				error!("Could not read saved wallet address: {}", e);
				None
			},
		};
		if saved.is_some() && self.provider().is_ok() {
			if let Err(e) = self.check_connection().await {
				error!("Error checking connection: {}", e);
			}
		}
	}

	/// Adopts already-authorized accounts without prompting.
	pub async fn check_connection(&self) -> Result<(), WalletError> {
		let provider = self.provider()?;
		let accounts = parse_accounts(provider.request("eth_accounts", json!([])).await?)?;
		if let Some(address) = accounts.into_iter().next() {
			self.update(|state| state.address = Some(address.clone()));
			self.refresh_balance(&address).await;
			let chain = provider.request("eth_chainId", json!([])).await?;
			let chain_id = parse_chain_id(&chain)?;
			self.update(|state| state.chain_id = Some(chain_id));
		}
		Ok(())
	}

	pub async fn connect(&self) -> Result<WalletState, WalletError> {
		let provider = match self.provider() {
			Ok(provider) => provider,
			Err(e) => {
				if !self.notice_shown.swap(true, Ordering::SeqCst) {
					warn!("Wallet provider not found. Please install one: {}", INSTALL_URL);
				}
				return Err(e)
			},
		};

		self.update(|state| state.is_connecting = true);
		let result = self.request_connection(provider).await;
		self.update(|state| state.is_connecting = false);

		match result {
			Ok(address) => {
				info!("Connected to {}", short_address(&address));
				Ok(self.state())
			},
			Err(e) => {
				error!("Error connecting wallet: {}", e);
				Err(e)
			},
		}
	}

	async fn request_connection(&self, provider: &Arc<dyn WalletProvider>) -> Result<String, WalletError> {
		let accounts = parse_accounts(provider.request("eth_requestAccounts", json!([])).await?)?;
		let address = accounts
			.into_iter()
			.next()
			.ok_or_else(|| WalletError::ProviderRejected("No account was authorized".to_string()))?;
		let chain_id = parse_chain_id(&provider.request("eth_chainId", json!([])).await?)?;

		self.update(|state| {
			state.address = Some(address.clone());
			state.chain_id = Some(chain_id);
		});
		self.persist_address(&address);
		self.refresh_balance(&address).await;
		Ok(address)
	}

	pub fn disconnect(&self) {
		self.update(|state| {
			state.address = None;
			state.balance = None;
			state.chain_id = None;
		});
		if let Err(e) = self.store.remove(ADDRESS_KEY) {
			error!("Could not remove saved wallet address: {}", e);
		}
		info!("Wallet disconnected");
	}

	pub async fn handle_event(&self, event: WalletEvent) -> Result<(), WalletError> {
		match event {
			WalletEvent::AccountsChanged(accounts) => match accounts.into_iter().next() {
				None => self.disconnect(),
				Some(address) => {
					self.update(|state| state.address = Some(address.clone()));
					self.persist_address(&address);
					self.refresh_balance(&address).await;
				},
			},
			WalletEvent::ChainChanged(chain) => {
				let chain_id = parse_chain_id(&Value::String(chain))?;
				self.update(|state| state.chain_id = Some(chain_id));
				// A network switch invalidates everything read so far.
				self.restore().await;
			},
		}
		Ok(())
	}

	fn persist_address(&self, address: &str) {
		if let Err(e) = self.store.set(ADDRESS_KEY, address) {
			error!("Could not save wallet address: {}", e);
		}
	}

	async fn refresh_balance(&self, address: &str) {
		let provider = match self.provider() {
			Ok(provider) => provider,
			Err(_) => return,
		};
		match provider.request("eth_getBalance", json!([address, "latest"])).await {
			Ok(balance) => match parse_quantity(&balance) {
				Ok(wei) => self.update(|state| state.balance = Some(format_eth(wei))),
				Err(e) => error!("Error getting balance: {}", e),
			},
			Err(e) => error!("Error getting balance: {}", e),
		}
	}
}

fn parse_accounts(value: Value) -> Result<Vec<String>, WalletError> {
	serde_json::from_value(value).map_err(|e| WalletError::Rpc(format!("Malformed accounts: {}", e)))
}

/// Parses a hex quantity such as `"0x1"`.
fn parse_quantity(value: &Value) -> Result<u128, WalletError> {
	let raw = value.as_str().ok_or_else(|| WalletError::Rpc(format!("Expected hex string, got {}", value)))?;
	let digits = raw.trim_start_matches("0x").trim_start_matches("0X");
	if digits.is_empty() {
		return Ok(0)
	}
	u128::from_str_radix(digits, 16).map_err(|e| WalletError::Rpc(format!("Invalid quantity '{}': {}", raw, e)))
}

fn parse_chain_id(value: &Value) -> Result<u64, WalletError> {
	let chain_id = parse_quantity(value)?;
	u64::try_from(chain_id).map_err(|_| WalletError::Rpc(format!("Chain id {} out of range", value)))
}

fn format_eth(wei: u128) -> String {
	format!("{:.4}", wei as f64 / WEI_PER_ETH)
}

fn short_address(address: &str) -> String {
	let chars: Vec<char> = address.chars().collect();
	if chars.len() <= 10 {
		return address.to_string()
	}
	let head: String = chars[..6].iter().collect();
	let tail: String = chars[chars.len() - 4..].iter().collect();
	format!("{}...{}", head, tail)
}

#[derive(Deserialize, Debug)]
struct RpcErrorBody {
	code: i64,
	message: String,
}

#[derive(Deserialize, Debug)]
struct RpcResponse {
	result: Option<Value>,
	error: Option<RpcErrorBody>,
}

/// Wallet provider reached over JSON-RPC.
pub struct JsonRpcProvider {
	url: String,
	inner: reqwest::Client,
	next_id: AtomicU64,
}

impl JsonRpcProvider {
	pub fn new(url: String) -> Self {
		Self { url, inner: reqwest::Client::new(), next_id: AtomicU64::new(1) }
	}
}

#[async_trait]
impl WalletProvider for JsonRpcProvider {
	async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
		let body = json!({
			"jsonrpc": "2.0",
			"id": self.next_id.fetch_add(1, Ordering::Relaxed),
			"method": method,
			"params": params,
		});

		let response = self
			.inner
			.post(self.url.as_str())
			.json(&body)
			.send()
			.await
			.map_err(|e| WalletError::Rpc(format!("Failed to send request: {}", e)))?;

		if !response.status().is_success() {
			return Err(WalletError::Rpc(format!("HTTP error! status: {}", response.status())))
		}

		let response: RpcResponse = response
			.json()
			.await
			.map_err(|e| WalletError::Rpc(format!("Could not decode provider response: {}", e)))?;

		match (response.result, response.error) {
			(_, Some(error)) if error.code == USER_REJECTED => Err(WalletError::ProviderRejected(error.message)),
			(_, Some(error)) => Err(WalletError::Rpc(format!("{} ({})", error.message, error.code))),
			(Some(result), None) => Ok(result),
			(None, None) => Ok(Value::Null),
		}
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::store::FileStore;
	use std::collections::HashMap;
	use std::sync::Mutex;

	/// Answers each method with a fixed value and records every call.
	pub struct MockProvider {
		answers: Mutex<HashMap<String, Result<Value, WalletError>>>,
		pub calls: Mutex<Vec<String>>,
	}

	impl MockProvider {
		pub fn new() -> Self {
			let mut answers = HashMap::new();
			answers.insert("eth_requestAccounts".to_string(), Ok(json!(["0x1234567890abcdef1234"])));
			answers.insert("eth_accounts".to_string(), Ok(json!(["0x1234567890abcdef1234"])));
			answers.insert("eth_chainId".to_string(), Ok(json!("0x1")));
			// 1.5 ETH
			answers.insert("eth_getBalance".to_string(), Ok(json!("0x14d1120d7b160000")));
			Self { answers: Mutex::new(answers), calls: Mutex::new(Vec::new()) }
		}

		pub fn answer(&self, method: &str, value: Result<Value, WalletError>) {
			self.answers.lock().unwrap().insert(method.to_string(), value);
		}
	}

	#[async_trait]
	impl WalletProvider for MockProvider {
		async fn request(&self, method: &str, _params: Value) -> Result<Value, WalletError> {
			self.calls.lock().unwrap().push(method.to_string());
			self.answers
				.lock()
				.unwrap()
				.get(method)
				.cloned()
				.unwrap_or_else(|| Err(WalletError::Rpc(format!("unsupported method {}", method))))
		}
	}

	fn store(dir: &tempfile::TempDir) -> Arc<dyn KeyValueStore> {
		Arc::new(FileStore::new(dir.path().join("state.json")))
	}

	fn wallet_with(provider: Arc<MockProvider>, store: Arc<dyn KeyValueStore>) -> Wallet {
		Wallet::new(ProviderHandle::Available(provider), store)
	}

	#[tokio::test]
	async fn missing_provider_is_typed_error() {
		let dir = tempfile::tempdir().unwrap();
		let wallet = Wallet::new(ProviderHandle::Missing, store(&dir));

		assert_eq!(wallet.connect().await, Err(WalletError::ProviderUnavailable));
		assert_eq!(wallet.connect().await, Err(WalletError::ProviderUnavailable));
		assert!(!wallet.state().provider_available);
		assert!(!wallet.state().is_connecting);
	}

	#[tokio::test]
	async fn connect_reads_account_chain_and_balance() {
		let dir = tempfile::tempdir().unwrap();
		let store = store(&dir);
		let wallet = wallet_with(Arc::new(MockProvider::new()), Arc::clone(&store));

		let state = wallet.connect().await.unwrap();

		assert!(state.is_connected);
		assert!(!state.is_connecting);
		assert_eq!(state.address.as_deref(), Some("0x1234567890abcdef1234"));
		assert_eq!(state.chain_id, Some(1));
		assert_eq!(state.balance.as_deref(), Some("1.5000"));
		assert_eq!(store.get(ADDRESS_KEY).unwrap().as_deref(), Some("0x1234567890abcdef1234"));
	}

	#[tokio::test]
	async fn rejected_connection_leaves_wallet_disconnected() {
		let dir = tempfile::tempdir().unwrap();
		let provider = Arc::new(MockProvider::new());
		provider.answer(
			"eth_requestAccounts",
			Err(WalletError::ProviderRejected("User rejected the request.".to_string())),
		);
		let wallet = wallet_with(provider, store(&dir));

		assert!(matches!(wallet.connect().await, Err(WalletError::ProviderRejected(_))));
		assert!(!wallet.state().is_connected);
		assert!(!wallet.state().is_connecting);
	}

	#[tokio::test]
	async fn restore_only_runs_with_saved_address() {
		let dir = tempfile::tempdir().unwrap();
		let store = store(&dir);
		let provider = Arc::new(MockProvider::new());
		let wallet = wallet_with(Arc::clone(&provider), Arc::clone(&store));

		wallet.restore().await;
		assert!(provider.calls.lock().unwrap().is_empty());

		store.set(ADDRESS_KEY, "0x1234567890abcdef1234").unwrap();
		wallet.restore().await;
		assert_eq!(
			*provider.calls.lock().unwrap(),
			vec!["eth_accounts", "eth_getBalance", "eth_chainId"]
		);
		assert!(wallet.state().is_connected);
	}

	#[tokio::test]
	async fn empty_accounts_event_disconnects() {
		let dir = tempfile::tempdir().unwrap();
		let store = store(&dir);
		let wallet = wallet_with(Arc::new(MockProvider::new()), Arc::clone(&store));
		wallet.connect().await.unwrap();

		wallet.handle_event(WalletEvent::AccountsChanged(vec![])).await.unwrap();

		let state = wallet.state();
		assert!(!state.is_connected);
		assert_eq!(state.balance, None);
		assert_eq!(state.chain_id, None);
		assert_eq!(store.get(ADDRESS_KEY).unwrap(), None);
	}

	#[tokio::test]
	async fn accounts_event_switches_address() {
		let dir = tempfile::tempdir().unwrap();
		let store = store(&dir);
		let wallet = wallet_with(Arc::new(MockProvider::new()), Arc::clone(&store));

		wallet
			.handle_event(WalletEvent::AccountsChanged(vec!["0xfeed".to_string(), "0xbeef".to_string()]))
			.await
			.unwrap();

		assert_eq!(wallet.state().address.as_deref(), Some("0xfeed"));
		assert_eq!(store.get(ADDRESS_KEY).unwrap().as_deref(), Some("0xfeed"));
	}

	#[tokio::test]
	async fn chain_event_updates_chain_id() {
		let dir = tempfile::tempdir().unwrap();
		let provider = Arc::new(MockProvider::new());
		provider.answer("eth_chainId", Ok(json!("0x89")));
		let wallet = wallet_with(provider, store(&dir));

		wallet.handle_event(WalletEvent::ChainChanged("0x89".to_string())).await.unwrap();
		assert_eq!(wallet.state().chain_id, Some(137));

		assert!(wallet.handle_event(WalletEvent::ChainChanged("0xzz".to_string())).await.is_err());
	}

	#[test]
	fn quantities_and_formatting() {
		assert_eq!(parse_quantity(&json!("0x0")), Ok(0));
		assert_eq!(parse_quantity(&json!("0x")), Ok(0));
		assert_eq!(parse_quantity(&json!("0xde0b6b3a7640000")), Ok(1_000_000_000_000_000_000));
		assert!(parse_quantity(&json!(12)).is_err());
		assert_eq!(format_eth(1_000_000_000_000_000_000), "1.0000");
		assert_eq!(short_address("0x1234567890abcdef1234"), "0x1234...1234");
	}

	#[test]
	fn short_address_counts_characters() {
		assert_eq!(short_address("0xabcéééééééé"), "0xabcé...éééé");
		assert_eq!(short_address("0xé"), "0xé");
	}

	#[test]
	fn oversized_chain_id_is_rejected() {
		assert_eq!(parse_chain_id(&json!("0xffffffffffffffff")), Ok(u64::MAX));
		assert!(matches!(parse_chain_id(&json!("0x10000000000000000")), Err(WalletError::Rpc(_))));
	}

	#[tokio::test]
	async fn connect_fails_on_oversized_chain_id() {
		let dir = tempfile::tempdir().unwrap();
		let provider = Arc::new(MockProvider::new());
		provider.answer("eth_chainId", Ok(json!("0x10000000000000000")));
		let wallet = wallet_with(provider, store(&dir));

		assert!(matches!(wallet.connect().await, Err(WalletError::Rpc(_))));
		assert_eq!(wallet.state().chain_id, None);
	}

	#[test]
	fn events_deserialize_from_tagged_json() {
		let event: WalletEvent =
			serde_json::from_str(r#"{"event": "accountsChanged", "data": ["0xabc"]}"#).unwrap();
		assert_eq!(event, WalletEvent::AccountsChanged(vec!["0xabc".to_string()]));

		let event: WalletEvent = serde_json::from_str(r#"{"event": "chainChanged", "data": "0x1"}"#).unwrap();
		assert_eq!(event, WalletEvent::ChainChanged("0x1".to_string()));
	}
}
