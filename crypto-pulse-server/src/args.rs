use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(name = "crypto-pulse-server")]
pub struct PulseArgs {
	/// Seconds between two price refreshes
	#[clap(short, long, default_value = "30")]
	pub update_interval_seconds: u64,

	/// How long a price-up/price-down highlight stays active, in milliseconds
	#[clap(long, default_value = "1000")]
	pub highlight_millis: u64,

	/// The port to run the server on
	#[clap(short, long, default_value = "8070")]
	pub port: u16,

	/// File backing the persisted session and wallet keys
	#[clap(long, env = "PULSE_STATE_FILE", default_value = "crypto-pulse-state.json")]
	pub state_file: PathBuf,

	#[clap(flatten)]
	pub backend_config: BackendConfig,
	#[clap(flatten)]
	pub wallet_config: WalletConfig,
}

#[derive(Parser, Debug, Clone)]
pub struct BackendConfig {
	/// Base URL of the tracker backend.
	#[clap(long, env = "PULSE_API_URL", default_value = "http://localhost:8081/api")]
	pub api_url: String,

	/// Use the backend's `/test` endpoints, which need no database.
	#[clap(long, env = "PULSE_TEST_MODE")]
	pub test_mode: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct WalletConfig {
	/// JSON-RPC endpoint of the wallet provider.
	/// Without it the wallet reports that no provider is installed.
	#[clap(long, env = "PULSE_WALLET_RPC_URL")]
	pub wallet_rpc_url: Option<String>,
}
