use crate::api::{BackendClient, CryptoApi};
use crate::args::PulseArgs;
use crate::handlers::{configure, AppState};
use crate::price_updater::PriceUpdater;
use crate::session::Session;
use crate::storage::AssetSnapshotStorage;
use crate::store::{FileStore, KeyValueStore};
use crate::wallet::{ProviderHandle, Wallet};
use actix_web::{web, App, HttpServer};
use clap::Parser;
use log::{info, warn};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

mod api;
mod args;
mod fallback;
mod format;
mod handlers;
mod history;
mod pipeline;
mod price_updater;
mod reconcile;
mod session;
mod sparkline;
mod stats;
mod storage;
mod store;
mod types;
mod wallet;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
	dotenv::dotenv().ok();
	pretty_env_logger::init();

	let args: PulseArgs = PulseArgs::parse();

	let backend = BackendClient::new_from_config(args.backend_config.clone())?;
	match backend.health().await {
		Ok(health) => info!("Backend health: {}", health),
		Err(e) => warn!("Backend health check failed: {}", e),
	}
	let api: Arc<dyn CryptoApi + Send + Sync> = Arc::new(backend);

	let storage = Arc::new(AssetSnapshotStorage::default());
	let updater = Arc::new(PriceUpdater::new(
		Arc::clone(&storage),
		Arc::clone(&api),
		Duration::from_millis(args.highlight_millis),
	));

	let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&args.state_file));
	let session = Session::restore(Arc::clone(&store));
	let wallet = Wallet::new(ProviderHandle::from_rpc_url(args.wallet_config.wallet_rpc_url.clone()), store);
	wallet.restore().await;

	price_updater::run_update_prices_loop(
		Arc::clone(&updater),
		Duration::from_secs(args.update_interval_seconds),
	)
	.await?;

	let data = web::Data::new(AppState { storage, updater, api, session, wallet });

	info!("Running crypto-pulse-server on port {}... (Press CTRL+C to quit)", args.port);
	HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
		.bind(("0.0.0.0", args.port))?
		.run()
		.await?;

	Ok(())
}
