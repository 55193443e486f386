use crate::api::{ApiError, CryptoApi, CryptoPrice};
use crate::fallback;
use crate::reconcile::{reconcile, schedule_highlight_expiry};
use crate::storage::AssetSnapshotStorage;
use crate::types::{AssetRecord, ConnectionStatus};
use chrono::Utc;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Sparkline length used when the backend sends no samples for an asset.
const FLAT_SPARKLINE_POINTS: usize = 24;

/// Owns the fetch lifecycle: every fetch, scheduled or manual, goes through
/// [`PriceUpdater::update_prices`] and never overlaps another one.
pub struct PriceUpdater<T: ?Sized> {
	storage: Arc<AssetSnapshotStorage>,
	highlight_ttl: Duration,
	fetch_lock: Mutex<()>,
	api: Arc<T>,
}

impl<T> PriceUpdater<T>
where
	T: CryptoApi + Send + Sync + ?Sized + 'static,
{
	pub fn new(storage: Arc<AssetSnapshotStorage>, api: Arc<T>, highlight_ttl: Duration) -> Self {
		Self { storage, highlight_ttl, fetch_lock: Mutex::new(()), api }
	}

	pub async fn fetch_snapshot(&self) -> Result<Vec<AssetRecord>, ApiError> {
		let prices = self.api.fetch_prices().await?;
		Ok(prices.into_iter().map(convert_to_asset_record).collect())
	}

	/// Runs one fetch cycle and returns the number of installed records.
	///
	/// On failure the built-in dataset is installed and the status flips to
	/// disconnected; the error is still handed back to the caller.
	pub async fn update_prices(&self) -> Result<usize, ApiError> {
		let _guard = self.fetch_lock.lock().await;

		match self.fetch_snapshot().await {
			Ok(assets) => {
				let count = assets.len();
				let highlights = reconcile(&self.storage.last_fetched(), &assets);
				let changed = highlights.len();

				self.storage.set_highlights(highlights);
				if changed > 0 {
					schedule_highlight_expiry(Arc::clone(&self.storage), self.highlight_ttl);
				}
				self.storage.install_fetched(assets);
				self.storage.set_status(ConnectionStatus::connected_at(Utc::now()));
				self.storage.set_last_error(None);

				info!("Prices updated: {} assets, {} moved", count, changed);
				Ok(count)
			},
			Err(e) => {
				error!("Error fetching crypto data: {}", e);
				warn!("Falling back to the built-in dataset");

				self.storage.replace_snapshot(fallback::assets());
				self.storage.set_status(ConnectionStatus::disconnected());
				self.storage.set_last_error(Some(e.to_string()));
				Err(e)
			},
		}
	}
}

/// Fetches once right away, then every `update_interval` until the runtime stops.
/// Failed fetches do not stop the schedule.
pub async fn run_update_prices_loop<T>(
	updater: Arc<PriceUpdater<T>>,
	update_interval: Duration,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>
where
	T: CryptoApi + Send + Sync + ?Sized + 'static,
{
	let _ = tokio::spawn(async move {
		loop {
			let time_elapsed = tokio::time::Instant::now();

			let _ = updater.update_prices().await;

			tokio::time::sleep(update_interval.saturating_sub(time_elapsed.elapsed())).await;
		}
	});

	Ok(())
}

fn convert_to_asset_record(value: CryptoPrice) -> AssetRecord {
	let CryptoPrice {
		id,
		symbol,
		name,
		current_price,
		market_cap,
		market_cap_rank,
		total_volume,
		price_change_percentage_24h,
		circulating_supply,
		max_supply,
		sparkline_in_7d,
	} = value;

	let price_usd = current_price.unwrap_or_default();
	let sparkline = match sparkline_in_7d {
		Some(sparkline) => sparkline.price,
		None => vec![price_usd; FLAT_SPARKLINE_POINTS],
	};

	AssetRecord {
		id: id.into(),
		rank: market_cap_rank.unwrap_or_default(),
		symbol: symbol.to_uppercase().into(),
		name: name.into(),
		supply: circulating_supply.unwrap_or_default(),
		max_supply: max_supply.filter(|supply| *supply != 0.0),
		market_cap_usd: market_cap.unwrap_or_default(),
		volume_usd_24hr: total_volume.unwrap_or_default(),
		price_usd,
		change_percent_24hr: price_change_percentage_24h.unwrap_or_default(),
		vwap_24hr: price_usd,
		explorer: String::new(),
		sparkline,
	}
}
