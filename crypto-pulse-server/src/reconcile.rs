use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::storage::{AssetSnapshotStorage, Highlights};
use crate::types::{AssetRecord, DeltaDirection};

/// Compares two snapshots and flags every asset whose price moved.
///
/// The result is sparse: assets with an identical price, and assets missing
/// from `previous` (new listings), get no entry at all. Prices are compared
/// with exact float equality.
pub fn reconcile(previous: &[AssetRecord], next: &[AssetRecord]) -> Highlights {
	let previous_prices: HashMap<&str, f64> =
		previous.iter().map(|asset| (asset.id.as_str(), asset.price_usd)).collect();

	next.iter()
		.filter_map(|asset| {
			let old_price = *previous_prices.get(asset.id.as_str())?;
			if old_price == asset.price_usd {
				return None
			}
			let direction = if asset.price_usd > old_price {
				DeltaDirection::Up
			} else {
				DeltaDirection::Down
			};
			Some((asset.id.clone(), direction))
		})
		.collect()
}

/// Clears the highlight set once `ttl` has passed.
///
/// The timer is never cancelled: a refresh landing inside the window has its
/// own fresh highlights wiped when this fires.
pub fn schedule_highlight_expiry(storage: Arc<AssetSnapshotStorage>, ttl: Duration) {
	tokio::spawn(async move {
		tokio::time::sleep(ttl).await;
		storage.clear_highlights();
		debug!("Price highlights cleared");
	});
}
