use arc_swap::{ArcSwap, ArcSwapOption};
use smol_str::SmolStr;
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{AssetRecord, ConnectionStatus, DeltaDirection};

pub type Snapshot = Arc<Vec<AssetRecord>>;
pub type Highlights = HashMap<SmolStr, DeltaDirection>;

/// Holds everything the display reads: the installed snapshot, the active
/// highlight set and the connection status. Every cell is swapped whole.
///
/// The installed snapshot may be the fallback dataset; `fetched` only ever
/// holds the most recent successful fetch and is what price moves are
/// measured against.
#[derive(Debug, Default)]
pub struct AssetSnapshotStorage {
	snapshot: ArcSwap<Vec<AssetRecord>>,
	fetched: ArcSwap<Vec<AssetRecord>>,
	highlights: ArcSwap<Highlights>,
	status: ArcSwap<ConnectionStatus>,
	last_error: ArcSwapOption<String>,
}

impl AssetSnapshotStorage {
	pub fn snapshot(&self) -> Snapshot {
		self.snapshot.load_full()
	}

	pub fn get_asset(&self, id: &str) -> Option<AssetRecord> {
		self.snapshot.load().iter().find(|asset| asset.id == id).cloned()
	}

	/// Installs `assets` and hands back the snapshot it replaced.
	pub fn replace_snapshot(&self, assets: Vec<AssetRecord>) -> Snapshot {
		self.snapshot.swap(Arc::new(assets))
	}

	pub fn last_fetched(&self) -> Snapshot {
		self.fetched.load_full()
	}

	/// Installs a successful fetch for display and as the new baseline.
	pub fn install_fetched(&self, assets: Vec<AssetRecord>) -> Snapshot {
		let assets = Arc::new(assets);
		self.snapshot.store(Arc::clone(&assets));
		self.fetched.swap(assets)
	}

	pub fn highlights(&self) -> Arc<Highlights> {
		self.highlights.load_full()
	}

	pub fn set_highlights(&self, highlights: Highlights) {
		self.highlights.store(Arc::new(highlights));
	}

	pub fn clear_highlights(&self) {
		self.highlights.store(Arc::new(HashMap::new()));
	}

	pub fn status(&self) -> ConnectionStatus {
		self.status.load().as_ref().clone()
	}

	pub fn set_status(&self, status: ConnectionStatus) {
		self.status.store(Arc::new(status));
	}

	pub fn last_error(&self) -> Option<String> {
		self.last_error.load_full().map(|e| e.as_ref().clone())
	}

	pub fn set_last_error(&self, error: Option<String>) {
		self.last_error.store(error.map(Arc::new));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn asset(id: &str, price: f64) -> AssetRecord {
		AssetRecord { id: id.into(), price_usd: price, ..Default::default() }
	}

	#[test]
	fn replace_returns_previous_snapshot() {
		let storage = AssetSnapshotStorage::default();
		assert!(storage.snapshot().is_empty());

		let previous = storage.replace_snapshot(vec![asset("bitcoin", 1.0)]);
		assert!(previous.is_empty());

		let previous = storage.replace_snapshot(vec![asset("ethereum", 2.0)]);
		assert_eq!(previous[0].id, "bitcoin");
		assert_eq!(storage.snapshot()[0].id, "ethereum");
	}

	#[test]
	fn fallback_install_keeps_fetched_baseline() {
		let storage = AssetSnapshotStorage::default();
		storage.install_fetched(vec![asset("bitcoin", 1.0)]);

		storage.replace_snapshot(vec![asset("bitcoin", 9.0), asset("ethereum", 3.0)]);

		assert_eq!(storage.snapshot().len(), 2);
		assert_eq!(*storage.last_fetched(), vec![asset("bitcoin", 1.0)]);

		let previous = storage.install_fetched(vec![asset("bitcoin", 2.0)]);
		assert_eq!(*previous, vec![asset("bitcoin", 1.0)]);
		assert_eq!(storage.snapshot()[0].price_usd, 2.0);
	}

	#[test]
	fn readers_keep_their_snapshot_across_replacement() {
		let storage = AssetSnapshotStorage::default();
		storage.replace_snapshot(vec![asset("bitcoin", 1.0)]);

		let held = storage.snapshot();
		storage.replace_snapshot(vec![asset("bitcoin", 2.0)]);

		assert_eq!(held[0].price_usd, 1.0);
		assert_eq!(storage.get_asset("bitcoin").unwrap().price_usd, 2.0);
		assert_eq!(storage.get_asset("dogecoin"), None);
	}

	#[test]
	fn highlights_and_error_round_trip() {
		let storage = AssetSnapshotStorage::default();
		let mut highlights = Highlights::new();
		highlights.insert("bitcoin".into(), DeltaDirection::Up);

		storage.set_highlights(highlights);
		assert_eq!(storage.highlights().get("bitcoin"), Some(&DeltaDirection::Up));

		storage.clear_highlights();
		assert!(storage.highlights().is_empty());

		storage.set_last_error(Some("boom".to_string()));
		assert_eq!(storage.last_error().as_deref(), Some("boom"));
		storage.set_last_error(None);
		assert_eq!(storage.last_error(), None);
	}
}
