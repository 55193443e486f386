use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Current market state of a single crypto asset.
///
/// Records are produced fresh on every fetch and replaced as a whole
/// sequence; nothing patches an installed record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
	pub id: SmolStr,
	pub rank: u32,
	pub symbol: SmolStr,
	pub name: SmolStr,
	pub supply: f64,
	/// `None` means the supply is uncapped.
	pub max_supply: Option<f64>,
	pub market_cap_usd: f64,
	#[serde(rename = "volumeUsd24Hr")]
	pub volume_usd_24hr: f64,
	pub price_usd: f64,
	#[serde(rename = "changePercent24Hr")]
	pub change_percent_24hr: f64,
	#[serde(rename = "vwap24Hr")]
	pub vwap_24hr: f64,
	pub explorer: String,
	/// Recent price samples, oldest first.
	pub sparkline: Vec<f64>,
}

/// Direction of a price movement between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaDirection {
	Up,
	Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
	pub connected: bool,
	pub connecting: bool,
	pub last_update: Option<DateTime<Utc>>,
}

impl Default for ConnectionStatus {
	fn default() -> Self {
		Self { connected: false, connecting: true, last_update: None }
	}
}

impl ConnectionStatus {
	pub fn connected_at(time: DateTime<Utc>) -> Self {
		Self { connected: true, connecting: false, last_update: Some(time) }
	}

	pub fn disconnected() -> Self {
		Self { connected: false, connecting: false, last_update: None }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
	#[serde(rename = "rank")]
	Rank,
	#[serde(rename = "name")]
	Name,
	#[serde(rename = "priceUsd")]
	PriceUsd,
	#[serde(rename = "changePercent24Hr")]
	ChangePercent24Hr,
	#[serde(rename = "volumeUsd24Hr")]
	VolumeUsd24Hr,
	#[serde(rename = "marketCapUsd")]
	MarketCapUsd,
}

impl Default for SortField {
	fn default() -> Self {
		SortField::Rank
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
	Asc,
	Desc,
}

impl Default for SortDirection {
	fn default() -> Self {
		SortDirection::Asc
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
	pub field: SortField,
	pub direction: SortDirection,
}

/// An authenticated backend user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub username: String,
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub role: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn asset_record_serializes_camel_case() {
		let record = AssetRecord { id: "bitcoin".into(), price_usd: 1.5, ..Default::default() };
		let json = serde_json::to_value(&record).unwrap();
		assert_eq!(json["priceUsd"], 1.5);
		assert_eq!(json["changePercent24Hr"], 0.0);
		assert_eq!(json["volumeUsd24Hr"], 0.0);
		assert_eq!(json["vwap24Hr"], 0.0);
		assert!(json.get("changePercent24hr").is_none());
		assert!(json["maxSupply"].is_null());
	}

	#[test]
	fn sparkline_samples_survive_json_exactly() {
		let record = AssetRecord { sparkline: vec![92166.27193621219, 0.1 + 0.2, 1e-7 / 3.0], ..Default::default() };
		let text = serde_json::to_string(&record).unwrap();

		let parsed: AssetRecord = serde_json::from_str(&text).unwrap();
		assert_eq!(parsed, record);
	}

	#[test]
	fn sort_names_match_record_fields() {
		let record = serde_json::to_value(AssetRecord::default()).unwrap();
		for field in [
			SortField::Rank,
			SortField::Name,
			SortField::PriceUsd,
			SortField::ChangePercent24Hr,
			SortField::VolumeUsd24Hr,
			SortField::MarketCapUsd,
		] {
			let name = serde_json::to_value(field).unwrap();
			assert!(record.get(name.as_str().unwrap()).is_some(), "{} missing", name);
		}
	}

	#[test]
	fn status_starts_connecting() {
		let status = ConnectionStatus::default();
		assert!(status.connecting);
		assert!(!status.connected);
		assert_eq!(status.last_update, None);
	}
}
