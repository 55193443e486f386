use serde::Serialize;

use crate::format::{format_currency, format_percent, format_price};
use crate::types::AssetRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinStats {
	pub symbol: String,
	pub name: String,
	pub price: f64,
	pub change: f64,
	/// Share of the total market cap in percent, one decimal.
	pub dominance: f64,
	pub price_display: String,
	pub change_display: String,
}

/// Aggregate figures over the installed snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
	pub btc: Option<CoinStats>,
	pub eth: Option<CoinStats>,
	pub total_market_cap: f64,
	pub total_volume_24hr: f64,
	pub total_market_cap_display: String,
	pub total_volume_24hr_display: String,
}

pub fn market_stats(assets: &[AssetRecord]) -> MarketStats {
	let total_market_cap = assets.iter().fold(0.0, |acc, a| acc + a.market_cap_usd);
	let total_volume_24hr = assets.iter().fold(0.0, |acc, a| acc + a.volume_usd_24hr);

	MarketStats {
		btc: coin_stats(assets, "BTC", total_market_cap),
		eth: coin_stats(assets, "ETH", total_market_cap),
		total_market_cap,
		total_volume_24hr,
		total_market_cap_display: format_currency(total_market_cap),
		total_volume_24hr_display: format_currency(total_volume_24hr),
	}
}

fn coin_stats(assets: &[AssetRecord], symbol: &str, total_market_cap: f64) -> Option<CoinStats> {
	let asset = assets.iter().find(|a| a.symbol.eq_ignore_ascii_case(symbol))?;
	let dominance = if total_market_cap > 0.0 {
		(asset.market_cap_usd / total_market_cap * 1000.0).round() / 10.0
	} else {
		0.0
	};

	Some(CoinStats {
		symbol: asset.symbol.to_string(),
		name: asset.name.to_string(),
		price: asset.price_usd,
		change: asset.change_percent_24hr,
		dominance,
		price_display: format_price(asset.price_usd),
		change_display: format_percent(asset.change_percent_24hr),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fallback;

	fn asset(symbol: &str, cap: f64, volume: f64) -> AssetRecord {
		AssetRecord {
			id: symbol.to_lowercase().into(),
			symbol: symbol.into(),
			name: symbol.into(),
			market_cap_usd: cap,
			volume_usd_24hr: volume,
			price_usd: 10.0,
			..Default::default()
		}
	}

	#[test]
	fn dominance_is_share_of_total_cap() {
		let assets = vec![asset("BTC", 600.0, 1.0), asset("ETH", 300.0, 2.0), asset("SOL", 100.0, 3.0)];
		let stats = market_stats(&assets);

		assert_eq!(stats.total_market_cap, 1000.0);
		assert_eq!(stats.total_volume_24hr, 6.0);
		assert_eq!(stats.btc.as_ref().unwrap().dominance, 60.0);
		assert_eq!(stats.eth.as_ref().unwrap().dominance, 30.0);
	}

	#[test]
	fn missing_coins_are_absent() {
		let stats = market_stats(&[asset("SOL", 100.0, 3.0)]);

		assert_eq!(stats.btc, None);
		assert_eq!(stats.eth, None);
	}

	#[test]
	fn empty_snapshot_has_zero_totals() {
		let stats = market_stats(&[]);

		assert_eq!(stats.total_market_cap, 0.0);
		assert!(stats.total_market_cap.is_sign_positive());
		assert_eq!(stats.total_market_cap_display, "$0");
		assert_eq!(stats.total_volume_24hr_display, "$0");
	}

	#[test]
	fn fallback_stats() {
		let stats = market_stats(&fallback::assets());
		let btc = stats.btc.unwrap();

		assert_eq!(btc.price_display, "$96,847.23");
		assert_eq!(btc.change_display, "+2.34%");
		assert_eq!(btc.dominance, 68.4);
		assert_eq!(stats.total_market_cap_display, "$2.76T");
	}
}
