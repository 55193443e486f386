use std::cmp::Ordering;

use crate::types::{AssetRecord, SortDirection, SortField, SortSpec};

/// Produces the displayed sequence: the filter is applied first, then a stable sort.
///
/// Pure: the same snapshot, sort and term always give the same output.
pub fn apply(snapshot: &[AssetRecord], sort: SortSpec, filter_term: &str) -> Vec<AssetRecord> {
	let mut assets = filter(snapshot, filter_term);
	sort_assets(&mut assets, sort);
	assets
}

/// Case-insensitive substring match against name or symbol.
/// An empty term keeps everything in its original order.
pub fn filter(snapshot: &[AssetRecord], term: &str) -> Vec<AssetRecord> {
	let term = term.to_lowercase();
	if term.is_empty() {
		return snapshot.to_vec()
	}

	snapshot
		.iter()
		.filter(|asset| {
			asset.name.to_lowercase().contains(&term) || asset.symbol.to_lowercase().contains(&term)
		})
		.cloned()
		.collect()
}

/// Stable sort; equal keys keep their relative order in both directions.
pub fn sort_assets(assets: &mut [AssetRecord], sort: SortSpec) {
	assets.sort_by(|a, b| {
		let ordering = compare(a, b, sort.field);
		match sort.direction {
			SortDirection::Asc => ordering,
			SortDirection::Desc => ordering.reverse(),
		}
	});
}

fn compare(a: &AssetRecord, b: &AssetRecord, field: SortField) -> Ordering {
	match field {
		SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
		SortField::Rank => a.rank.cmp(&b.rank),
		_ => compare_numbers(numeric_value(a, field), numeric_value(b, field)),
	}
}

fn numeric_value(asset: &AssetRecord, field: SortField) -> f64 {
	match field {
		SortField::Rank => asset.rank as f64,
		SortField::PriceUsd => asset.price_usd,
		SortField::ChangePercent24Hr => asset.change_percent_24hr,
		SortField::VolumeUsd24Hr => asset.volume_usd_24hr,
		SortField::MarketCapUsd => asset.market_cap_usd,
		SortField::Name => f64::NAN,
	}
}

/// Malformed values (NaN) order as the numeric minimum.
fn compare_numbers(a: f64, b: f64) -> Ordering {
	let normalize = |v: f64| if v.is_nan() { f64::NEG_INFINITY } else { v };
	normalize(a).partial_cmp(&normalize(b)).unwrap_or(Ordering::Equal)
}
