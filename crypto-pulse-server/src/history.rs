use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Chart window selectable for an asset's price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInterval {
	#[serde(rename = "1H")]
	OneHour,
	#[serde(rename = "24H")]
	OneDay,
	#[serde(rename = "7D")]
	OneWeek,
	#[serde(rename = "30D")]
	OneMonth,
}

impl Default for TimeInterval {
	fn default() -> Self {
		TimeInterval::OneDay
	}
}

impl TimeInterval {
	/// Number of steps back from now; the series holds one more point than this.
	pub fn steps(&self) -> usize {
		match self {
			TimeInterval::OneHour => 60,
			TimeInterval::OneDay => 96,
			TimeInterval::OneWeek => 168,
			TimeInterval::OneMonth => 180,
		}
	}

	pub fn step(&self) -> Duration {
		match self {
			TimeInterval::OneHour => Duration::minutes(1),
			TimeInterval::OneDay => Duration::minutes(15),
			TimeInterval::OneWeek => Duration::hours(1),
			TimeInterval::OneMonth => Duration::hours(4),
		}
	}

	pub fn volatility(&self) -> f64 {
		match self {
			TimeInterval::OneHour => 0.002,
			TimeInterval::OneDay => 0.01,
			TimeInterval::OneWeek | TimeInterval::OneMonth => 0.03,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
	pub price_usd: f64,
	pub time: DateTime<Utc>,
}

/// Shape of a deterministic price walk, as fractions of the base price.
#[derive(Debug, Clone, Copy)]
struct Walk {
	start: f64,
	low: f64,
	high: f64,
	/// Added to every step's swing; positive values drift upwards.
	drift: f64,
}

const SPARKLINE_WALK: Walk = Walk { start: 0.0, low: 0.8, high: 1.2, drift: 0.0 };
const HISTORY_WALK: Walk = Walk { start: 0.95, low: 0.7, high: 1.3, drift: 0.02 };

fn walk(base: f64, volatility: f64, points: usize, seed: u32, shape: Walk) -> Vec<f64> {
	if points == 0 {
		return Vec::new()
	}

	// A negative base flips the bounds, so order them before bounding.
	let (low, high) = {
		let (a, b) = (base * shape.low, base * shape.high);
		(a.min(b), a.max(b))
	};
	let phase = seed as f64 * 0.618;
	let mut price = base * shape.start;
	let mut series: Vec<f64> = (0..points)
		.map(|i| {
			let t = i as f64;
			let swing = ((t * 0.9 + phase).sin() + (t * 0.37 + phase * 2.0).cos()) / 4.0 + shape.drift;
			price = (price + swing * volatility * base).max(low).min(high);
			price
		})
		.collect();

	if let Some(last) = series.last_mut() {
		*last = base;
	}
	series
}

/// A bounded, deterministic walk of `points` samples around `base`,
/// ending exactly on `base`. Samples stay within 80%..120% of `base`.
pub fn synthetic_series(base: f64, volatility: f64, points: usize, seed: u32) -> Vec<f64> {
	walk(base, volatility, points, seed, Walk { start: 1.0 - volatility, ..SPARKLINE_WALK })
}

/// Price history ending at `now` with the current price as its last point.
/// Starts near 95% of the current price, drifts slightly upwards and stays
/// within 70%..130% of it.
pub fn price_history(
	base: f64,
	interval: TimeInterval,
	now: DateTime<Utc>,
	seed: u32,
) -> Vec<PricePoint> {
	let steps = interval.steps();
	walk(base, interval.volatility(), steps + 1, seed, HISTORY_WALK)
		.into_iter()
		.enumerate()
		.map(|(i, price_usd)| PricePoint {
			price_usd,
			time: now - interval.step() * (steps - i) as i32,
		})
		.collect()
}

/// Percentage move from the first to the last sample; 0 when undefined.
pub fn percent_change(samples: &[f64]) -> f64 {
	match (samples.first(), samples.last()) {
		(Some(first), Some(last)) if samples.len() >= 2 && *first != 0.0 =>
			(last - first) / first * 100.0,
		_ => 0.0,
	}
}
