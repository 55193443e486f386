use serde::Serialize;

pub const DEFAULT_WIDTH: f64 = 96.0;
pub const DEFAULT_HEIGHT: f64 = 32.0;

/// Vertical inset, in drawing units, kept free above and below the line.
const INSET: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

/// Maps samples onto a `width` x `height` box: index runs linearly along x,
/// the min/max of the series span the box vertically minus the inset.
pub fn points(samples: &[f64], width: f64, height: f64) -> Vec<Point> {
	if samples.len() < 2 {
		return Vec::new()
	}

	let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
	let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
	let range = if max - min == 0.0 { 1.0 } else { max - min };
	let last_index = (samples.len() - 1) as f64;

	samples
		.iter()
		.enumerate()
		.map(|(index, value)| Point {
			x: index as f64 / last_index * width,
			y: height - (value - min) / range * (height - 2.0 * INSET) - INSET,
		})
		.collect()
}

/// SVG path data for the line: `M x,y L x,y ...`.
/// Fewer than two samples draw nothing and yield an empty string.
pub fn to_path(samples: &[f64], width: f64, height: f64) -> String {
	let points = points(samples, width, height);
	if points.is_empty() {
		return String::new()
	}

	let joined = points
		.iter()
		.map(|p| format!("{},{}", p.x, p.y))
		.collect::<Vec<_>>()
		.join(" L ");
	format!("M {}", joined)
}

/// The line closed down to the bottom edge, used for the gradient fill.
pub fn to_area_path(samples: &[f64], width: f64, height: f64) -> String {
	let line = to_path(samples, width, height);
	if line.is_empty() {
		return line
	}
	format!("{line} L {w},{h} L 0,{h} Z", line = line, w = width, h = height)
}

/// Where the end-point dot goes.
pub fn end_point(samples: &[f64], width: f64, height: f64) -> Option<Point> {
	points(samples, width, height).last().copied()
}
