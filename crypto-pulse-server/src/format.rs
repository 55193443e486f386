//! Display formatting for currency magnitudes, prices and percentages.

/// Compact USD amount: trillions, billions and millions get a suffix,
/// anything smaller is written out with thousands separators.
pub fn format_currency(value: f64) -> String {
	if value >= 1e12 {
		format!("${:.2}T", value / 1e12)
	} else if value >= 1e9 {
		format!("${:.2}B", value / 1e9)
	} else if value >= 1e6 {
		format!("${:.2}M", value / 1e6)
	} else {
		format!("${}", group_thousands(&trim_fraction(format!("{:.3}", value))))
	}
}

/// Unit price with precision growing as the price shrinks.
pub fn format_price(value: f64) -> String {
	if value >= 1000.0 {
		format!("${}", group_thousands(&format!("{:.2}", value)))
	} else if value >= 1.0 {
		format!("${:.2}", value)
	} else if value >= 0.01 {
		format!("${:.4}", value)
	} else {
		format!("${:.6}", value)
	}
}

pub fn format_percent(value: f64) -> String {
	format!("{:+.2}%", value)
}

fn trim_fraction(number: String) -> String {
	if !number.contains('.') {
		return number
	}
	match number.trim_end_matches('0').trim_end_matches('.') {
		"-0" => "0".to_string(),
		trimmed => trimmed.to_string(),
	}
}

fn group_thousands(number: &str) -> String {
	let (sign, unsigned) = match number.strip_prefix('-') {
		Some(rest) => ("-", rest),
		None => ("", number),
	};
	let (integer, fraction) = match unsigned.split_once('.') {
		Some((integer, fraction)) => (integer, Some(fraction)),
		None => (unsigned, None),
	};

	let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
	for (i, digit) in integer.chars().enumerate() {
		if i > 0 && (integer.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(digit);
	}

	match fraction {
		Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
		None => format!("{}{}", sign, grouped),
	}
}
