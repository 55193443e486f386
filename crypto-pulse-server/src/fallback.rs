use crate::history::synthetic_series;
use crate::types::AssetRecord;

const SPARKLINE_POINTS: usize = 24;

struct Seed {
	id: &'static str,
	symbol: &'static str,
	name: &'static str,
	supply: f64,
	max_supply: Option<f64>,
	market_cap_usd: f64,
	volume_usd_24hr: f64,
	price_usd: f64,
	change_percent_24hr: f64,
	vwap_24hr: f64,
	explorer: &'static str,
	volatility: f64,
}

const SEEDS: [Seed; 12] = [
	Seed {
		id: "bitcoin",
		symbol: "BTC",
		name: "Bitcoin",
		supply: 19_500_000.0,
		max_supply: Some(21_000_000.0),
		market_cap_usd: 1_890_000_000_000.0,
		volume_usd_24hr: 28_500_000_000.0,
		price_usd: 96847.23,
		change_percent_24hr: 2.34,
		vwap_24hr: 95234.56,
		explorer: "https://blockchain.info/",
		volatility: 0.03,
	},
	Seed {
		id: "ethereum",
		symbol: "ETH",
		name: "Ethereum",
		supply: 120_000_000.0,
		max_supply: None,
		market_cap_usd: 420_000_000_000.0,
		volume_usd_24hr: 15_800_000_000.0,
		price_usd: 3487.92,
		change_percent_24hr: -1.23,
		vwap_24hr: 3512.45,
		explorer: "https://etherscan.io/",
		volatility: 0.04,
	},
	Seed {
		id: "tether",
		symbol: "USDT",
		name: "Tether",
		supply: 92_000_000_000.0,
		max_supply: None,
		market_cap_usd: 92_000_000_000.0,
		volume_usd_24hr: 45_000_000_000.0,
		price_usd: 1.0001,
		change_percent_24hr: 0.01,
		vwap_24hr: 1.0,
		explorer: "https://www.omniexplorer.info/",
		volatility: 0.001,
	},
	Seed {
		id: "binance-coin",
		symbol: "BNB",
		name: "BNB",
		supply: 153_000_000.0,
		max_supply: Some(200_000_000.0),
		market_cap_usd: 98_000_000_000.0,
		volume_usd_24hr: 1_200_000_000.0,
		price_usd: 642.18,
		change_percent_24hr: 3.45,
		vwap_24hr: 628.90,
		explorer: "https://bscscan.com/",
		volatility: 0.05,
	},
	Seed {
		id: "solana",
		symbol: "SOL",
		name: "Solana",
		supply: 440_000_000.0,
		max_supply: None,
		market_cap_usd: 82_000_000_000.0,
		volume_usd_24hr: 3_200_000_000.0,
		price_usd: 186.42,
		change_percent_24hr: 5.67,
		vwap_24hr: 178.23,
		explorer: "https://explorer.solana.com/",
		volatility: 0.06,
	},
	Seed {
		id: "xrp",
		symbol: "XRP",
		name: "XRP",
		supply: 54_000_000_000.0,
		max_supply: Some(100_000_000_000.0),
		market_cap_usd: 68_000_000_000.0,
		volume_usd_24hr: 2_800_000_000.0,
		price_usd: 1.26,
		change_percent_24hr: -2.89,
		vwap_24hr: 1.32,
		explorer: "https://xrpcharts.ripple.com/",
		volatility: 0.07,
	},
	Seed {
		id: "cardano",
		symbol: "ADA",
		name: "Cardano",
		supply: 35_000_000_000.0,
		max_supply: Some(45_000_000_000.0),
		market_cap_usd: 35_000_000_000.0,
		volume_usd_24hr: 890_000_000.0,
		price_usd: 0.98,
		change_percent_24hr: 1.12,
		vwap_24hr: 0.96,
		explorer: "https://cardanoscan.io/",
		volatility: 0.05,
	},
	Seed {
		id: "dogecoin",
		symbol: "DOGE",
		name: "Dogecoin",
		supply: 142_000_000_000.0,
		max_supply: None,
		market_cap_usd: 28_000_000_000.0,
		volume_usd_24hr: 1_500_000_000.0,
		price_usd: 0.197,
		change_percent_24hr: 8.45,
		vwap_24hr: 0.185,
		explorer: "https://dogechain.info/",
		volatility: 0.08,
	},
	Seed {
		id: "avalanche",
		symbol: "AVAX",
		name: "Avalanche",
		supply: 395_000_000.0,
		max_supply: Some(720_000_000.0),
		market_cap_usd: 18_000_000_000.0,
		volume_usd_24hr: 620_000_000.0,
		price_usd: 45.67,
		change_percent_24hr: -0.78,
		vwap_24hr: 46.12,
		explorer: "https://snowtrace.io/",
		volatility: 0.06,
	},
	Seed {
		id: "polkadot",
		symbol: "DOT",
		name: "Polkadot",
		supply: 1_400_000_000.0,
		max_supply: None,
		market_cap_usd: 12_000_000_000.0,
		volume_usd_24hr: 380_000_000.0,
		price_usd: 8.56,
		change_percent_24hr: 4.23,
		vwap_24hr: 8.21,
		explorer: "https://polkascan.io/",
		volatility: 0.05,
	},
	Seed {
		id: "chainlink",
		symbol: "LINK",
		name: "Chainlink",
		supply: 608_000_000.0,
		max_supply: Some(1_000_000_000.0),
		market_cap_usd: 10_500_000_000.0,
		volume_usd_24hr: 520_000_000.0,
		price_usd: 17.28,
		change_percent_24hr: 2.87,
		vwap_24hr: 16.89,
		explorer: "https://etherscan.io/",
		volatility: 0.05,
	},
	Seed {
		id: "polygon",
		symbol: "MATIC",
		name: "Polygon",
		supply: 10_000_000_000.0,
		max_supply: Some(10_000_000_000.0),
		market_cap_usd: 9_200_000_000.0,
		volume_usd_24hr: 410_000_000.0,
		price_usd: 0.92,
		change_percent_24hr: -1.56,
		vwap_24hr: 0.95,
		explorer: "https://polygonscan.com/",
		volatility: 0.06,
	},
];

/// The built-in dataset shown whenever the backend cannot be reached.
/// Always identical between calls, ranked 1..=12.
pub fn assets() -> Vec<AssetRecord> {
	SEEDS
		.iter()
		.enumerate()
		.map(|(index, seed)| {
			let rank = index as u32 + 1;
			AssetRecord {
				id: seed.id.into(),
				rank,
				symbol: seed.symbol.into(),
				name: seed.name.into(),
				supply: seed.supply,
				max_supply: seed.max_supply,
				market_cap_usd: seed.market_cap_usd,
				volume_usd_24hr: seed.volume_usd_24hr,
				price_usd: seed.price_usd,
				change_percent_24hr: seed.change_percent_24hr,
				vwap_24hr: seed.vwap_24hr,
				explorer: seed.explorer.to_string(),
				sparkline: synthetic_series(seed.price_usd, seed.volatility, SPARKLINE_POINTS, rank),
			}
		})
		.collect()
}
