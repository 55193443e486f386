use crate::types::User;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod backend;
mod error;

pub use backend::BackendClient;
pub use error::ApiError;

/// Request-dispatch capability towards the tracker backend.
///
/// Injected wherever prices or authentication are needed so tests can
/// substitute a double.
#[async_trait]
pub trait CryptoApi {
	/// Fetches the current market records.
	/// Non-2xx statuses, `success: false` envelopes and missing data are all errors.
	async fn fetch_prices(&self) -> Result<Vec<CryptoPrice>, ApiError>;

	async fn login(&self, credentials: &LoginRequest) -> Result<User, ApiError>;

	async fn register(&self, user: &RegisterRequest) -> Result<User, ApiError>;
}

/// Envelope every backend endpoint answers with.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiResponse<T> {
	pub success: bool,
	pub data: Option<T>,
	pub message: Option<String>,
	pub count: Option<u64>,
}

impl<T> ApiResponse<T> {
	pub fn into_result(self) -> Result<T, ApiError> {
		if !self.success {
			return Err(ApiError::Payload(
				self.message.unwrap_or_else(|| "Backend reported failure".to_string()),
			))
		}
		self.data.ok_or_else(|| ApiError::Payload("Response carried no data".to_string()))
	}
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SparklineIn7d {
	#[serde(default)]
	pub price: Vec<f64>,
}

/// Price record as delivered by `GET /crypto/prices`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CryptoPrice {
	pub id: String,
	pub symbol: String,
	pub name: String,
	#[serde(default)]
	pub current_price: Option<f64>,
	#[serde(default)]
	pub market_cap: Option<f64>,
	#[serde(default)]
	pub market_cap_rank: Option<u32>,
	#[serde(default)]
	pub total_volume: Option<f64>,
	#[serde(default)]
	pub price_change_percentage_24h: Option<f64>,
	#[serde(default)]
	pub circulating_supply: Option<f64>,
	#[serde(default)]
	pub max_supply: Option<f64>,
	#[serde(default)]
	pub sparkline_in_7d: Option<SparklineIn7d>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
	pub username: String,
	pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
	pub username: String,
	pub email: String,
	pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthPayload {
	pub user: User,
}
