use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{
	ApiError, ApiResponse, AuthPayload, CryptoApi, CryptoPrice, LoginRequest, RegisterRequest,
};
use crate::args::BackendConfig;
use crate::types::User;

/// Tracker backend network client
pub struct BackendClient {
	host: String,
	test_mode: bool,
	inner: reqwest::Client,
}

impl BackendClient {
	pub fn new_from_config(config: BackendConfig) -> Result<Self, ApiError> {
		Self::new(config.api_url, config.test_mode)
	}

	pub fn new(host: String, test_mode: bool) -> Result<Self, ApiError> {
		let mut headers = reqwest::header::HeaderMap::new();
		headers.insert("accept", reqwest::header::HeaderValue::from_static("application/json"));

		let inner = reqwest::Client::builder()
			.default_headers(headers)
			.build()
			.map_err(|e| ApiError::Network(e.to_string()))?;

		Ok(Self { host: host.trim_end_matches('/').to_string(), test_mode, inner })
	}

	/// Test mode routes every call to the backend's in-memory `/test` controllers.
	fn endpoint(&self, path: &str) -> String {
		if self.test_mode {
			format!("/test{}", path)
		} else {
			path.to_string()
		}
	}

	fn url(&self, endpoint: &str) -> Result<reqwest::Url, ApiError> {
		reqwest::Url::parse(format!("{host}{ep}", host = self.host, ep = endpoint).as_str())
			.map_err(|e| ApiError::Network(format!("Invalid backend URL: {}", e)))
	}

	async fn read<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ApiError> {
		if !response.status().is_success() {
			let status = response.status();
			let body = response.text().await.unwrap_or_else(|_| "Unknown".to_string());
			return Err(ApiError::Network(format!(
				"HTTP error! status: {} {}",
				status.as_u16(),
				body.trim()
			)))
		}

		let result = response.json().await;
		result.map_err(|e| ApiError::Payload(format!("Could not decode backend response: {}", e)))
	}

	async fn get<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ApiError> {
		let response = self.inner.get(self.url(endpoint)?).send().await?;
		Self::read(response).await
	}

	async fn post<B: Serialize + Sync, R: DeserializeOwned>(
		&self,
		endpoint: &str,
		body: &B,
	) -> Result<R, ApiError> {
		let response = self.inner.post(self.url(endpoint)?).json(body).send().await?;
		Self::read(response).await
	}

	/// Check backend status
	pub async fn health(&self) -> Result<String, ApiError> {
		let response = self.inner.get(self.url("/health")?).send().await?;
		if !response.status().is_success() {
			return Err(ApiError::Network(format!("HTTP error! status: {}", response.status())))
		}
		Ok(response.text().await?)
	}
}

#[async_trait]
impl CryptoApi for BackendClient {
	async fn fetch_prices(&self) -> Result<Vec<CryptoPrice>, ApiError> {
		let response: ApiResponse<Vec<CryptoPrice>> =
			self.get(&self.endpoint("/crypto/prices")).await?;
		response.into_result()
	}

	async fn login(&self, credentials: &LoginRequest) -> Result<User, ApiError> {
		let response: ApiResponse<AuthPayload> =
			self.post(&self.endpoint("/auth/login"), credentials).await?;
		Ok(response.into_result()?.user)
	}

	async fn register(&self, user: &RegisterRequest) -> Result<User, ApiError> {
		let response: ApiResponse<AuthPayload> =
			self.post(&self.endpoint("/auth/register"), user).await?;
		Ok(response.into_result()?.user)
	}
}
