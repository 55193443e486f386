use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
	/// The request never completed or the backend answered with a non-2xx status.
	Network(String),
	/// The backend answered, but the envelope reported failure or carried no data.
	Payload(String),
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			ApiError::Network(msg) => write!(f, "Network failure: {}", msg),
			ApiError::Payload(msg) => write!(f, "Payload failure: {}", msg),
		}
	}
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
	fn from(e: reqwest::Error) -> Self {
		if e.is_decode() {
			ApiError::Payload(format!("Could not decode backend response: {}", e))
		} else {
			ApiError::Network(format!("Failed to send request: {}", e))
		}
	}
}
