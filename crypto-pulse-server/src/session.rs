use arc_swap::ArcSwapOption;
use log::{error, info};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::api::{ApiError, CryptoApi, LoginRequest, RegisterRequest};
use crate::store::{KeyValueStore, StoreError};
use crate::types::User;

pub const USER_KEY: &str = "crypto-tracker-user";

#[derive(Debug)]
pub enum SessionError {
	Api(ApiError),
	Store(StoreError),
}

impl Display for SessionError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			SessionError::Api(e) => write!(f, "{}", e),
			SessionError::Store(e) => write!(f, "{}", e),
		}
	}
}

impl std::error::Error for SessionError {}

impl From<ApiError> for SessionError {
	fn from(e: ApiError) -> Self {
		SessionError::Api(e)
	}
}

impl From<StoreError> for SessionError {
	fn from(e: StoreError) -> Self {
		SessionError::Store(e)
	}
}

/// The authenticated user, mirrored to a single persisted key.
pub struct Session {
	store: Arc<dyn KeyValueStore>,
	user: ArcSwapOption<User>,
}

impl Session {
	/// Loads a previously stored user. An entry that no longer parses is removed.
	pub fn restore(store: Arc<dyn KeyValueStore>) -> Self {
		let user = match store.get(USER_KEY) {
			Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
				Ok(user) => Some(Arc::new(user)),
				Err(e) => {
					error!("Error parsing stored user data: {}", e);
					if let Err(e) = store.remove(USER_KEY) {
						error!("Could not remove stored user data: {}", e);
					}
					None
				},
			},
			Ok(None) => None,
			Err(e) => {
				error!("Could not read stored user data: {}", e);
				None
			},
		};

		Self { store, user: ArcSwapOption::new(user) }
	}

	pub fn user(&self) -> Option<User> {
		self.user.load_full().map(|user| user.as_ref().clone())
	}

	pub fn is_authenticated(&self) -> bool {
		self.user.load().is_some()
	}

	pub async fn login<A>(&self, api: &A, credentials: &LoginRequest) -> Result<User, SessionError>
	where
		A: CryptoApi + Send + Sync + ?Sized,
	{
		let user = api.login(credentials).await?;
		self.install(user)
	}

	pub async fn register<A>(&self, api: &A, request: &RegisterRequest) -> Result<User, SessionError>
	where
		A: CryptoApi + Send + Sync + ?Sized,
	{
		let user = api.register(request).await?;
		self.install(user)
	}

	pub fn logout(&self) -> Result<(), SessionError> {
		self.store.remove(USER_KEY)?;
		self.user.store(None);
		info!("User logged out");
		Ok(())
	}

	fn install(&self, user: User) -> Result<User, SessionError> {
		let raw = serde_json::to_string(&user).map_err(StoreError::from)?;
		self.store.set(USER_KEY, &raw)?;
		self.user.store(Some(Arc::new(user.clone())));
		info!("User {} signed in", user.username);
		Ok(user)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::price_updater::tests::MockBackend;
	use crate::store::FileStore;

	fn file_store(dir: &tempfile::TempDir) -> Arc<dyn KeyValueStore> {
		Arc::new(FileStore::new(dir.path().join("state.json")))
	}

	#[tokio::test]
	async fn login_persists_user() {
		let dir = tempfile::tempdir().unwrap();
		let api = MockBackend::new(vec![]);
		let session = Session::restore(file_store(&dir));
		assert!(!session.is_authenticated());

		let credentials = LoginRequest { username: "alice".into(), password: "secret".into() };
		let user = session.login(&api, &credentials).await.unwrap();
		assert_eq!(user.role.as_deref(), Some("USER"));

		let restored = Session::restore(file_store(&dir));
		assert_eq!(restored.user(), Some(user));
	}

	#[tokio::test]
	async fn rejected_login_stores_nothing() {
		let dir = tempfile::tempdir().unwrap();
		let api = MockBackend::new(vec![]);
		let session = Session::restore(file_store(&dir));

		let credentials = LoginRequest { username: "alice".into(), password: "wrong".into() };
		let result = session.login(&api, &credentials).await;

		assert!(matches!(result, Err(SessionError::Api(ApiError::Payload(_)))));
		assert!(!session.is_authenticated());
		assert_eq!(file_store(&dir).get(USER_KEY).unwrap(), None);
	}

	#[tokio::test]
	async fn register_then_logout_clears_key() {
		let dir = tempfile::tempdir().unwrap();
		let api = MockBackend::new(vec![]);
		let session = Session::restore(file_store(&dir));

		let request = RegisterRequest {
			username: "bob".into(),
			email: "bob@example.com".into(),
			password: "pw".into(),
		};
		session.register(&api, &request).await.unwrap();
		assert!(session.is_authenticated());

		session.logout().unwrap();
		assert_eq!(session.user(), None);
		assert_eq!(file_store(&dir).get(USER_KEY).unwrap(), None);
	}

	/// Accepts writes but fails every removal.
	struct StickyStore(FileStore);

	impl KeyValueStore for StickyStore {
		fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
			self.0.get(key)
		}

		fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
			self.0.set(key, value)
		}

		fn remove(&self, _key: &str) -> Result<(), StoreError> {
			Err(StoreError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only")))
		}
	}

	#[tokio::test]
	async fn failed_logout_keeps_session_consistent() {
		let dir = tempfile::tempdir().unwrap();
		let store: Arc<dyn KeyValueStore> =
			Arc::new(StickyStore(FileStore::new(dir.path().join("state.json"))));
		let session = Session::restore(Arc::clone(&store));
		let credentials = LoginRequest { username: "alice".into(), password: "secret".into() };
		session.login(&MockBackend::new(vec![]), &credentials).await.unwrap();

		assert!(matches!(session.logout(), Err(SessionError::Store(_))));
		assert!(session.is_authenticated());
		assert!(store.get(USER_KEY).unwrap().is_some());
	}

	#[test]
	fn unparsable_user_is_dropped() {
		let dir = tempfile::tempdir().unwrap();
		let store = file_store(&dir);
		store.set(USER_KEY, "{broken").unwrap();

		let session = Session::restore(Arc::clone(&store));

		assert_eq!(session.user(), None);
		assert_eq!(store.get(USER_KEY).unwrap(), None);
	}
}
