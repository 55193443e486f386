use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug)]
pub enum StoreError {
	Io(std::io::Error),
	Format(serde_json::Error),
}

impl Display for StoreError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			StoreError::Io(e) => write!(f, "State file I/O failed: {}", e),
			StoreError::Format(e) => write!(f, "State file is not valid JSON: {}", e),
		}
	}
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
	fn from(e: std::io::Error) -> Self {
		StoreError::Io(e)
	}
}

impl From<serde_json::Error> for StoreError {
	fn from(e: serde_json::Error) -> Self {
		StoreError::Format(e)
	}
}

/// Flat string key-value persistence. Values are overwritten and removed
/// whole; there is no schema versioning.
pub trait KeyValueStore: Send + Sync {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
	fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
	fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Keeps all keys in one JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
	path: PathBuf,
	lock: Mutex<()>,
}

impl FileStore {
	pub fn new(path: impl AsRef<Path>) -> Self {
		Self { path: path.as_ref().to_path_buf(), lock: Mutex::new(()) }
	}

	fn read(&self) -> Result<BTreeMap<String, String>, StoreError> {
		match std::fs::read_to_string(&self.path) {
			Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
			Ok(content) => Ok(serde_json::from_str(&content)?),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
			Err(e) => Err(e.into()),
		}
	}

	fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
		std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
		Ok(())
	}

	fn update<F>(&self, change: F) -> Result<(), StoreError>
	where
		F: FnOnce(&mut BTreeMap<String, String>),
	{
		let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		let mut entries = self.read()?;
		change(&mut entries);
		self.write(&entries)
	}
}

impl KeyValueStore for FileStore {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		Ok(self.read()?.remove(key))
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		self.update(|entries| {
			entries.insert(key.to_string(), value.to_string());
		})
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		self.update(|entries| {
			entries.remove(key);
		})
	}
}
