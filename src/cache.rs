//! Cache contract for assertions and bearer tokens plus the built-in stores.

pub mod file;
pub mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, error::ConfigError};

/// Key prefix for cached assertions, keyed by service account.
pub const ASSERTION_KEY_PREFIX: &str = "lineworks_jwt_token_";
/// Key prefix for cached bearer tokens, keyed by client id.
pub const ACCESS_TOKEN_KEY_PREFIX: &str = "lineworks_access_token_";

/// Boxed future returned by [`Cache`] implementations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Key/value cache collaborator with per-entry time-to-live.
///
/// Implementations treat each call as atomic; the client never performs read-modify-write
/// sequences against a store.
pub trait Cache
where
	Self: Send + Sync,
{
	/// Returns true when a live entry exists for `key`.
	fn has<'a>(&'a self, key: &'a str) -> CacheFuture<'a, bool>;

	/// Fetches the live value stored under `key`.
	fn get<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>>;

	/// Stores `value` under `key` for `ttl`.
	fn put<'a>(&'a self, key: &'a str, value: String, ttl: Duration) -> CacheFuture<'a, ()>;

	/// Removes the entry stored under `key`, returning whether one existed.
	fn forget<'a>(&'a self, key: &'a str) -> CacheFuture<'a, bool>;
}

/// Error type produced by [`Cache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Stored value plus its expiry instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
	/// Cached payload.
	pub value: String,
	/// Instant after which the entry is ignored.
	#[serde(with = "time::serde::timestamp")]
	pub expires_at: OffsetDateTime,
}
impl CacheEntry {
	/// Builds an entry that expires `ttl` after `now`.
	pub fn new(value: String, ttl: Duration, now: OffsetDateTime) -> Self {
		Self { value, expires_at: now + ttl }
	}

	/// Returns true while the entry is still within its TTL.
	pub fn is_live_at(&self, now: OffsetDateTime) -> bool {
		self.expires_at > now
	}
}

/// Registry of cache stores: one default plus optional named stores.
#[derive(Clone)]
pub struct CacheStores {
	default: Arc<dyn Cache>,
	named: HashMap<String, Arc<dyn Cache>>,
}
impl CacheStores {
	/// Creates a registry around the default store.
	pub fn new(default: Arc<dyn Cache>) -> Self {
		Self { default, named: HashMap::new() }
	}

	/// Registers a named store.
	pub fn with_store(mut self, name: impl Into<String>, store: Arc<dyn Cache>) -> Self {
		self.named.insert(name.into(), store);

		self
	}

	/// Resolves a store by name; `None` selects the default store.
	pub fn select(&self, name: Option<&str>) -> Result<Arc<dyn Cache>, ConfigError> {
		match name {
			None => Ok(self.default.clone()),
			Some(name) => self
				.named
				.get(name)
				.cloned()
				.ok_or_else(|| ConfigError::UnknownCacheStore { store: name.into() }),
		}
	}
}
impl Default for CacheStores {
	fn default() -> Self {
		Self::new(Arc::new(MemoryCache::default()))
	}
}
impl Debug for CacheStores {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut names = self.named.keys().collect::<Vec<_>>();

		names.sort();

		f.debug_struct("CacheStores").field("named", &names).finish()
	}
}

/// Builds a cache key from a prefix and the URL-safe SHA-256 digest of `identity`.
pub fn cache_key(prefix: &str, identity: &str) -> String {
	let digest = Sha256::digest(identity.as_bytes());

	format!("{prefix}{}", URL_SAFE_NO_PAD.encode(digest))
}
