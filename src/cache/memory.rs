//! Thread-safe in-memory [`Cache`] implementation, the default store.

// self
use crate::{
	_prelude::*,
	cache::{Cache, CacheEntry, CacheError, CacheFuture},
};

type CacheMap = Arc<RwLock<HashMap<String, CacheEntry>>>;

/// In-process cache with per-entry expiry; expired entries are dropped lazily on access.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache(CacheMap);
impl MemoryCache {
	/// Number of entries currently held, including expired ones not yet evicted.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true when no entries are held.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn get_now(map: CacheMap, key: &str, now: OffsetDateTime) -> Option<String> {
		{
			let guard = map.read();

			match guard.get(key) {
				Some(entry) if entry.is_live_at(now) => return Some(entry.value.clone()),
				Some(_) => {},
				None => return None,
			}
		}

		let mut guard = map.write();

		if guard.get(key).is_some_and(|entry| !entry.is_live_at(now)) {
			guard.remove(key);
		}

		None
	}

	fn put_now(map: CacheMap, key: &str, value: String, ttl: Duration, now: OffsetDateTime) {
		map.write().insert(key.to_owned(), CacheEntry::new(value, ttl, now));
	}

	fn forget_now(map: CacheMap, key: &str) -> bool {
		map.write().remove(key).is_some()
	}
}
impl Cache for MemoryCache {
	fn has<'a>(&'a self, key: &'a str) -> CacheFuture<'a, bool> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::get_now(map, key, OffsetDateTime::now_utc()).is_some()) })
	}

	fn get<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::get_now(map, key, OffsetDateTime::now_utc())) })
	}

	fn put<'a>(&'a self, key: &'a str, value: String, ttl: Duration) -> CacheFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			Self::put_now(map, key, value, ttl, OffsetDateTime::now_utc());

			Ok::<_, CacheError>(())
		})
	}

	fn forget<'a>(&'a self, key: &'a str) -> CacheFuture<'a, bool> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::forget_now(map, key)) })
	}
}
