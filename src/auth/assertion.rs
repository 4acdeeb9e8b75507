//! JWT-bearer assertion issuance.

// crates.io
use jsonwebtoken::{Algorithm, Header};
// self
use crate::{
	_prelude::*,
	auth::{Credentials, Secret},
	cache::{self, ASSERTION_KEY_PREFIX, Cache},
	error::AuthError,
};

/// Validity window written into every assertion.
pub const ASSERTION_LIFETIME: Duration = Duration::hours(1);

/// Claims carried by an assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
	/// Client id.
	pub iss: String,
	/// Service account.
	pub sub: String,
	/// Issued-at, seconds since the epoch.
	pub iat: i64,
	/// Expiry, seconds since the epoch.
	pub exp: i64,
}
impl AssertionClaims {
	/// Claims for `credentials` issued at `now`.
	pub fn new(credentials: &Credentials, now: OffsetDateTime) -> Self {
		let iat = now.unix_timestamp();

		Self {
			iss: credentials.client_id.clone(),
			sub: credentials.service_account.clone(),
			iat,
			exp: iat + ASSERTION_LIFETIME.whole_seconds(),
		}
	}
}

/// Signs RS256 assertions for one credential set, optionally memoizing them in a [`Cache`].
#[derive(Clone)]
pub struct AssertionIssuer {
	credentials: Arc<Credentials>,
	cache: Option<(Arc<dyn Cache>, Duration)>,
}
impl AssertionIssuer {
	/// Creates an issuer without caching.
	pub fn new(credentials: Arc<Credentials>) -> Self {
		Self { credentials, cache: None }
	}

	/// Serves assertions from `cache` for `ttl` after they are signed.
	pub fn with_cache(mut self, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
		self.cache = Some((cache, ttl));

		self
	}

	/// Cache key, derived from the service account.
	pub fn cache_key(&self) -> String {
		cache::cache_key(ASSERTION_KEY_PREFIX, &self.credentials.service_account)
	}

	/// Signs a fresh assertion issued at `now`.
	pub fn sign_at(&self, now: OffsetDateTime) -> Result<Secret, AuthError> {
		let claims = AssertionClaims::new(&self.credentials, now);
		let key = self.credentials.private_key.encoding_key()?;
		let token = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)?;

		Ok(Secret::new(token))
	}

	/// Returns a cached assertion when caching is enabled and one is live, else signs a new one.
	pub async fn assertion(&self) -> Result<Secret> {
		let Some((cache, ttl)) = &self.cache else {
			return Ok(self.sign_at(OffsetDateTime::now_utc())?);
		};
		let key = self.cache_key();

		if let Some(hit) = cache.get(&key).await? {
			return Ok(Secret::new(hit));
		}

		let assertion = self.sign_at(OffsetDateTime::now_utc())?;

		cache.put(&key, assertion.expose().to_owned(), *ttl).await?;

		Ok(assertion)
	}
}
impl Debug for AssertionIssuer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AssertionIssuer")
			.field("service_account", &self.credentials.service_account)
			.field("cached", &self.cache.is_some())
			.finish()
	}
}
