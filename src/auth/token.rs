//! Bearer token acquisition through the JWT-bearer grant, with caching and optional
//! single-flight.
//!
//! [`TokenManager::token`] first consults the cache (keyed by client id); the cache TTL is the
//! only expiry authority, so a hit is returned without inspecting the token. On a miss the
//! manager signs (or reuses) an assertion, posts it to the token endpoint, and stores the
//! resulting token. Concurrent callers on a cold cache may each perform an exchange unless
//! single-flight is enabled, in which case they queue behind one async mutex and re-check the
//! cache before exchanging.

// crates.io
use serde::{Deserializer, de::Error as DeError};
// self
use crate::{
	_prelude::*,
	auth::{AssertionIssuer, Credentials, Secret},
	cache::{self, ACCESS_TOKEN_KEY_PREFIX, Cache},
	error::AuthError,
	http::{self, ReqwestHttpClient},
	obs::{self, LogSink, OpKind},
};

/// Grant type URI for the JWT-bearer exchange.
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Successful token endpoint payload.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
	/// Bearer token.
	pub access_token: Secret,
	/// Token type, normally `Bearer`.
	#[serde(default)]
	pub token_type: Option<String>,
	/// Lifetime in seconds as reported by the endpoint.
	#[serde(default, deserialize_with = "lenient_seconds")]
	pub expires_in: Option<i64>,
	/// Granted scope.
	#[serde(default)]
	pub scope: Option<String>,
}

/// Produces bearer tokens for one credential set.
#[derive(Clone)]
pub struct TokenManager {
	credentials: Arc<Credentials>,
	issuer: AssertionIssuer,
	http_client: ReqwestHttpClient,
	token_url: Url,
	cache: Option<(Arc<dyn Cache>, Duration)>,
	single_flight: Option<Arc<AsyncMutex<()>>>,
	log: LogSink,
}
impl TokenManager {
	/// Creates a manager with caching, single-flight, and logging disabled.
	pub fn new(credentials: Arc<Credentials>, http_client: ReqwestHttpClient, token_url: Url) -> Self {
		Self {
			issuer: AssertionIssuer::new(credentials.clone()),
			credentials,
			http_client,
			token_url,
			cache: None,
			single_flight: None,
			log: LogSink::disabled(),
		}
	}

	/// Caches both assertions and bearer tokens in `cache` for `ttl`.
	pub fn with_cache(mut self, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
		self.issuer = self.issuer.with_cache(cache.clone(), ttl);
		self.cache = Some((cache, ttl));

		self
	}

	/// Serializes the cache-miss path so concurrent callers share one exchange.
	pub fn with_single_flight(mut self, enabled: bool) -> Self {
		self.single_flight = enabled.then(|| Arc::new(AsyncMutex::new(())));

		self
	}

	/// Routes diagnostics through `log`.
	pub fn with_log_sink(mut self, log: LogSink) -> Self {
		self.log = log;

		self
	}

	/// Cache key for bearer tokens, derived from the client id.
	pub fn cache_key(&self) -> String {
		cache::cache_key(ACCESS_TOKEN_KEY_PREFIX, &self.credentials.client_id)
	}

	/// Assertion issuer used for exchanges.
	pub fn issuer(&self) -> &AssertionIssuer {
		&self.issuer
	}

	/// Returns a usable bearer token, from cache when possible.
	pub async fn token(&self) -> Result<Secret> {
		if let Some(hit) = self.cached().await? {
			return Ok(hit);
		}

		let _singleflight = match &self.single_flight {
			Some(guard) => {
				let lock = guard.lock().await;

				if let Some(hit) = self.cached().await? {
					return Ok(hit);
				}

				Some(lock)
			},
			None => None,
		};
		let response = self.exchange().await?;

		if let Some((cache, ttl)) = &self.cache {
			cache.put(&self.cache_key(), response.access_token.expose().to_owned(), *ttl).await?;
		}

		Ok(response.access_token)
	}

	/// Drops the cached bearer token, forcing the next [`TokenManager::token`] to exchange.
	pub async fn forget(&self) -> Result<bool> {
		match &self.cache {
			Some((cache, _)) => Ok(cache.forget(&self.cache_key()).await?),
			None => Ok(false),
		}
	}

	/// Performs one token endpoint exchange, bypassing the bearer-token cache.
	pub async fn exchange(&self) -> Result<TokenResponse> {
		obs::observe(OpKind::TokenExchange, "exchange", async move {
			let assertion = self.issuer.assertion().await?;
			let scope = self.credentials.scope.normalized();
			let form = [
				("assertion", assertion.expose()),
				("grant_type", JWT_BEARER_GRANT),
				("client_id", self.credentials.client_id.as_str()),
				("client_secret", self.credentials.client_secret.expose()),
				("scope", scope.as_str()),
			];

			self.log.debug(
				"Requesting access token",
				serde_json::json!({
					"client_id": self.credentials.client_id,
					"scope": scope,
					"token_url": self.token_url.as_str(),
				}),
			);

			let result = self.post_form(&form).await;

			match &result {
				Ok(response) => self.log.debug(
					"Access token obtained",
					serde_json::json!({
						"token_type": response.token_type,
						"expires_in": response.expires_in,
					}),
				),
				Err(e) => self.log.error(
					"Failed to get access token",
					serde_json::json!({ "message": e.to_string(), "status": e.status() }),
				),
			}

			Ok(result?)
		})
		.await
	}

	async fn cached(&self) -> Result<Option<Secret>> {
		let Some((cache, _)) = &self.cache else {
			return Ok(None);
		};

		Ok(cache.get(&self.cache_key()).await?.map(Secret::new))
	}

	async fn post_form(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
		let response = self
			.http_client
			.post(self.token_url.clone())
			.form(form)
			.send()
			.await
			.map_err(|source| AuthError::Transport { status: None, source })?;
		let status = response.status().as_u16();
		let bytes = response
			.bytes()
			.await
			.map_err(|source| AuthError::Transport { status: Some(status), source })?;
		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
		let body = match serde_path_to_error::deserialize::<_, Json>(&mut deserializer) {
			Ok(body) => body,
			Err(_) if !(200..300).contains(&status) => {
				return Err(AuthError::TokenEndpoint {
					message: http::error_message(None, status),
					status,
					body: None,
				});
			},
			Err(source) => return Err(AuthError::ResponseParse { source, status }),
		};

		if !(200..300).contains(&status) {
			return Err(AuthError::TokenEndpoint {
				message: http::error_message(Some(&body), status),
				status,
				body: Some(body),
			});
		}
		if !body.get("access_token").and_then(Json::as_str).is_some_and(|token| !token.is_empty())
		{
			return Err(AuthError::MissingAccessToken { status, body });
		}

		serde_path_to_error::deserialize(body)
			.map_err(|source| AuthError::ResponseParse { source, status })
	}
}
impl Debug for TokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("client_id", &self.credentials.client_id)
			.field("token_url", &self.token_url.as_str())
			.field("cached", &self.cache.is_some())
			.field("single_flight", &self.single_flight.is_some())
			.finish()
	}
}

fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	match Option::<Json>::deserialize(deserializer)? {
		None | Some(Json::Null) => Ok(None),
		Some(Json::Number(n)) =>
			n.as_i64().map(Some).ok_or_else(|| DeError::custom("expires_in out of range")),
		Some(Json::String(s)) => s.trim().parse().map(Some).map_err(DeError::custom),
		Some(other) => Err(DeError::custom(format!("unexpected expires_in value {other}"))),
	}
}
