//! Authenticated transport for one configured bot.
//!
//! [`LineWorksClient`] resolves a bearer token through its [`TokenManager`] on every call,
//! attaches it as `Authorization: Bearer <token>`, sends JSON against the versioned API base,
//! and maps non-2xx statuses to [`ApiError::Status`]. Resource clients in [`crate::bot`] build
//! paths and bodies on top of it.

// crates.io
use reqwest::{
	Method, RequestBuilder, Response,
	header::{CONTENT_TYPE, LOCATION},
	multipart::Form,
};
// self
use crate::{
	_prelude::*,
	auth::{Credentials, Secret, TokenManager},
	bot::BotClient,
	cache::{Cache, CacheStores},
	config::Settings,
	error::ApiError,
	http::{self, ReqwestHttpClient},
	id::{BotId, DomainId},
	obs::{self, LogSink, Logger, OpKind},
};

/// Decoded non-JSON payload from an external download location.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// Final URL that served the payload.
	pub url: String,
	/// `Content-Type` header, when present.
	pub content_type: Option<String>,
	/// Raw body.
	pub body: Vec<u8>,
}

/// Authenticated LINE WORKS API transport bound to one bot.
///
/// Cloning is cheap; clones share the token manager and HTTP connection pool.
#[derive(Clone, Debug)]
pub struct LineWorksClient(Arc<ClientInner>);
#[derive(Debug)]
struct ClientInner {
	bot_name: String,
	credentials: Arc<Credentials>,
	base_url: Url,
	http_client: ReqwestHttpClient,
	tokens: TokenManager,
	log: LogSink,
}
impl LineWorksClient {
	/// Builds a client for `bot_name` with default collaborators.
	pub fn new(bot_name: impl Into<String>, settings: &Settings) -> Result<Self> {
		Self::builder(bot_name, settings).build()
	}

	/// Starts a builder for `bot_name`.
	pub fn builder(bot_name: impl Into<String>, settings: &Settings) -> LineWorksClientBuilder<'_> {
		LineWorksClientBuilder {
			bot_name: bot_name.into(),
			settings,
			http_client: None,
			cache: None,
			cache_stores: None,
			logger: None,
			single_flight: false,
		}
	}

	/// Configured bot name.
	pub fn bot_name(&self) -> &str {
		&self.0.bot_name
	}

	/// Bot identifier used in resource paths.
	pub fn bot_id(&self) -> &BotId {
		&self.0.credentials.bot_id
	}

	/// Domain identifier attached to message bodies.
	pub fn domain_id(&self) -> &DomainId {
		&self.0.credentials.domain_id
	}

	/// Validated credential set.
	pub fn credentials(&self) -> &Credentials {
		&self.0.credentials
	}

	/// Token manager backing this client.
	pub fn token_manager(&self) -> &TokenManager {
		&self.0.tokens
	}

	/// API base URL (always ends in `/`).
	pub fn base_url(&self) -> &Url {
		&self.0.base_url
	}

	/// Resource clients for this bot.
	pub fn bot(&self) -> BotClient {
		BotClient::new(self.clone())
	}

	/// Returns a bearer token for this bot.
	pub async fn access_token(&self) -> Result<Secret> {
		self.0.tokens.token().await
	}

	/// Resolves `path` against the API base; `.` and `..` segments are rejected.
	pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
		let path = path.trim_start_matches('/');

		if path.split('/').any(|segment| matches!(segment, "." | "..")) {
			return Err(ApiError::invalid_argument(format!(
				"Invalid endpoint `{path}`: dot segments are not allowed."
			)));
		}

		self.0
			.base_url
			.join(path)
			.map_err(|e| ApiError::invalid_argument(format!("Invalid endpoint `{path}`: {e}.")))
	}

	/// Sends an authenticated `GET`.
	pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Json> {
		self.send(Method::GET, path, query, None).await
	}

	/// Sends an authenticated `POST` with a JSON body.
	pub async fn post(&self, path: &str, body: &Json) -> Result<Json> {
		self.send(Method::POST, path, &[], Some(body)).await
	}

	/// Sends an authenticated `PUT` with a JSON body.
	pub async fn put(&self, path: &str, body: &Json) -> Result<Json> {
		self.send(Method::PUT, path, &[], Some(body)).await
	}

	/// Sends an authenticated `DELETE`.
	pub async fn delete(&self, path: &str, query: &[(&str, String)]) -> Result<Json> {
		self.send(Method::DELETE, path, query, None).await
	}

	/// Sends an authenticated request and decodes the JSON reply; empty bodies decode to `{}`.
	pub async fn send(
		&self,
		method: Method,
		path: &str,
		query: &[(&str, String)],
		body: Option<&Json>,
	) -> Result<Json> {
		obs::observe(OpKind::Api, "send", async move {
			let url = self.endpoint(path)?;
			let token = self.access_token().await?;
			let mut builder = self
				.0
				.http_client
				.request(method, url.clone())
				.bearer_auth(token.expose())
				.header(CONTENT_TYPE, "application/json");

			if !query.is_empty() {
				builder = builder.query(query);
			}
			if let Some(body) = body {
				builder = builder.json(body);
			}

			let response = self.execute(builder, &url).await?;

			Ok(self.decode_json(response, &url).await?)
		})
		.await
	}

	/// First step of a two-step download: expects `302` and returns the absolute `Location`.
	pub async fn redirect_location(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
		obs::observe(OpKind::Download, "redirect_location", async move {
			let url = self.endpoint(path)?;
			let token = self.access_token().await?;
			let builder = self
				.0
				.http_client
				.get(url.clone())
				.bearer_auth(token.expose())
				.query(query);
			let response = self.execute(builder, &url).await?;
			let status = response.status().as_u16();

			if status != 302 {
				let bytes = response
					.bytes()
					.await
					.map_err(|source| ApiError::Transport { url: url.to_string(), source })?;
				let body = serde_json::from_slice::<Json>(&bytes).ok();
				let err = ApiError::UnexpectedStatus { status, body, url: url.to_string() };

				self.0.log.error(
					"Unexpected download response",
					serde_json::json!({ "status_code": status, "url": url.as_str() }),
				);

				return Err(Error::from(err));
			}

			let location = response
				.headers()
				.get(LOCATION)
				.and_then(|value| value.to_str().ok())
				.map(str::trim)
				.filter(|value| !value.is_empty())
				.and_then(|value| url.join(value).ok())
				.ok_or_else(|| ApiError::MissingRedirect { url: url.to_string() })?;

			Ok(location.to_string())
		})
		.await
	}

	/// Second step of a two-step download: authenticated `GET` of an absolute URL.
	pub async fn get_external(&self, location: &str) -> Result<RawResponse> {
		obs::observe(OpKind::Download, "get_external", async move {
			let url = Url::parse(location).map_err(|e| {
				ApiError::invalid_argument(format!("Invalid download location `{location}`: {e}."))
			})?;
			let token = self.access_token().await?;
			let builder = self.0.http_client.get(url.clone()).bearer_auth(token.expose());
			let response = self.execute(builder, &url).await?;
			let status = response.status().as_u16();
			let content_type = response
				.headers()
				.get(CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);
			let body = response
				.bytes()
				.await
				.map_err(|source| ApiError::Transport { url: url.to_string(), source })?
				.to_vec();

			if !(200..300).contains(&status) {
				let parsed = serde_json::from_slice::<Json>(&body).ok();

				return Err(Error::from(self.status_error(status, parsed, &url)));
			}

			Ok(RawResponse { url: url.to_string(), content_type, body })
		})
		.await
	}

	/// Authenticated multipart `POST` to an absolute upload URL.
	pub async fn post_multipart(&self, upload_url: &str, form: Form) -> Result<Json> {
		obs::observe(OpKind::Upload, "post_multipart", async move {
			let url = Url::parse(upload_url).map_err(|e| {
				ApiError::invalid_argument(format!("Invalid upload URL `{upload_url}`: {e}."))
			})?;
			let token = self.access_token().await?;
			let builder =
				self.0.http_client.post(url.clone()).bearer_auth(token.expose()).multipart(form);
			let response = self.execute(builder, &url).await?;

			Ok(self.decode_json(response, &url).await?)
		})
		.await
	}

	async fn execute(&self, builder: RequestBuilder, url: &Url) -> Result<Response, ApiError> {
		let transport = |source| ApiError::Transport { url: url.to_string(), source };
		let request = builder.build().map_err(transport)?;

		if self.0.log.enabled_for(obs::LogLevel::Debug) {
			self.0.log.debug(
				"Sending request to LINE WORKS API",
				serde_json::json!({
					"method": request.method().as_str(),
					"url": request.url().as_str(),
					"headers": http::redacted_headers(request.headers()),
				}),
			);
		}

		self.0.http_client.execute(request).await.map_err(|source| {
			self.0.log.error(
				"LINE WORKS API request failed",
				serde_json::json!({ "url": url.as_str(), "message": source.to_string() }),
			);

			transport(source)
		})
	}

	async fn decode_json(&self, response: Response, url: &Url) -> Result<Json, ApiError> {
		let status = response.status().as_u16();
		let bytes = response
			.bytes()
			.await
			.map_err(|source| ApiError::Transport { url: url.to_string(), source })?;
		let parsed = if bytes.iter().all(u8::is_ascii_whitespace) {
			Ok(Json::Object(JsonMap::new()))
		} else {
			serde_json::from_slice::<Json>(&bytes)
		};

		self.0.log.debug(
			"Received response from LINE WORKS API",
			serde_json::json!({
				"status_code": status,
				"response": parsed.as_ref().ok(),
			}),
		);

		if !(200..300).contains(&status) {
			return Err(self.status_error(status, parsed.ok(), url));
		}

		parsed.map_err(|source| ApiError::Decode { status, url: url.to_string(), source })
	}

	fn status_error(&self, status: u16, body: Option<Json>, url: &Url) -> ApiError {
		let message = http::error_message(body.as_ref(), status);

		self.0.log.error(
			"LINE WORKS API request failed",
			serde_json::json!({
				"url": url.as_str(),
				"message": message,
				"status_code": status,
				"response_data": body,
			}),
		);

		ApiError::Status { message, status, body, url: url.to_string() }
	}
}

/// Builder for [`LineWorksClient`] with injectable collaborators.
pub struct LineWorksClientBuilder<'a> {
	bot_name: String,
	settings: &'a Settings,
	http_client: Option<ReqwestHttpClient>,
	cache: Option<Arc<dyn Cache>>,
	cache_stores: Option<CacheStores>,
	logger: Option<Arc<dyn Logger>>,
	single_flight: bool,
}
impl LineWorksClientBuilder<'_> {
	/// Uses a preconfigured HTTP transport.
	pub fn http_client(mut self, http_client: ReqwestHttpClient) -> Self {
		self.http_client = Some(http_client);

		self
	}

	/// Uses `cache` regardless of the configured store name (still subject to `cache.enabled`).
	pub fn cache(mut self, cache: Arc<dyn Cache>) -> Self {
		self.cache = Some(cache);

		self
	}

	/// Registry from which `cache.store` is resolved.
	pub fn cache_stores(mut self, stores: CacheStores) -> Self {
		self.cache_stores = Some(stores);

		self
	}

	/// Logger receiving diagnostics when `logging.enabled` is set.
	pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
		self.logger = Some(logger);

		self
	}

	/// Serializes concurrent token exchanges on a cold cache.
	pub fn single_flight(mut self, enabled: bool) -> Self {
		self.single_flight = enabled;

		self
	}

	/// Validates configuration and assembles the client. No network call is made.
	pub fn build(self) -> Result<LineWorksClient> {
		let settings = self.settings;
		let credentials = Arc::new(settings.bot(&self.bot_name)?.validate(&self.bot_name)?);
		let base_url = settings.api_base()?;
		let token_url = settings.token_endpoint()?;
		let http_client = match self.http_client {
			Some(client) => client,
			None => ReqwestHttpClient::new()?,
		};
		let logger = self.logger.unwrap_or_else(|| default_logger(settings));
		let log = LogSink::new(logger, settings.logging.level, "")
			.with_enabled(settings.logging.enabled);
		let mut tokens = TokenManager::new(credentials.clone(), http_client.clone(), token_url)
			.with_single_flight(self.single_flight)
			.with_log_sink(log.scoped("[AccessTokenManager]"));

		if settings.cache.enabled {
			let cache = match self.cache {
				Some(cache) => cache,
				None => self
					.cache_stores
					.unwrap_or_default()
					.select(settings.cache.store.as_deref())?,
			};

			tokens = tokens.with_cache(cache, settings.cache.ttl());
		}

		Ok(LineWorksClient(Arc::new(ClientInner {
			log: log.scoped(format!("[LineWorksClient] [{}]", self.bot_name)),
			bot_name: self.bot_name,
			credentials,
			base_url,
			http_client,
			tokens,
		})))
	}
}

fn default_logger(settings: &Settings) -> Arc<dyn Logger> {
	#[cfg(feature = "tracing")]
	{
		match &settings.logging.channel {
			Some(channel) => Arc::new(obs::TracingLogger::with_channel(channel)),
			None => Arc::new(obs::TracingLogger::default()),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = settings;

		Arc::new(obs::NoopLogger)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	// self
	use super::*;
	use crate::{_preludet::*, error::ConfigError};

	#[test]
	fn build_validates_before_any_io() {
		let mut settings = test_settings("http://127.0.0.1:9", true);

		settings.bots.get_mut("default").expect("Default bot should exist.").domain_id.clear();

		let err = LineWorksClient::new("default", &settings)
			.expect_err("Missing domain id must be rejected.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::MissingField { field: "domain_id", .. })
		));
		assert!(matches!(
			LineWorksClient::new("ops", &settings),
			Err(Error::Config(ConfigError::UnknownBot { .. }))
		));
	}

	#[test]
	fn endpoints_join_under_versioned_base() {
		let (client, _cache) = build_test_client("http://127.0.0.1:9", true);

		assert_eq!(
			client.endpoint("/bots/2000001/channels").expect("Endpoint should resolve.").as_str(),
			"http://127.0.0.1:9/v1.0/bots/2000001/channels"
		);
	}

	#[test]
	fn endpoints_reject_dot_segments() {
		let (client, _cache) = build_test_client("http://127.0.0.1:9", true);

		for path in ["bots/2000001/channels/..", "bots/./2000001", "/../admin"] {
			assert!(
				matches!(client.endpoint(path), Err(ApiError::InvalidArgument { .. })),
				"`{path}` must not resolve."
			);
		}

		assert!(client.endpoint("bots/2000001/channels/..room").is_ok());
	}

	#[tokio::test]
	async fn empty_success_body_decodes_to_empty_object() {
		let server = MockServer::start_async().await;

		server
			.mock_async(|when, then| {
				when.method(POST).path("/oauth2/v2.0/token");
				then.status(200)
					.header("content-type", "application/json")
					.body(r#"{"access_token":"t"}"#);
			})
			.await;
		server
			.mock_async(|when, then| {
				when.method(DELETE)
					.path("/v1.0/bots/2000001/richmenus/m1")
					.header("authorization", "Bearer t");
				then.status(204);
			})
			.await;

		let (client, _cache) = build_test_client(&server.base_url(), true);
		let body = client
			.delete("bots/2000001/richmenus/m1", &[])
			.await
			.expect("Empty 204 reply should decode.");

		assert_eq!(body, serde_json::json!({}));
	}

	#[tokio::test]
	async fn non_json_success_body_is_a_decode_error() {
		let server = MockServer::start_async().await;

		server
			.mock_async(|when, then| {
				when.method(POST).path("/oauth2/v2.0/token");
				then.status(200)
					.header("content-type", "application/json")
					.body(r#"{"access_token":"t"}"#);
			})
			.await;
		server
			.mock_async(|when, then| {
				when.method(GET).path("/v1.0/bots/2000001");
				then.status(200).body("<html>maintenance</html>");
			})
			.await;

		let (client, _cache) = build_test_client(&server.base_url(), true);
		let err = client.get("bots/2000001", &[]).await.expect_err("HTML must not decode.");

		assert!(matches!(err, Error::Api(ApiError::Decode { status: 200, .. })));
	}
}
