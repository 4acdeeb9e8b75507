#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use lineworks_client::{
	LineWorksClient,
	auth::{BotCredentials, Secret},
	cache::{Cache, MemoryCache},
	client::LineWorksClientBuilder,
	config::{CacheSettings, Settings},
	http::ReqwestHttpClient,
};

pub const PRIVATE_KEY: &str = include_str!("../fixtures/service_account.key");
pub const CLIENT_ID: &str = "it-client-id";
pub const BOT_ID: &str = "2000001";
pub const DOMAIN_ID: i64 = 300001;
pub const TOKEN_PATH: &str = "/oauth2/v2.0/token";

pub fn credentials() -> BotCredentials {
	BotCredentials {
		service_account: "svc.it@example.works".into(),
		private_key: Secret::new(PRIVATE_KEY),
		client_id: CLIENT_ID.into(),
		client_secret: Secret::new("it-client-secret"),
		bot_id: BOT_ID.into(),
		domain_id: DOMAIN_ID.to_string(),
		..Default::default()
	}
}

pub fn settings(server: &MockServer, cache_enabled: bool) -> Settings {
	let mut settings = Settings {
		api_base_url: server.url("/v1.0"),
		token_url: server.url(TOKEN_PATH),
		cache: CacheSettings { enabled: cache_enabled, ..Default::default() },
		..Default::default()
	};

	settings.bots.insert(settings.default_bot.clone(), credentials());

	settings
}

pub fn http_client() -> ReqwestHttpClient {
	ReqwestHttpClient::with_timeout(std::time::Duration::from_secs(5))
		.expect("Integration HTTP client should build.")
}

pub fn builder<'a>(settings: &'a Settings, cache: &Arc<MemoryCache>) -> LineWorksClientBuilder<'a> {
	let cache: Arc<dyn Cache> = cache.clone();

	LineWorksClient::builder("default", settings).http_client(http_client()).cache(cache)
}

pub fn client(settings: &Settings) -> (LineWorksClient, Arc<MemoryCache>) {
	let cache = Arc::new(MemoryCache::default());
	let client = builder(settings, &cache).build().expect("Integration client should build.");

	(client, cache)
}

pub async fn mock_token<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
	let body = serde_json::json!({
		"access_token": token,
		"token_type": "Bearer",
		"expires_in": 86400,
		"scope": "bot",
	})
	.to_string();

	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}
