//! Typed LINE WORKS API client: JWT-bearer service-account auth, cached bearer tokens, and bot
//! resource clients (messages, channels, rich menus, attachments, monitoring export) in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod bot;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod id;
pub mod manager;
pub mod obs;
pub mod response;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{BotCredentials, Secret},
		cache::{Cache, MemoryCache},
		client::LineWorksClient,
		config::{CacheSettings, Settings},
		http::ReqwestHttpClient,
	};

	/// PKCS#8 RSA key used to sign assertions in tests.
	pub const TEST_PRIVATE_KEY: &str = include_str!("../tests/fixtures/service_account.key");
	/// Public half of [`TEST_PRIVATE_KEY`], for verifying signed assertions.
	pub const TEST_PUBLIC_KEY: &str = include_str!("../tests/fixtures/service_account.pub");
	/// Client id used by the test credential set.
	pub const TEST_CLIENT_ID: &str = "test-client-id";
	/// Client secret used by the test credential set.
	pub const TEST_CLIENT_SECRET: &str = "test-client-secret";
	/// Service account used by the test credential set.
	pub const TEST_SERVICE_ACCOUNT: &str = "svc.test@example.works";
	/// Bot id used by the test credential set.
	pub const TEST_BOT_ID: &str = "2000001";
	/// Domain id used by the test credential set.
	pub const TEST_DOMAIN_ID: &str = "300001";

	/// Builds a complete credential bundle backed by [`TEST_PRIVATE_KEY`].
	pub fn test_credentials() -> BotCredentials {
		BotCredentials {
			service_account: TEST_SERVICE_ACCOUNT.into(),
			private_key: Secret::new(TEST_PRIVATE_KEY),
			client_id: TEST_CLIENT_ID.into(),
			client_secret: Secret::new(TEST_CLIENT_SECRET),
			bot_id: TEST_BOT_ID.into(),
			domain_id: TEST_DOMAIN_ID.into(),
			..Default::default()
		}
	}

	/// Builds settings whose API base and token endpoint both point at `base`.
	pub fn test_settings(base: &str, cache_enabled: bool) -> Settings {
		let mut settings = Settings {
			api_base_url: format!("{base}/v1.0"),
			token_url: format!("{base}/oauth2/v2.0/token"),
			cache: CacheSettings { enabled: cache_enabled, ..Default::default() },
			..Default::default()
		};

		settings.bots.insert(settings.default_bot.clone(), test_credentials());

		settings
	}

	/// Builds the shared HTTP transport used across integration tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		ReqwestHttpClient::with_timeout(std::time::Duration::from_secs(5))
			.expect("Failed to build Reqwest client for tests.")
	}

	/// Constructs a [`LineWorksClient`] for the default test bot against a mock server base URL.
	pub fn build_test_client(base: &str, cache_enabled: bool) -> (LineWorksClient, Arc<MemoryCache>) {
		let settings = test_settings(base, cache_enabled);
		let cache_backend = Arc::new(MemoryCache::default());
		let cache: Arc<dyn Cache> = cache_backend.clone();
		let client = LineWorksClient::builder("default", &settings)
			.http_client(test_reqwest_http_client())
			.cache(cache)
			.build()
			.expect("Failed to build LineWorksClient for tests.");

		(client, cache_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as Json};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use client::LineWorksClient;
pub use manager::LineWorks;
pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
