//! Shared reqwest transport.
//!
//! Every request issued by the client goes through one [`ReqwestHttpClient`]. It never follows
//! redirects: the token endpoint answers directly, and two-step downloads must observe the
//! first-step `302` and its `Location` header themselves.

// std
use std::ops::Deref;
// crates.io
use reqwest::{
	header::{AUTHORIZATION, HeaderMap},
	redirect::Policy,
};
// self
use crate::{_prelude::*, error::ConfigError};

/// Per-request timeout applied by [`ReqwestHttpClient::new`].
pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Configure any custom [`ReqwestClient`] passed to [`ReqwestHttpClient::with_client`] with
/// [`Policy::none`]; the two-step download protocol depends on seeing raw redirects.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Builds a client with the default 30 second timeout.
	pub fn new() -> Result<Self, ConfigError> {
		Self::with_timeout(DEFAULT_TIMEOUT)
	}

	/// Builds a client with a custom per-request timeout.
	pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).redirect(Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Renders headers as a JSON object for logging, masking `Authorization`.
pub fn redacted_headers(headers: &HeaderMap) -> Json {
	let mut map = JsonMap::new();

	for (name, value) in headers {
		let rendered = if name == AUTHORIZATION {
			"Bearer [REDACTED]".to_owned()
		} else {
			value.to_str().unwrap_or("<binary>").to_owned()
		};

		map.insert(name.as_str().to_owned(), Json::String(rendered));
	}

	Json::Object(map)
}

/// Extracts a human-readable message from a JSON error body.
pub(crate) fn error_message(body: Option<&Json>, status: u16) -> String {
	["message", "description", "error_description", "error"]
		.iter()
		.find_map(|field| body.and_then(|b| b.get(*field)).and_then(Json::as_str))
		.map(str::to_owned)
		.unwrap_or_else(|| format!("HTTP {status}"))
}
