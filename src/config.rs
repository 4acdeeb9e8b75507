//! Global settings and per-bot credential configuration.
//!
//! Settings load from a JSON document ([`Settings::from_json_file`], [`Settings::from_json_str`])
//! or from `LINEWORKS_*` environment variables ([`Settings::from_env`]) for a single bot.

// std
use std::{env, fs, path::Path};
// self
use crate::{_prelude::*, auth::BotCredentials, error::ConfigError, obs::LogLevel};

/// Versioned resource API base.
pub const DEFAULT_API_BASE_URL: &str = "https://www.worksapis.com/v1.0";
/// OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://auth.worksmobile.com/oauth2/v2.0/token";
/// Bot name used when none is requested.
pub const DEFAULT_BOT: &str = "default";
/// Default cache TTL in minutes for assertions and bearer tokens.
pub const DEFAULT_CACHE_TTL_MINUTES: u32 = 30;

/// Top-level client settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Bot used when callers do not name one.
	pub default_bot: String,
	/// Versioned resource API base URL.
	pub api_base_url: String,
	/// Token endpoint URL.
	pub token_url: String,
	/// Token and assertion caching.
	pub cache: CacheSettings,
	/// Logging switches.
	pub logging: LoggingSettings,
	/// Credential bundles keyed by bot name.
	pub bots: BTreeMap<String, BotCredentials>,
}
impl Settings {
	/// Reads settings from a JSON file.
	pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let raw = fs::read_to_string(path)
			.map_err(|source| ConfigError::SettingsRead { path: path.to_path_buf(), source })?;

		Self::from_json_str(&raw)
	}

	/// Parses settings from a JSON document.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::SettingsParse { source })
	}

	/// Builds settings for a single `default` bot from `LINEWORKS_*` environment variables.
	///
	/// Credential variables: `LINEWORKS_SERVICE_ACCOUNT`, `LINEWORKS_PRIVATE_KEY`,
	/// `LINEWORKS_PRIVATE_KEY_ID`, `LINEWORKS_CLIENT_ID`, `LINEWORKS_CLIENT_SECRET`,
	/// `LINEWORKS_BOT_ID`, `LINEWORKS_BOT_SECRET`, `LINEWORKS_DOMAIN_ID`, `LINEWORKS_SCOPE`.
	/// Global variables: `LINEWORKS_API_BASE_URL`, `LINEWORKS_TOKEN_URL`,
	/// `LINEWORKS_CACHE_ENABLED`, `LINEWORKS_CACHE_STORE`, `LINEWORKS_CACHE_TTL`,
	/// `LINEWORKS_LOGGING_ENABLED`, `LINEWORKS_LOG_LEVEL`, `LINEWORKS_LOG_CHANNEL`.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Same as [`Settings::from_env`] with an injectable variable source.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
		let mut settings = Self::default();

		if let Some(url) = var("LINEWORKS_API_BASE_URL") {
			settings.api_base_url = url;
		}
		if let Some(url) = var("LINEWORKS_TOKEN_URL") {
			settings.token_url = url;
		}
		if let Some(flag) = var("LINEWORKS_CACHE_ENABLED") {
			settings.cache.enabled = parse_bool("LINEWORKS_CACHE_ENABLED", &flag)?;
		}

		settings.cache.store = var("LINEWORKS_CACHE_STORE");

		if let Some(ttl) = var("LINEWORKS_CACHE_TTL") {
			settings.cache.ttl_minutes = ttl
				.trim()
				.parse()
				.map_err(|_| ConfigError::InvalidEnv { name: "LINEWORKS_CACHE_TTL" })?;
		}
		if let Some(flag) = var("LINEWORKS_LOGGING_ENABLED") {
			settings.logging.enabled = parse_bool("LINEWORKS_LOGGING_ENABLED", &flag)?;
		}
		if let Some(level) = var("LINEWORKS_LOG_LEVEL") {
			settings.logging.level = serde_json::from_value(Json::String(level.to_lowercase()))
				.map_err(|_| ConfigError::InvalidEnv { name: "LINEWORKS_LOG_LEVEL" })?;
		}

		settings.logging.channel = var("LINEWORKS_LOG_CHANNEL");

		let credentials = BotCredentials {
			service_account: var("LINEWORKS_SERVICE_ACCOUNT").unwrap_or_default(),
			private_key: var("LINEWORKS_PRIVATE_KEY").unwrap_or_default().into(),
			private_key_id: var("LINEWORKS_PRIVATE_KEY_ID"),
			client_id: var("LINEWORKS_CLIENT_ID").unwrap_or_default(),
			client_secret: var("LINEWORKS_CLIENT_SECRET").unwrap_or_default().into(),
			bot_id: var("LINEWORKS_BOT_ID").unwrap_or_default(),
			bot_secret: var("LINEWORKS_BOT_SECRET").map(Into::into),
			domain_id: var("LINEWORKS_DOMAIN_ID").unwrap_or_default(),
			scope: var("LINEWORKS_SCOPE").unwrap_or_else(|| BotCredentials::default().scope),
		};

		settings.bots.insert(DEFAULT_BOT.into(), credentials);

		Ok(settings)
	}

	/// Resolves the bot name to use, falling back to [`Settings::default_bot`].
	pub fn resolve_bot_name<'a>(&'a self, name: Option<&'a str>) -> Result<&'a str, ConfigError> {
		match name {
			Some(name) => Ok(name),
			None if self.default_bot.trim().is_empty() => Err(ConfigError::MissingDefaultBot),
			None => Ok(&self.default_bot),
		}
	}

	/// Looks up the credential bundle for `bot`.
	pub fn bot(&self, bot: &str) -> Result<&BotCredentials, ConfigError> {
		self.bots.get(bot).ok_or_else(|| ConfigError::UnknownBot { bot: bot.into() })
	}

	/// Parses [`Settings::api_base_url`], ensuring a trailing slash so relative paths join under it.
	pub fn api_base(&self) -> Result<Url, ConfigError> {
		let raw = self.api_base_url.trim();
		let value = if raw.ends_with('/') { raw.to_owned() } else { format!("{raw}/") };

		Url::parse(&value).map_err(|source| ConfigError::InvalidUrl { value, source })
	}

	/// Parses [`Settings::token_url`].
	pub fn token_endpoint(&self) -> Result<Url, ConfigError> {
		let value = self.token_url.trim();

		Url::parse(value).map_err(|source| ConfigError::InvalidUrl { value: value.into(), source })
	}
}
impl Default for Settings {
	fn default() -> Self {
		Self {
			default_bot: DEFAULT_BOT.into(),
			api_base_url: DEFAULT_API_BASE_URL.into(),
			token_url: DEFAULT_TOKEN_URL.into(),
			cache: CacheSettings::default(),
			logging: LoggingSettings::default(),
			bots: BTreeMap::new(),
		}
	}
}

/// Cache switches shared by the assertion and bearer-token caches.
///
/// `ttl_minutes` is independent of the one-hour assertion lifetime and of the token lifetime the
/// endpoint reports. Keep it at or below the actual token lifetime; cached tokens are never
/// revalidated.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
	/// Enables caching.
	pub enabled: bool,
	/// Named store to use; `None` selects the default store.
	pub store: Option<String>,
	/// Entry lifetime in minutes.
	pub ttl_minutes: u32,
}
impl CacheSettings {
	/// TTL as a [`Duration`].
	pub fn ttl(&self) -> Duration {
		Duration::minutes(i64::from(self.ttl_minutes))
	}
}
impl Default for CacheSettings {
	fn default() -> Self {
		Self { enabled: true, store: None, ttl_minutes: DEFAULT_CACHE_TTL_MINUTES }
	}
}

/// Logging switches applied by [`LogSink`](crate::obs::LogSink).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// Enables logging.
	pub enabled: bool,
	/// Minimum level emitted.
	pub level: LogLevel,
	/// Channel name handed to the logger.
	pub channel: Option<String>,
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(ConfigError::InvalidEnv { name }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn json_settings_apply_defaults() {
		let settings = Settings::from_json_str(
			r#"{
				"bots": {
					"default": { "client_id": "cid", "bot_id": 2000001 }
				},
				"cache": { "enabled": false }
			}"#,
		)
		.expect("Settings should parse.");

		assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
		assert_eq!(settings.token_url, DEFAULT_TOKEN_URL);
		assert!(!settings.cache.enabled);
		assert_eq!(settings.cache.ttl(), Duration::minutes(30));
		assert_eq!(settings.logging.level, LogLevel::Debug);
		assert_eq!(settings.bot("default").expect("Default bot should exist.").bot_id, "2000001");
	}

	#[test]
	fn malformed_settings_report_the_path() {
		let err = Settings::from_json_str(r#"{ "cache": { "ttl_minutes": "soon" } }"#)
			.expect_err("Non-numeric TTL must be rejected.");
		let ConfigError::SettingsParse { source } = err else {
			panic!("Expected a settings parse error, got {err:?}.");
		};

		assert_eq!(source.path().to_string(), "cache.ttl_minutes");
	}

	#[test]
	fn env_lookup_builds_default_bot() {
		let vars = HashMap::from([
			("LINEWORKS_SERVICE_ACCOUNT", "svc@example.works"),
			("LINEWORKS_CLIENT_ID", "cid"),
			("LINEWORKS_CACHE_ENABLED", "false"),
			("LINEWORKS_CACHE_TTL", "15"),
			("LINEWORKS_LOG_LEVEL", "ERROR"),
		]);
		let settings = Settings::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
			.expect("Environment settings should build.");
		let bot = settings.bot(DEFAULT_BOT).expect("Default bot should be registered.");

		assert_eq!(bot.service_account, "svc@example.works");
		assert_eq!(bot.scope, "bot");
		assert!(!settings.cache.enabled);
		assert_eq!(settings.cache.ttl_minutes, 15);
		assert_eq!(settings.logging.level, LogLevel::Error);
	}

	#[test]
	fn invalid_env_values_are_named() {
		let err = Settings::from_lookup(|name| {
			(name == "LINEWORKS_CACHE_ENABLED").then(|| "maybe".to_string())
		})
		.expect_err("Unparseable flag must be rejected.");

		assert!(matches!(err, ConfigError::InvalidEnv { name: "LINEWORKS_CACHE_ENABLED" }));
	}

	#[test]
	fn unknown_bot_and_base_url_normalization() {
		let settings = Settings { api_base_url: "http://127.0.0.1:9/v1.0".into(), ..Default::default() };

		assert!(matches!(settings.bot("ops"), Err(ConfigError::UnknownBot { .. })));
		assert_eq!(
			settings.api_base().expect("Base URL should parse.").as_str(),
			"http://127.0.0.1:9/v1.0/"
		);
		assert_eq!(settings.resolve_bot_name(None).expect("Default bot should resolve."), "default");
	}
}
