//! Per-bot credential bundles and their eager validation.

// crates.io
use serde::{Deserializer, de::Error as DeError};
// self
use crate::{
	_prelude::*,
	auth::{PrivateKey, ScopeSet, Secret},
	error::ConfigError,
	id::{BotId, DomainId},
};

/// Raw credential bundle as it appears in settings.
///
/// Every field defaults to empty so an incomplete bundle deserializes and is then rejected by
/// [`BotCredentials::validate`] with the name of the first missing field.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BotCredentials {
	/// Service account the assertion is issued for (`sub` claim).
	pub service_account: String,
	/// PEM text, raw base64 key body, or a path to a key file.
	pub private_key: Secret,
	/// Key identifier shown in the developer console; informational only.
	pub private_key_id: Option<String>,
	/// OAuth client id (`iss` claim and token request field).
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: Secret,
	/// Bot identifier used in resource paths.
	#[serde(deserialize_with = "string_or_number")]
	pub bot_id: String,
	/// Bot secret used to verify callback signatures; informational only.
	pub bot_secret: Option<Secret>,
	/// Domain identifier attached to message bodies.
	#[serde(deserialize_with = "string_or_number")]
	pub domain_id: String,
	/// Space-delimited scope string requested at the token endpoint.
	pub scope: String,
}
impl BotCredentials {
	/// Checks required fields in declaration order and resolves key material.
	pub fn validate(&self, bot: &str) -> Result<Credentials, ConfigError> {
		let missing = |field: &'static str| ConfigError::MissingField { field, bot: bot.into() };

		if self.service_account.trim().is_empty() {
			return Err(missing("service_account"));
		}
		if self.private_key.is_empty() {
			return Err(missing("private_key"));
		}
		if self.client_id.trim().is_empty() {
			return Err(missing("client_id"));
		}
		if self.client_secret.is_empty() {
			return Err(missing("client_secret"));
		}
		if self.bot_id.trim().is_empty() {
			return Err(missing("bot_id"));
		}
		if self.domain_id.trim().is_empty() {
			return Err(missing("domain_id"));
		}

		let scope = if self.scope.trim().is_empty() {
			ScopeSet::from_str(ScopeSet::DEFAULT)?
		} else {
			ScopeSet::from_str(&self.scope)?
		};

		Ok(Credentials {
			service_account: self.service_account.trim().to_owned(),
			private_key: PrivateKey::resolve(self.private_key.expose())?,
			private_key_id: self.private_key_id.clone(),
			client_id: self.client_id.trim().to_owned(),
			client_secret: self.client_secret.clone(),
			bot_id: BotId::new(self.bot_id.trim())?,
			domain_id: DomainId::new(self.domain_id.trim())?,
			scope,
		})
	}
}
impl Default for BotCredentials {
	fn default() -> Self {
		Self {
			service_account: String::new(),
			private_key: Secret::default(),
			private_key_id: None,
			client_id: String::new(),
			client_secret: Secret::default(),
			bot_id: String::new(),
			bot_secret: None,
			domain_id: String::new(),
			scope: ScopeSet::DEFAULT.into(),
		}
	}
}

/// Validated credential set, immutable for the lifetime of a client.
#[derive(Clone, Debug)]
pub struct Credentials {
	/// Service account the assertion is issued for.
	pub service_account: String,
	/// Normalized signing key.
	pub private_key: PrivateKey,
	/// Key identifier shown in the developer console.
	pub private_key_id: Option<String>,
	/// OAuth client id.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: Secret,
	/// Bot identifier used in resource paths.
	pub bot_id: BotId,
	/// Domain identifier attached to message bodies.
	pub domain_id: DomainId,
	/// Scopes requested at the token endpoint.
	pub scope: ScopeSet,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	match Json::deserialize(deserializer)? {
		Json::Null => Ok(String::new()),
		Json::String(s) => Ok(s),
		Json::Number(n) => Ok(n.to_string()),
		other => Err(DeError::custom(format!("expected a string or number, found {other}"))),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	#[test]
	fn validation_reports_first_missing_field() {
		let mut credentials = test_credentials();

		credentials.client_id.clear();
		credentials.bot_id.clear();

		let err = credentials.validate("ops").expect_err("Missing client id must be rejected.");

		assert_eq!(err.to_string(), "The 'client_id' configuration is required for bot 'ops'.");
	}

	#[test]
	fn blank_secret_counts_as_missing() {
		let credentials = BotCredentials { client_secret: Secret::new("   "), ..test_credentials() };

		assert!(matches!(
			credentials.validate("default"),
			Err(ConfigError::MissingField { field: "client_secret", .. })
		));
	}

	#[test]
	fn numeric_ids_deserialize_as_strings() {
		let credentials: BotCredentials = serde_json::from_value(serde_json::json!({
			"service_account": "svc@example.works",
			"private_key": TEST_PRIVATE_KEY,
			"client_id": "cid",
			"client_secret": "secret",
			"bot_id": 2000001,
			"domain_id": 300001,
		}))
		.expect("Credentials with numeric ids should deserialize.");
		let validated = credentials.validate("default").expect("Credentials should validate.");

		assert_eq!(validated.bot_id.as_ref(), "2000001");
		assert_eq!(validated.domain_id.as_ref(), "300001");
		assert_eq!(validated.scope.normalized(), "bot");
	}

	#[test]
	fn blank_scope_falls_back_to_bot() {
		let credentials = BotCredentials { scope: "  ".into(), ..test_credentials() };
		let validated = credentials.validate("default").expect("Credentials should validate.");

		assert_eq!(validated.scope.normalized(), ScopeSet::DEFAULT);
	}
}
