//! Client-level error types shared across auth, transport, and resource clients.

// std
use std::path::PathBuf;
// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Missing or invalid configuration, detected before any I/O.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Assertion signing or token endpoint failure.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Resource API failure.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Cache collaborator failure.
	#[error("{0}")]
	Cache(
		#[from]
		#[source]
		crate::cache::CacheError,
	),
}
impl Error {
	/// HTTP status attached to the underlying failure, when one was observed.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Auth(e) => e.status(),
			Self::Api(e) => e.status(),
			Self::Config(_) | Self::Cache(_) => None,
		}
	}
}

/// Configuration and validation failures raised before any network call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required credential field is empty or absent.
	#[error("The '{field}' configuration is required for bot '{bot}'.")]
	MissingField {
		/// Name of the missing field.
		field: &'static str,
		/// Bot whose configuration is incomplete.
		bot: String,
	},
	/// The requested bot has no configuration entry.
	#[error("Bot [{bot}] is not configured.")]
	UnknownBot {
		/// Requested bot name.
		bot: String,
	},
	/// No default bot name is configured.
	#[error("Default bot is not configured.")]
	MissingDefaultBot,
	/// The named cache store is not registered.
	#[error("Cache store '{store}' is not registered.")]
	UnknownCacheStore {
		/// Requested store name.
		store: String,
	},
	/// The scope string cannot be normalized.
	#[error("Scope configuration is invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// An identifier in the configuration is invalid.
	#[error("Identifier configuration is invalid.")]
	InvalidIdentifier(#[from] crate::id::IdentifierError),
	/// A configured URL cannot be parsed.
	#[error("Configured URL `{value}` is invalid.")]
	InvalidUrl {
		/// Offending value.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The private key file exists but could not be read.
	#[error("Failed to read private key file {}.", path.display())]
	PrivateKeyRead {
		/// Path that was read.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// The settings file could not be read.
	#[error("Failed to read settings file {}.", path.display())]
	SettingsRead {
		/// Path that was read.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// The settings document is malformed.
	#[error("Settings document is malformed.")]
	SettingsParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// An environment variable holds a value that cannot be interpreted.
	#[error("Environment variable {name} holds an invalid value.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Assertion signing and token endpoint failures.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// The assertion could not be signed (bad key format, crypto backend failure).
	#[error("Failed to generate JWT token: {source}.")]
	Signing {
		/// Underlying signing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// The token endpoint answered with an error status.
	#[error("Failed to request access token: {message}.")]
	TokenEndpoint {
		/// Provider-supplied description or a status summary.
		message: String,
		/// HTTP status code.
		status: u16,
		/// Parsed JSON error body, when the response carried one.
		body: Option<Json>,
	},
	/// The token endpoint answered successfully but omitted `access_token`.
	#[error("Access token not found in response.")]
	MissingAccessToken {
		/// HTTP status code.
		status: u16,
		/// Raw decoded response body.
		body: Json,
	},
	/// The token endpoint returned a body that is not valid JSON.
	#[error("Token endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code.
		status: u16,
	},
	/// The token request never produced a usable response.
	#[error("Failed to request access token: {source}.")]
	Transport {
		/// Transport-specific failure.
		#[source]
		source: ReqwestError,
		/// HTTP status code, when one was received.
		status: Option<u16>,
	},
}
impl AuthError {
	/// HTTP status observed at the token endpoint, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::TokenEndpoint { status, .. }
			| Self::MissingAccessToken { status, .. }
			| Self::ResponseParse { status, .. } => Some(*status),
			Self::Transport { status, .. } => *status,
			Self::Signing { .. } => None,
		}
	}

	/// Decoded response body, if the token endpoint returned JSON.
	pub fn body(&self) -> Option<&Json> {
		match self {
			Self::TokenEndpoint { body, .. } => body.as_ref(),
			Self::MissingAccessToken { body, .. } => Some(body),
			_ => None,
		}
	}
}
impl From<jsonwebtoken::errors::Error> for AuthError {
	fn from(source: jsonwebtoken::errors::Error) -> Self {
		Self::Signing { source }
	}
}

/// Resource API failures.
#[derive(Debug, ThisError)]
pub enum ApiError {
	/// The API answered with a non-2xx status.
	#[error("LINE WORKS API request failed: {message}.")]
	Status {
		/// Error description extracted from the body, or a status summary.
		message: String,
		/// HTTP status code.
		status: u16,
		/// Parsed JSON error body, when the response carried one.
		body: Option<Json>,
		/// Request URL.
		url: String,
	},
	/// A 2xx response carried a body that is not valid JSON.
	#[error("LINE WORKS API returned an undecodable body.")]
	Decode {
		/// HTTP status code.
		status: u16,
		/// Request URL.
		url: String,
		/// Underlying decoding failure.
		#[source]
		source: serde_json::Error,
	},
	/// The request never produced a usable response.
	#[error("LINE WORKS API request failed: {source}.")]
	Transport {
		/// Request URL.
		url: String,
		/// Transport-specific failure.
		#[source]
		source: ReqwestError,
	},
	/// A two-step download did not answer the first step with 302.
	#[error("Expected 302 redirect with Location header, but got HTTP {status}.")]
	UnexpectedStatus {
		/// HTTP status code that was returned instead.
		status: u16,
		/// Parsed JSON body, when the response carried one.
		body: Option<Json>,
		/// Request URL.
		url: String,
	},
	/// A two-step download answered 302 without a usable `Location` header.
	#[error("Location header not found in 302 response.")]
	MissingRedirect {
		/// Request URL.
		url: String,
	},
	/// A successful reply omitted a field a follow-up step depends on.
	#[error("Response from {url} is missing `{field}`.")]
	MissingField {
		/// Absent field.
		field: &'static str,
		/// Request URL.
		url: String,
	},
	/// A downloaded message export could not be parsed as CSV.
	#[error("Message export is not valid CSV: {source}.")]
	Export {
		/// Download location the export was fetched from.
		url: String,
		/// Underlying CSV failure.
		#[source]
		source: csv::Error,
	},
	/// The caller supplied an argument the API cannot accept.
	#[error("{message}")]
	InvalidArgument {
		/// Human-readable reason.
		message: String,
	},
	/// An upstream failure re-raised with call-site context.
	#[error("{context}: {source}")]
	Context {
		/// Context describing the failed operation.
		context: String,
		/// Extra diagnostic fields attached by the call site.
		details: Json,
		/// Original failure.
		#[source]
		source: Box<ApiError>,
	},
}
impl ApiError {
	/// HTTP status code, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. }
			| Self::Decode { status, .. }
			| Self::UnexpectedStatus { status, .. } => Some(*status),
			Self::MissingRedirect { .. } => Some(302),
			Self::Transport { source, .. } => source.status().map(|code| code.as_u16()),
			Self::Context { source, .. } => source.status(),
			Self::MissingField { .. } | Self::Export { .. } | Self::InvalidArgument { .. } => None,
		}
	}

	/// Parsed JSON body, when the response carried one.
	pub fn body(&self) -> Option<&Json> {
		match self {
			Self::Status { body, .. } | Self::UnexpectedStatus { body, .. } => body.as_ref(),
			Self::Context { source, .. } => source.body(),
			_ => None,
		}
	}

	/// Request URL, when the failure is tied to a request.
	pub fn url(&self) -> Option<&str> {
		match self {
			Self::Status { url, .. }
			| Self::Decode { url, .. }
			| Self::Transport { url, .. }
			| Self::UnexpectedStatus { url, .. }
			| Self::Export { url, .. }
			| Self::MissingField { url, .. }
			| Self::MissingRedirect { url } => Some(url),
			Self::Context { source, .. } => source.url(),
			Self::InvalidArgument { .. } => None,
		}
	}

	/// Creates an [`ApiError::InvalidArgument`].
	pub fn invalid_argument(message: impl Into<String>) -> Self {
		Self::InvalidArgument { message: message.into() }
	}

	/// Wraps the error with call-site context while keeping status, body, and URL reachable.
	pub fn with_context(self, context: impl Into<String>, details: Json) -> Self {
		Self::Context { context: context.into(), details, source: Box::new(self) }
	}
}
