//! Strongly typed identifiers used in API paths and request bodies.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl TryFrom<&str> for $name {
			type Error = IdentifierError;

			fn try_from(value: &str) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 256;
const RESERVED: [char; 4] = ['/', '?', '#', '%'];

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (bot, account, channel, ...).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (bot, account, channel, ...).
		kind: &'static str,
	},
	/// The identifier contains a character that would alter the request path.
	#[error("{kind} identifier contains reserved character `{character}`.")]
	ReservedCharacter {
		/// Kind of identifier (bot, account, channel, ...).
		kind: &'static str,
		/// Offending character.
		character: char,
	},
	/// The identifier is a `.` or `..` path segment.
	#[error("{kind} identifier cannot be a dot segment.")]
	DotSegment {
		/// Kind of identifier (bot, account, channel, ...).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (bot, account, channel, ...).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { BotId, "Identifier of a registered bot.", "Bot" }
def_id! { DomainId, "Identifier of the tenant domain a bot belongs to.", "Domain" }
def_id! { AccountId, "User account identifier (user id or login email).", "Account" }
def_id! { ChannelId, "Identifier of a message channel (talk room).", "Channel" }
def_id! { RichMenuId, "Identifier of a bot rich menu.", "RichMenu" }
def_id! { FileId, "Identifier of an uploaded attachment.", "File" }

impl DomainId {
	/// JSON representation sent in request bodies; numeric ids are emitted as numbers.
	pub fn to_json(&self) -> Json {
		self.0.parse::<i64>().map(Json::from).unwrap_or_else(|_| Json::from(self.0.clone()))
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if let Some(character) = view.chars().find(|c| RESERVED.contains(c)) {
		return Err(IdentifierError::ReservedCharacter { kind, character });
	}
	if matches!(view, "." | "..") {
		return Err(IdentifierError::DotSegment { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_path_characters() {
		assert!(AccountId::new(" user@example.com").is_err(), "Leading whitespace must be rejected.");
		assert!(ChannelId::new("").is_err());
		assert_eq!(
			ChannelId::new("abc/../def"),
			Err(IdentifierError::ReservedCharacter { kind: "Channel", character: '/' })
		);

		let account =
			AccountId::new("user@example.com").expect("Email account ids should be accepted.");

		assert_eq!(account.as_ref(), "user@example.com");
	}

	#[test]
	fn dot_segments_are_rejected() {
		assert_eq!(ChannelId::new(".."), Err(IdentifierError::DotSegment { kind: "Channel" }));
		assert_eq!(RichMenuId::new("."), Err(IdentifierError::DotSegment { kind: "RichMenu" }));
		assert!(FileId::new("..hidden").is_ok());
		assert!(AccountId::new("a.b@example.com").is_ok());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let bot: BotId =
			serde_json::from_str("\"2000001\"").expect("Bot id should deserialize successfully.");

		assert_eq!(bot.as_ref(), "2000001");
		assert!(serde_json::from_str::<BotId>("\"with space\"").is_err());
	}

	#[test]
	fn domain_id_serializes_numeric_values_as_numbers() {
		let numeric = DomainId::new("300001").expect("Numeric domain id should be valid.");
		let textual = DomainId::new("works-domain").expect("Textual domain id should be valid.");

		assert_eq!(numeric.to_json(), serde_json::json!(300001));
		assert_eq!(textual.to_json(), serde_json::json!("works-domain"));
	}

	#[test]
	fn length_limits_apply() {
		RichMenuId::new("a".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		assert!(RichMenuId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
	}
}
