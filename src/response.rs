//! Typed wrappers over decoded API replies.
//!
//! Every wrapper holds the JSON object the API returned and exposes `get`, `has`, `data`, and
//! `into_inner`, plus named `Option` getters for the fields callers usually want. A wrapper only
//! exists when the call returned without error, so `is_success` is always true.

pub mod attachment;
pub mod bot;
pub mod channel;
pub mod message;
pub mod monitoring;
pub mod rich_menu;

pub use attachment::*;
pub use bot::*;
pub use channel::*;
pub use message::*;
pub use monitoring::*;
pub use rich_menu::*;

// self
use crate::_prelude::*;

macro_rules! def_response {
	($name:ident, $doc:literal) => {
		#[doc = $doc]
		#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(JsonMap<String, Json>);
		impl $name {
			/// Wraps a decoded JSON object.
			pub fn new(data: JsonMap<String, Json>) -> Self {
				Self(data)
			}

			/// Raw field lookup.
			pub fn get(&self, key: &str) -> Option<&Json> {
				self.0.get(key)
			}

			/// Returns true when the reply carried `key`.
			pub fn has(&self, key: &str) -> bool {
				self.0.contains_key(key)
			}

			/// Whole decoded reply.
			pub fn data(&self) -> &JsonMap<String, Json> {
				&self.0
			}

			/// Consumes the wrapper, returning the decoded reply.
			pub fn into_inner(self) -> JsonMap<String, Json> {
				self.0
			}

			/// Always true: failed calls surface as errors instead of wrappers.
			pub fn is_success(&self) -> bool {
				true
			}
		}
		impl From<Json> for $name {
			fn from(value: Json) -> Self {
				Self(crate::response::into_object(value))
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, "{}", Json::Object(self.0.clone()))
			}
		}
	};
}
pub(crate) use def_response;

def_response! { ApiResponse, "Acknowledgement reply for calls without a meaningful payload (deletes, leave, bindings)." }

/// Non-object replies are kept under a `data` key so nothing is dropped.
pub(crate) fn into_object(value: Json) -> JsonMap<String, Json> {
	match value {
		Json::Object(map) => map,
		Json::Null => JsonMap::new(),
		other => JsonMap::from_iter([("data".to_owned(), other)]),
	}
}

/// String field, accepting numbers for ids the API sometimes emits numerically.
pub(crate) fn string_field(map: &JsonMap<String, Json>, key: &str) -> Option<String> {
	match map.get(key)? {
		Json::String(s) => Some(s.clone()),
		Json::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

/// Integer field, accepting numeric strings.
pub(crate) fn int_field(map: &JsonMap<String, Json>, key: &str) -> Option<i64> {
	match map.get(key)? {
		Json::Number(n) => n.as_i64(),
		Json::String(s) => s.trim().parse().ok(),
		_ => None,
	}
}

/// `responseMetaData.nextCursor` used by paginated listings.
pub(crate) fn next_cursor(map: &JsonMap<String, Json>) -> Option<String> {
	map.get("responseMetaData")
		.and_then(|meta| meta.get("nextCursor"))
		.and_then(Json::as_str)
		.filter(|cursor| !cursor.is_empty())
		.map(str::to_owned)
}
