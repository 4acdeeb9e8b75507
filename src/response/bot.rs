//! Bot management replies.

// self
use crate::{
	_prelude::*,
	response::{def_response, string_field},
};

def_response! { BotInfoResponse, "Bot profile returned by `GET bots/{botId}`." }
impl BotInfoResponse {
	/// Bot identifier.
	pub fn bot_id(&self) -> Option<String> {
		string_field(&self.0, "botId")
	}

	/// Display name; falls back to `botName`.
	pub fn name(&self) -> Option<String> {
		string_field(&self.0, "name").or_else(|| string_field(&self.0, "botName"))
	}

	/// Bot status.
	pub fn status(&self) -> Option<String> {
		string_field(&self.0, "status")
	}

	/// Profile photo URL.
	pub fn photo_url(&self) -> Option<String> {
		string_field(&self.0, "photoUrl")
	}

	/// Free-form description.
	pub fn description(&self) -> Option<String> {
		string_field(&self.0, "description")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn bot_name_falls_back_to_bot_name_field() {
		let response = BotInfoResponse::from(serde_json::json!({
			"botId": 2000001,
			"botName": "Helper",
			"photoUrl": "https://example.com/bot.png",
		}));

		assert_eq!(response.bot_id().as_deref(), Some("2000001"));
		assert_eq!(response.name().as_deref(), Some("Helper"));
		assert_eq!(response.status(), None);
	}
}
