//! Message send replies.

// self
use crate::{
	_prelude::*,
	response::{def_response, int_field, string_field},
};

def_response! { MessageResponse, "Reply to a user or channel message send." }
impl MessageResponse {
	/// Identifier assigned to the sent message, when the API reports one.
	pub fn message_id(&self) -> Option<String> {
		string_field(&self.0, "messageId")
	}

	/// Send timestamp in epoch milliseconds.
	pub fn timestamp(&self) -> Option<i64> {
		int_field(&self.0, "timestamp")
	}
}
