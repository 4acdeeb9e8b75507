//! Channel (talk room) replies.

// self
use crate::{
	_prelude::*,
	id::ChannelId,
	response::{def_response, int_field, next_cursor, string_field},
};

def_response! { ChannelResponse, "Reply to channel creation." }
impl ChannelResponse {
	/// Identifier of the created channel.
	pub fn channel_id(&self) -> Option<ChannelId> {
		string_field(&self.0, "channelId").and_then(|id| ChannelId::new(id).ok())
	}
}

def_response! { ChannelInfoResponse, "Channel details returned by `GET bots/{botId}/channels/{channelId}`." }
impl ChannelInfoResponse {
	/// Channel identifier.
	pub fn channel_id(&self) -> Option<ChannelId> {
		string_field(&self.0, "channelId").and_then(|id| ChannelId::new(id).ok())
	}

	/// Channel title.
	pub fn title(&self) -> Option<String> {
		string_field(&self.0, "title")
	}

	/// Channel type from `channelType.type` (`group`, `organization`, ...).
	pub fn channel_type(&self) -> Option<String> {
		self.0
			.get("channelType")
			.and_then(|kind| kind.get("type"))
			.and_then(Json::as_str)
			.map(str::to_owned)
	}

	/// Owning domain.
	pub fn domain_id(&self) -> Option<i64> {
		int_field(&self.0, "domainId")
	}

	/// Creation time in epoch milliseconds.
	pub fn created_time(&self) -> Option<i64> {
		int_field(&self.0, "createdTime")
	}

	/// Channel status.
	pub fn status(&self) -> Option<String> {
		string_field(&self.0, "status")
	}
}

def_response! { MembersResponse, "Page of channel members." }
impl MembersResponse {
	/// Member account ids; entries may be plain strings or objects carrying `accountId`/`userId`.
	pub fn members(&self) -> Vec<String> {
		let Some(Json::Array(entries)) = self.0.get("members") else {
			return Vec::new();
		};

		entries
			.iter()
			.filter_map(|entry| match entry {
				Json::String(id) => Some(id.clone()),
				Json::Object(member) =>
					string_field(member, "accountId").or_else(|| string_field(member, "userId")),
				_ => None,
			})
			.collect()
	}

	/// Number of members on this page.
	pub fn member_count(&self) -> usize {
		self.members().len()
	}

	/// Cursor for the next page.
	pub fn next_cursor(&self) -> Option<String> {
		next_cursor(&self.0)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn info_reads_nested_channel_type() {
		let response = ChannelInfoResponse::from(serde_json::json!({
			"channelId": "ch-1",
			"title": "Ops",
			"channelType": { "type": "group" },
			"domainId": 300001,
		}));

		assert_eq!(response.channel_id().as_deref(), Some("ch-1"));
		assert_eq!(response.channel_type().as_deref(), Some("group"));
		assert_eq!(response.domain_id(), Some(300001));
		assert_eq!(response.created_time(), None);
	}

	#[test]
	fn members_accept_strings_and_objects() {
		let response = MembersResponse::from(serde_json::json!({
			"members": ["a@example.com", { "accountId": "b@example.com" }, { "userId": "c" }, 7],
			"responseMetaData": { "nextCursor": "next" },
		}));

		assert_eq!(response.members(), vec!["a@example.com", "b@example.com", "c"]);
		assert_eq!(response.member_count(), 3);
		assert_eq!(response.next_cursor().as_deref(), Some("next"));
	}
}
