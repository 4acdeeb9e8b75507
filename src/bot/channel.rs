//! Channel (talk room) operations.

// self
use crate::{
	_prelude::*,
	bot::{bot_path, parse_id},
	client::LineWorksClient,
	error::ApiError,
	id::{AccountId, ChannelId},
	response::{ApiResponse, ChannelInfoResponse, ChannelResponse, MembersResponse, MessageResponse},
};

/// Creates, inspects, and posts to channels the bot belongs to.
#[derive(Clone, Copy, Debug)]
pub struct ChannelClient<'a> {
	client: &'a LineWorksClient,
}
impl<'a> ChannelClient<'a> {
	/// Borrows the transport.
	pub fn new(client: &'a LineWorksClient) -> Self {
		Self { client }
	}

	/// Creates a channel with `account_ids` as members.
	pub async fn create<I, S>(&self, account_ids: I, title: Option<&str>) -> Result<ChannelResponse>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let members = account_ids
			.into_iter()
			.map(|id| parse_id::<AccountId>(id.as_ref()).map(String::from))
			.collect::<Result<Vec<_>, ApiError>>()?;

		if members.is_empty() {
			return Err(ApiError::invalid_argument("A channel needs at least one member.").into());
		}

		let mut body = serde_json::json!({ "members": members });

		if let Some(title) = title {
			body["title"] = Json::from(title);
		}

		let reply = self.client.post(&bot_path(self.client, "/channels"), &body).await?;

		Ok(ChannelResponse::from(reply))
	}

	/// Channel details.
	pub async fn info(&self, channel_id: impl AsRef<str>) -> Result<ChannelInfoResponse> {
		let path = self.channel_path(channel_id.as_ref(), "")?;

		Ok(ChannelInfoResponse::from(self.client.get(&path, &[]).await?))
	}

	/// Removes the bot from the channel.
	pub async fn leave(&self, channel_id: impl AsRef<str>) -> Result<ApiResponse> {
		let path = self.channel_path(channel_id.as_ref(), "/leave")?;

		Ok(ApiResponse::from(self.client.post(&path, &Json::Object(JsonMap::new())).await?))
	}

	/// One page of channel members; pass the previous page's `next_cursor` to continue.
	pub async fn members(
		&self,
		channel_id: impl AsRef<str>,
		cursor: Option<&str>,
	) -> Result<MembersResponse> {
		let path = self.channel_path(channel_id.as_ref(), "/members")?;
		let query = cursor.map(|cursor| vec![("cursor", cursor.to_owned())]).unwrap_or_default();

		Ok(MembersResponse::from(self.client.get(&path, &query).await?))
	}

	/// Posts `message` to the channel as-is.
	pub async fn send_message(
		&self,
		channel_id: impl AsRef<str>,
		message: &Json,
	) -> Result<MessageResponse> {
		let path = self.channel_path(channel_id.as_ref(), "/messages")?;

		Ok(MessageResponse::from(self.client.post(&path, message).await?))
	}

	fn channel_path(&self, channel_id: &str, rest: &str) -> Result<String, ApiError> {
		let channel_id = parse_id::<ChannelId>(channel_id)?;

		Ok(bot_path(self.client, &format!("/channels/{channel_id}{rest}")))
	}
}
