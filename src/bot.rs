//! Bot-scoped resource clients.
//!
//! [`BotClient`] hands out one lightweight client per API family. Each family borrows the
//! underlying [`LineWorksClient`], builds paths under `bots/{botId}`, and wraps the decoded reply
//! in a typed response from [`crate::response`].

pub mod attachment;
pub mod channel;
pub mod management;
pub mod message;
pub mod monitoring;
pub mod rich_menu;
pub mod upload;

pub use attachment::*;
pub use channel::*;
pub use management::*;
pub use message::*;
pub use monitoring::*;
pub use rich_menu::*;
pub use upload::*;

// self
use crate::{_prelude::*, client::LineWorksClient, error::ApiError, id::IdentifierError};

/// Entry point to the resource clients of one bot.
#[derive(Clone, Debug)]
pub struct BotClient {
	client: LineWorksClient,
}
impl BotClient {
	/// Wraps an authenticated transport.
	pub fn new(client: LineWorksClient) -> Self {
		Self { client }
	}

	/// Underlying transport.
	pub fn client(&self) -> &LineWorksClient {
		&self.client
	}

	/// Direct messages to users.
	pub fn message(&self) -> MessageClient<'_> {
		MessageClient::new(&self.client)
	}

	/// Channel (talk room) operations.
	pub fn channel(&self) -> ChannelClient<'_> {
		ChannelClient::new(&self.client)
	}

	/// Rich menu operations.
	pub fn rich_menu(&self) -> RichMenuClient<'_> {
		RichMenuClient::new(&self.client)
	}

	/// Attachment registration.
	pub fn attachment(&self) -> AttachmentClient<'_> {
		AttachmentClient::new(&self.client)
	}

	/// Multipart uploads to pre-signed URLs.
	pub fn upload(&self) -> UploadClient<'_> {
		UploadClient::new(&self.client)
	}

	/// Bot and domain metadata.
	pub fn management(&self) -> BotManagementClient<'_> {
		BotManagementClient::new(&self.client)
	}

	/// Message export downloads.
	pub fn message_contents(&self) -> MessageContentsClient<'_> {
		MessageContentsClient::new(&self.client)
	}
}

/// `bots/{botId}` followed by `rest`.
pub(crate) fn bot_path(client: &LineWorksClient, rest: &str) -> String {
	format!("bots/{}{rest}", client.bot_id())
}

/// Validates a caller-supplied identifier before it is interpolated into a path.
pub(crate) fn parse_id<T>(value: &str) -> Result<T, ApiError>
where
	T: FromStr<Err = IdentifierError>,
{
	value.parse().map_err(|e: IdentifierError| ApiError::invalid_argument(e.to_string()))
}
