//! Bot and domain metadata.

// self
use crate::{_prelude::*, bot::bot_path, client::LineWorksClient, response::BotInfoResponse};

/// Reads the bot's registration details.
#[derive(Clone, Copy, Debug)]
pub struct BotManagementClient<'a> {
	client: &'a LineWorksClient,
}
impl<'a> BotManagementClient<'a> {
	/// Borrows the transport.
	pub fn new(client: &'a LineWorksClient) -> Self {
		Self { client }
	}

	/// Bot profile.
	pub async fn info(&self) -> Result<BotInfoResponse> {
		Ok(BotInfoResponse::from(self.client.get(&bot_path(self.client, ""), &[]).await?))
	}

	/// Domain the bot is registered to, as returned by the API.
	pub async fn domain_info(&self) -> Result<Json> {
		self.client.get(&bot_path(self.client, "/domain"), &[]).await
	}
}
