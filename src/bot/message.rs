//! Direct messages to users.

// self
use crate::{
	_prelude::*,
	bot::{bot_path, parse_id},
	client::LineWorksClient,
	error::ApiError,
	id::AccountId,
	response::MessageResponse,
};

/// Sends messages to individual user accounts.
#[derive(Clone, Copy, Debug)]
pub struct MessageClient<'a> {
	client: &'a LineWorksClient,
}
impl<'a> MessageClient<'a> {
	/// Borrows the transport.
	pub fn new(client: &'a LineWorksClient) -> Self {
		Self { client }
	}

	/// Sends a plain text message.
	pub async fn send_text(
		&self,
		account_id: impl AsRef<str>,
		text: impl Into<String>,
	) -> Result<MessageResponse> {
		let message = serde_json::json!({ "content": { "type": "text", "text": text.into() } });

		self.send_message(account_id, message).await
	}

	/// Sends an arbitrary message object; `botId`, `accountId`, and `domainId` are filled in and
	/// take precedence over caller-supplied values.
	pub async fn send_message(
		&self,
		account_id: impl AsRef<str>,
		message: Json,
	) -> Result<MessageResponse> {
		let account_id = parse_id::<AccountId>(account_id.as_ref())?;
		let Json::Object(mut body) = message else {
			return Err(ApiError::invalid_argument("Message must be a JSON object.").into());
		};

		body.insert("botId".into(), Json::from(self.client.bot_id().to_string()));
		body.insert("accountId".into(), Json::from(account_id.to_string()));
		body.insert("domainId".into(), self.client.domain_id().to_json());

		let path = bot_path(self.client, &format!("/users/{account_id}/messages"));
		let reply = self.client.post(&path, &Json::Object(body)).await?;

		Ok(MessageResponse::from(reply))
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	// self
	use super::*;
	use crate::_preludet::*;

	#[tokio::test]
	async fn send_message_merges_identity_fields() {
		let server = MockServer::start_async().await;

		server
			.mock_async(|when, then| {
				when.method(POST).path("/oauth2/v2.0/token");
				then.status(200)
					.header("content-type", "application/json")
					.body(r#"{"access_token":"t"}"#);
			})
			.await;

		let mock = server
			.mock_async(|when, then| {
				when.method(POST).path("/v1.0/bots/2000001/users/alice@example.com/messages").json_body(
					serde_json::json!({
						"content": { "type": "text", "text": "hi" },
						"botId": TEST_BOT_ID,
						"accountId": "alice@example.com",
						"domainId": 300001,
					}),
				);
				then.status(201)
					.header("content-type", "application/json")
					.body(r#"{"messageId":"m-1"}"#);
			})
			.await;
		let (client, _cache) = build_test_client(&server.base_url(), true);
		let message = serde_json::json!({
			"content": { "type": "text", "text": "hi" },
			"botId": "spoofed",
		});
		let response = MessageClient::new(&client)
			.send_message("alice@example.com", message)
			.await
			.expect("Message should be sent.");

		assert_eq!(response.message_id().as_deref(), Some("m-1"));
		mock.assert_calls_async(1).await;
	}

	#[tokio::test]
	async fn non_object_message_is_rejected_before_io() {
		let (client, _cache) = build_test_client("http://127.0.0.1:9", true);
		let err = MessageClient::new(&client)
			.send_message("alice@example.com", serde_json::json!("hi"))
			.await
			.expect_err("A bare string is not a message.");

		assert!(matches!(err, Error::Api(ApiError::InvalidArgument { .. })));
	}
}
