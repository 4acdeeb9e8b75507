mod common;

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use parking_lot::Mutex;
// self
use lineworks_client::{
	LineWorks,
	error::{ApiError, Error},
	obs::{LogLevel, Logger},
};

#[derive(Default)]
struct RecordingLogger(Mutex<Vec<(LogLevel, String, String)>>);
impl Logger for RecordingLogger {
	fn log(&self, level: LogLevel, message: &str, context: &serde_json::Value) {
		self.0.lock().push((level, message.to_owned(), context.to_string()));
	}
}

#[tokio::test]
async fn send_text_exchanges_once_and_posts_identity_fields() {
	let server = MockServer::start_async().await;
	let token = common::mock_token(&server, "bearer-1").await;
	let message = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1.0/bots/2000001/users/alice@example.com/messages")
				.header("authorization", "Bearer bearer-1")
				.header("content-type", "application/json")
				.json_body(serde_json::json!({
					"content": { "type": "text", "text": "Deploy finished" },
					"botId": common::BOT_ID,
					"accountId": "alice@example.com",
					"domainId": common::DOMAIN_ID,
				}));
			then.status(201)
				.header("content-type", "application/json")
				.body(r#"{"messageId":"msg-1","timestamp":1700000000000}"#);
		})
		.await;
	let settings = common::settings(&server, true);
	let (client, _cache) = common::client(&settings);
	let response = client
		.bot()
		.message()
		.send_text("alice@example.com", "Deploy finished")
		.await
		.expect("Message should be sent.");

	assert!(response.is_success());
	assert_eq!(response.message_id().as_deref(), Some("msg-1"));
	assert_eq!(response.timestamp(), Some(1_700_000_000_000));
	token.assert_calls_async(1).await;
	message.assert_calls_async(1).await;
}

#[tokio::test]
async fn error_status_surfaces_message_status_and_body() {
	let server = MockServer::start_async().await;

	common::mock_token(&server, "bearer-1").await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/bots/2000001/channels/missing");
			then.status(404)
				.header("content-type", "application/json")
				.body(r#"{"code":"X","description":"not found"}"#);
		})
		.await;

	let settings = common::settings(&server, true);
	let (client, _cache) = common::client(&settings);
	let err = client
		.bot()
		.channel()
		.info("missing")
		.await
		.expect_err("A 404 must surface as an error.");

	assert_eq!(err.status(), Some(404));
	assert_eq!(err.to_string(), "LINE WORKS API request failed: not found.");

	let Error::Api(api) = err else {
		panic!("Expected an API error, got {err:?}.");
	};

	assert_eq!(api.body(), Some(&serde_json::json!({ "code": "X", "description": "not found" })));
	assert!(api.url().is_some_and(|url| url.ends_with("/v1.0/bots/2000001/channels/missing")));
}

#[tokio::test]
async fn rich_menu_listing_and_default_binding() {
	let server = MockServer::start_async().await;

	common::mock_token(&server, "bearer-1").await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/bots/2000001/richmenus");
			then.status(200).header("content-type", "application/json").body(
				r#"{"richmenus":[{"richmenuId":"rm-1","richmenuName":"Main"}],"responseMetaData":{"nextCursor":"c2"}}"#,
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1.0/bots/2000001/richmenus/default")
				.json_body(serde_json::json!({ "richMenuId": "rm-1" }));
			then.status(204);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/bots/2000001/richmenus/default");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"richMenuId":"rm-1"}"#);
		})
		.await;

	let settings = common::settings(&server, true);
	let (client, _cache) = common::client(&settings);
	let bot = client.bot();
	let menus = bot.rich_menu().list(None).await.expect("Menus should be listed.");

	assert_eq!(menus.count(), 1);
	assert_eq!(menus.rich_menus()[0].name().as_deref(), Some("Main"));
	assert_eq!(menus.next_cursor().as_deref(), Some("c2"));

	bot.rich_menu().set_default("rm-1").await.expect("Default binding should succeed.");

	let binding = bot.rich_menu().get_default().await.expect("Default binding should load.");

	assert_eq!(binding.rich_menu_id().as_deref(), Some("rm-1"));
}

#[tokio::test]
async fn manager_routes_bots_and_redacts_logged_tokens() {
	let server = MockServer::start_async().await;

	common::mock_token(&server, "super-secret-token").await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/bots/2000001");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"botId":"2000001","name":"Notifier"}"#);
		})
		.await;

	let mut settings = common::settings(&server, true);

	settings.logging.enabled = true;

	let logger = Arc::new(RecordingLogger::default());
	let manager = LineWorks::new(settings)
		.with_http_client(common::http_client())
		.with_logger(logger.clone());
	let info = manager
		.default_bot()
		.expect("Default bot should build.")
		.management()
		.info()
		.await
		.expect("Bot info should load.");

	assert_eq!(info.name().as_deref(), Some("Notifier"));

	let records = logger.0.lock();

	assert!(records.iter().any(|(_, message, _)| message.starts_with("[AccessTokenManager] ")));
	assert!(records.iter().any(|(_, message, context)| {
		message.starts_with("[LineWorksClient] [default] ") && context.contains("Bearer [REDACTED]")
	}));
	assert!(records.iter().all(|(_, _, context)| !context.contains("super-secret-token")));
	assert!(matches!(
		manager.bot(Some("unknown")),
		Err(Error::Config(lineworks_client::error::ConfigError::UnknownBot { .. }))
	));
}

#[tokio::test]
async fn invalid_identifiers_never_reach_the_network() {
	let server = MockServer::start_async().await;
	let token = common::mock_token(&server, "bearer-1").await;
	let settings = common::settings(&server, true);
	let (client, _cache) = common::client(&settings);
	let err = client
		.bot()
		.channel()
		.info("room/../../admin")
		.await
		.expect_err("Path separators must be rejected.");

	assert!(matches!(err, Error::Api(ApiError::InvalidArgument { .. })));
	token.assert_calls_async(0).await;
}

#[tokio::test]
async fn dot_segment_identifiers_never_reach_the_bot_root() {
	let server = MockServer::start_async().await;
	let token = common::mock_token(&server, "bearer-1").await;
	let bot_root = server
		.mock_async(|when, then| {
			when.path("/v1.0/bots/2000001/");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"botId":"2000001","name":"Leaked"}"#);
		})
		.await;
	let settings = common::settings(&server, true);
	let (client, _cache) = common::client(&settings);
	let bot = client.bot();
	let info = bot.channel().info("..").await;
	let delete = bot.rich_menu().delete("..").await;
	let current = bot.rich_menu().get(".").await;

	assert!(matches!(info, Err(Error::Api(ApiError::InvalidArgument { .. }))), "{info:?}");
	assert!(matches!(delete, Err(Error::Api(ApiError::InvalidArgument { .. }))), "{delete:?}");
	assert!(matches!(current, Err(Error::Api(ApiError::InvalidArgument { .. }))), "{current:?}");
	bot_root.assert_calls_async(0).await;
	token.assert_calls_async(0).await;
}
