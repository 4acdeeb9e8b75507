mod common;

// crates.io
use httpmock::prelude::*;
use time::macros::date;
// self
use lineworks_client::{
	bot::MessageContentsQuery,
	error::{ApiError, Error},
};

const EXPORT_PATH: &str = "/v1.0/monitoring/message-contents/download";
const CSV: &str = "日時,送信者,受信者,チャンネルID,トーク\n\
	2024-03-01 09:00:00,alice@example.com,bob@example.com,ch-1,hello\n\
	2024-03-02 12:00:00,[Bot] Notifier,alice@example.com,ch-1,build green\n";

fn query() -> MessageContentsQuery {
	MessageContentsQuery::new("2024-03-01T00:00:00+09:00", "2024-03-31T23:59:59+09:00")
}

fn api_error(err: Error) -> ApiError {
	match err {
		Error::Api(api) => api,
		other => panic!("Expected an API error, got {other:?}."),
	}
}

#[tokio::test]
async fn download_follows_redirect_and_parses_csv() {
	let server = MockServer::start_async().await;
	let token = common::mock_token(&server, "bearer-1").await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(EXPORT_PATH)
				.query_param("startTime", "2024-03-01T00:00:00+09:00")
				.query_param("endTime", "2024-03-31T23:59:59+09:00")
				.query_param("language", "ja_JP")
				.query_param("botMessageFilterType", "include")
				.header("authorization", "Bearer bearer-1");
			then.status(302).header("location", server.url("/exports/monitoring.csv"));
		})
		.await;
	let mut utf8_with_bom = vec![0xEF, 0xBB, 0xBF];

	utf8_with_bom.extend_from_slice(CSV.as_bytes());

	let second = server
		.mock_async(|when, then| {
			when.method(GET).path("/exports/monitoring.csv").header("authorization", "Bearer bearer-1");
			then.status(200).header("content-type", "text/csv").body(utf8_with_bom);
		})
		.await;
	let settings = common::settings(&server, true);
	let (client, _cache) = common::client(&settings);
	let export = client
		.bot()
		.message_contents()
		.download(&query().bot_message_filter("include"))
		.await
		.expect("Export should download.");

	assert!(export.download_url().ends_with("/exports/monitoring.csv"));
	assert_eq!(export.message_count(), 2);
	assert_eq!(export.messages()[0].message, "hello");
	assert_eq!(export.bot_messages().len(), 1);
	assert_eq!(export.by_date_range(date!(2024 - 03 - 02), date!(2024 - 03 - 31)).len(), 1);
	assert_eq!(export.metadata()["language"], "ja_JP");
	token.assert_calls_async(1).await;
	first.assert_calls_async(1).await;
	second.assert_calls_async(1).await;
}

#[tokio::test]
async fn non_redirect_first_step_is_unexpected_status_with_context() {
	let server = MockServer::start_async().await;

	common::mock_token(&server, "bearer-1").await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(EXPORT_PATH);
			then.status(200).header("content-type", "application/json").body(r#"{"ok":true}"#);
		})
		.await;

	let settings = common::settings(&server, true);
	let (client, _cache) = common::client(&settings);
	let err = api_error(
		client
			.bot()
			.message_contents()
			.download(&query())
			.await
			.expect_err("A 200 first step must fail."),
	);
	let ApiError::Context { context, details, source } = &err else {
		panic!("Expected a context-wrapped error, got {err:?}.");
	};

	assert_eq!(context, "Failed to download message contents");
	assert_eq!(details["startTime"], "2024-03-01T00:00:00+09:00");
	assert!(matches!(**source, ApiError::UnexpectedStatus { status: 200, .. }));
	assert_eq!(err.status(), Some(200));
	assert_eq!(
		source.to_string(),
		"Expected 302 redirect with Location header, but got HTTP 200."
	);
}

#[tokio::test]
async fn redirect_without_location_is_missing_redirect() {
	let server = MockServer::start_async().await;

	common::mock_token(&server, "bearer-1").await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(EXPORT_PATH);
			then.status(302);
		})
		.await;

	let settings = common::settings(&server, true);
	let (client, _cache) = common::client(&settings);
	let err = client
		.bot()
		.message_contents()
		.download_url(&query())
		.await
		.expect_err("A 302 without Location must fail.");

	assert!(matches!(api_error(err), ApiError::MissingRedirect { .. }));
}

#[tokio::test]
async fn download_url_returns_location_only() {
	let server = MockServer::start_async().await;

	common::mock_token(&server, "bearer-1").await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(EXPORT_PATH).query_param("language", "en_US");
			then.status(302).header("location", "https://files.example.com/export.csv");
		})
		.await;

	let settings = common::settings(&server, true);
	let (client, _cache) = common::client(&settings);
	let location = client
		.bot()
		.message_contents()
		.download_url(&query().language("en_US"))
		.await
		.expect("Location should be returned.");

	assert_eq!(location, "https://files.example.com/export.csv");
}

#[tokio::test]
async fn invalid_language_is_rejected_before_any_request() {
	let server = MockServer::start_async().await;
	let token = common::mock_token(&server, "bearer-1").await;
	let settings = common::settings(&server, true);
	let (client, _cache) = common::client(&settings);
	let err = client
		.bot()
		.message_contents()
		.download(&query().language("fr_FR"))
		.await
		.expect_err("fr_FR must be rejected.");

	assert!(matches!(api_error(err), ApiError::InvalidArgument { .. }));
	token.assert_calls_async(0).await;
}
