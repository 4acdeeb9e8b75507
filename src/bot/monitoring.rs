//! Message export downloads.
//!
//! The export endpoint answers with `302` and a short-lived download location; the CSV itself is
//! fetched from that location with the same bearer token.

// self
use crate::{
	_prelude::*,
	client::LineWorksClient,
	error::ApiError,
	response::MessageContentsResponse,
};

/// Export endpoint, relative to the API base.
pub const MESSAGE_CONTENTS_PATH: &str = "monitoring/message-contents/download";
/// Export languages the API accepts.
pub const EXPORT_LANGUAGES: [&str; 5] = ["ja_JP", "ko_KR", "zh_CN", "zh_TW", "en_US"];
/// Values accepted by `botMessageFilterType` and `rogerMessageFilterType`.
pub const FILTER_TYPES: [&str; 3] = ["include", "exclude", "only"];
/// Language used when none is set.
pub const DEFAULT_EXPORT_LANGUAGE: &str = "ja_JP";

/// Parameters of one export request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageContentsQuery {
	start_time: String,
	end_time: String,
	language: String,
	bot_message_filter_type: Option<String>,
	domain_id: Option<i64>,
	roger_message_filter_type: Option<String>,
}
impl MessageContentsQuery {
	/// Export window; times are passed through verbatim (ISO 8601 with offset).
	pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
		Self {
			start_time: start_time.into(),
			end_time: end_time.into(),
			language: DEFAULT_EXPORT_LANGUAGE.into(),
			bot_message_filter_type: None,
			domain_id: None,
			roger_message_filter_type: None,
		}
	}

	/// Export window from timestamps, rendered as RFC 3339.
	pub fn between(start: OffsetDateTime, end: OffsetDateTime) -> Result<Self, ApiError> {
		let render = |at: OffsetDateTime| {
			at.format(&time::format_description::well_known::Rfc3339)
				.map_err(|e| ApiError::invalid_argument(format!("Invalid export time: {e}.")))
		};

		Ok(Self::new(render(start)?, render(end)?))
	}

	/// Header language of the export.
	pub fn language(mut self, language: impl Into<String>) -> Self {
		self.language = language.into();

		self
	}

	/// Filters bot messages (`include`, `exclude`, `only`).
	pub fn bot_message_filter(mut self, filter: impl Into<String>) -> Self {
		self.bot_message_filter_type = Some(filter.into());

		self
	}

	/// Filters read-receipt ("roger") messages (`include`, `exclude`, `only`).
	pub fn roger_message_filter(mut self, filter: impl Into<String>) -> Self {
		self.roger_message_filter_type = Some(filter.into());

		self
	}

	/// Restricts the export to one domain.
	pub fn domain_id(mut self, domain_id: i64) -> Self {
		self.domain_id = Some(domain_id);

		self
	}

	/// Window start.
	pub fn start_time(&self) -> &str {
		&self.start_time
	}

	/// Window end.
	pub fn end_time(&self) -> &str {
		&self.end_time
	}

	/// Rejects values the API would refuse.
	pub fn validate(&self) -> Result<(), ApiError> {
		if !EXPORT_LANGUAGES.contains(&self.language.as_str()) {
			return Err(ApiError::invalid_argument(format!(
				"Invalid language '{}'. Allowed values: {}",
				self.language,
				EXPORT_LANGUAGES.join(", ")
			)));
		}

		for (name, value) in [
			("botMessageFilterType", &self.bot_message_filter_type),
			("rogerMessageFilterType", &self.roger_message_filter_type),
		] {
			let invalid = value.as_ref().filter(|value| !FILTER_TYPES.contains(&value.as_str()));

			if let Some(value) = invalid {
				return Err(ApiError::invalid_argument(format!(
					"Invalid {name} '{value}'. Allowed values: {}",
					FILTER_TYPES.join(", ")
				)));
			}
		}

		Ok(())
	}

	/// Query string pairs in request order.
	pub fn to_query(&self) -> Vec<(&'static str, String)> {
		let mut query = vec![
			("startTime", self.start_time.clone()),
			("endTime", self.end_time.clone()),
			("language", self.language.clone()),
		];

		if let Some(filter) = &self.bot_message_filter_type {
			query.push(("botMessageFilterType", filter.clone()));
		}
		if let Some(domain_id) = self.domain_id {
			query.push(("domainId", domain_id.to_string()));
		}
		if let Some(filter) = &self.roger_message_filter_type {
			query.push(("rogerMessageFilterType", filter.clone()));
		}

		query
	}

	fn metadata(&self) -> Json {
		serde_json::json!({
			"startTime": self.start_time,
			"endTime": self.end_time,
			"language": self.language,
			"botMessageFilterType": self.bot_message_filter_type,
			"domainId": self.domain_id,
			"rogerMessageFilterType": self.roger_message_filter_type,
		})
	}

	fn window(&self) -> Json {
		serde_json::json!({ "startTime": self.start_time, "endTime": self.end_time })
	}
}

/// Downloads message exports.
#[derive(Clone, Copy, Debug)]
pub struct MessageContentsClient<'a> {
	client: &'a LineWorksClient,
}
impl<'a> MessageContentsClient<'a> {
	/// Borrows the transport.
	pub fn new(client: &'a LineWorksClient) -> Self {
		Self { client }
	}

	/// Runs both download steps and parses the CSV.
	///
	/// Failures after validation are wrapped as "Failed to download message contents" with the
	/// requested window attached; status, body, and URL of the cause stay reachable.
	pub async fn download(&self, query: &MessageContentsQuery) -> Result<MessageContentsResponse> {
		query.validate()?;

		let wrap = |e: Error| match e {
			Error::Api(api) =>
				Error::Api(api.with_context("Failed to download message contents", query.window())),
			other => other,
		};
		let location = self
			.client
			.redirect_location(MESSAGE_CONTENTS_PATH, &query.to_query())
			.await
			.map_err(wrap)?;
		let raw = self.client.get_external(&location).await.map_err(wrap)?;

		MessageContentsResponse::parse(raw.url, &raw.body, query.metadata())
			.map_err(|e| wrap(e.into()))
	}

	/// First step only: the location the export can be fetched from.
	pub async fn download_url(&self, query: &MessageContentsQuery) -> Result<String> {
		query.validate()?;

		self.client.redirect_location(MESSAGE_CONTENTS_PATH, &query.to_query()).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn query_keeps_optional_parameters_in_order() {
		let query = MessageContentsQuery::new("2024-01-01T00:00:00+09:00", "2024-01-31T23:59:59+09:00")
			.bot_message_filter("exclude")
			.domain_id(300001)
			.roger_message_filter("only");
		let keys = query.to_query().into_iter().map(|(key, _)| key).collect::<Vec<_>>();

		assert_eq!(keys, [
			"startTime",
			"endTime",
			"language",
			"botMessageFilterType",
			"domainId",
			"rogerMessageFilterType"
		]);
		assert!(query.validate().is_ok());
	}

	#[test]
	fn invalid_language_lists_allowed_values() {
		let err = MessageContentsQuery::new("a", "b")
			.language("fr_FR")
			.validate()
			.expect_err("fr_FR is not an export language.");

		assert_eq!(
			err.to_string(),
			"Invalid language 'fr_FR'. Allowed values: ja_JP, ko_KR, zh_CN, zh_TW, en_US"
		);
	}

	#[test]
	fn invalid_filter_names_the_parameter() {
		let err = MessageContentsQuery::new("a", "b")
			.roger_message_filter("all")
			.validate()
			.expect_err("`all` is not a filter type.");

		assert_eq!(
			err.to_string(),
			"Invalid rogerMessageFilterType 'all'. Allowed values: include, exclude, only"
		);
	}

	#[test]
	fn between_renders_rfc3339() {
		let start = OffsetDateTime::from_unix_timestamp(1_704_067_200)
			.expect("Fixed timestamp should be valid.");
		let query = MessageContentsQuery::between(start, start + Duration::days(1))
			.expect("Timestamps should render.");

		assert_eq!(query.start_time(), "2024-01-01T00:00:00Z");
		assert_eq!(query.end_time(), "2024-01-02T00:00:00Z");
	}
}
