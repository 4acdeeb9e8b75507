//! Message export downloaded through the monitoring API.
//!
//! The export is a CSV document whose header row uses Japanese column names. Rows are decoded
//! into [`ExportedMessage`] with the well-known columns mapped to named fields; any other column
//! is kept in [`ExportedMessage::extra`] under its original header.

// crates.io
use time::{Date, macros::format_description};
// self
use crate::{_prelude::*, error::ApiError};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const BOT_SENDER_PREFIX: &str = "[Bot]";

/// One row of a message export.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedMessage {
	/// `日時` column.
	pub datetime: String,
	/// `送信者` column.
	pub sender: String,
	/// `受信者` column.
	pub receiver: String,
	/// `チャンネルID` column.
	pub channel_id: String,
	/// `トーク` column.
	pub message: String,
	/// Columns without a known mapping, keyed by their header.
	#[serde(flatten)]
	pub extra: BTreeMap<String, String>,
}
impl ExportedMessage {
	/// Looks a column up by mapped name (`sender`) or by original header for unmapped columns.
	pub fn get(&self, key: &str) -> Option<&str> {
		match key {
			"datetime" => Some(&self.datetime),
			"sender" => Some(&self.sender),
			"receiver" => Some(&self.receiver),
			"channel_id" => Some(&self.channel_id),
			"message" => Some(&self.message),
			other => self.extra.get(other).map(String::as_str),
		}
	}

	/// Returns true when the sender carries the `[Bot]` prefix.
	pub fn is_bot(&self) -> bool {
		self.sender.starts_with(BOT_SENDER_PREFIX)
	}

	/// Calendar date of the `datetime` column, accepting `-` or `/` separators.
	pub fn date(&self) -> Option<Date> {
		let head = self.datetime.trim().get(..10)?.replace('/', "-");

		Date::parse(&head, format_description!("[year]-[month]-[day]")).ok()
	}

	fn set(&mut self, header: &str, value: String) {
		match header_key(header) {
			Some("datetime") => self.datetime = value,
			Some("sender") => self.sender = value,
			Some("receiver") => self.receiver = value,
			Some("channel_id") => self.channel_id = value,
			Some("message") => self.message = value,
			_ => {
				self.extra.insert(header.to_owned(), value);
			},
		}
	}
}

/// Downloaded message export together with the window it was requested for.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MessageContentsResponse {
	download_url: String,
	content: String,
	metadata: Json,
	messages: Vec<ExportedMessage>,
}
impl MessageContentsResponse {
	/// Decodes and parses an export fetched from `download_url`.
	pub fn parse(
		download_url: impl Into<String>,
		body: &[u8],
		metadata: Json,
	) -> Result<Self, ApiError> {
		let download_url = download_url.into();
		let content = decode_text(body);
		let messages = parse_rows(&content)
			.map_err(|source| ApiError::Export { url: download_url.clone(), source })?;

		Ok(Self { download_url, content, metadata, messages })
	}

	/// Location the export was downloaded from.
	pub fn download_url(&self) -> &str {
		&self.download_url
	}

	/// Export text with any byte-order mark removed.
	pub fn csv_content(&self) -> &str {
		&self.content
	}

	/// Query parameters the export was requested with.
	pub fn metadata(&self) -> &Json {
		&self.metadata
	}

	/// Always true: failed downloads surface as errors instead of responses.
	pub fn is_success(&self) -> bool {
		true
	}

	/// Every parsed row.
	pub fn messages(&self) -> &[ExportedMessage] {
		&self.messages
	}

	/// Number of parsed rows.
	pub fn message_count(&self) -> usize {
		self.messages.len()
	}

	/// Rows whose sender equals `sender`.
	pub fn by_sender(&self, sender: &str) -> Vec<&ExportedMessage> {
		self.filter(|message| message.sender == sender)
	}

	/// Rows posted to `channel_id`.
	pub fn by_channel(&self, channel_id: &str) -> Vec<&ExportedMessage> {
		self.filter(|message| message.channel_id == channel_id)
	}

	/// Rows dated within `start..=end`; rows with an unreadable date are excluded.
	pub fn by_date_range(&self, start: Date, end: Date) -> Vec<&ExportedMessage> {
		self.filter(|message| message.date().is_some_and(|date| date >= start && date <= end))
	}

	/// Rows sent by bots.
	pub fn bot_messages(&self) -> Vec<&ExportedMessage> {
		self.filter(ExportedMessage::is_bot)
	}

	/// Rows sent by users.
	pub fn user_messages(&self) -> Vec<&ExportedMessage> {
		self.filter(|message| !message.is_bot())
	}

	fn filter(&self, predicate: impl Fn(&ExportedMessage) -> bool) -> Vec<&ExportedMessage> {
		self.messages.iter().filter(|message| predicate(*message)).collect()
	}
}

fn header_key(header: &str) -> Option<&'static str> {
	match header {
		"日時" => Some("datetime"),
		"送信者" => Some("sender"),
		"受信者" => Some("receiver"),
		"チャンネルID" => Some("channel_id"),
		"トーク" => Some("message"),
		_ => None,
	}
}

fn decode_text(body: &[u8]) -> String {
	if let Some(rest) = body.strip_prefix(UTF8_BOM) {
		return String::from_utf8_lossy(rest).into_owned();
	}
	if let Some(rest) = body.strip_prefix(UTF16_BE_BOM) {
		return decode_utf16(rest, u16::from_be_bytes);
	}
	if let Some(rest) = body.strip_prefix(UTF16_LE_BOM) {
		return decode_utf16(rest, u16::from_le_bytes);
	}

	String::from_utf8_lossy(body).into_owned()
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
	let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));

	char::decode_utf16(units).map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER)).collect()
}

fn parse_rows(content: &str) -> Result<Vec<ExportedMessage>, csv::Error> {
	let mut reader = csv::ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.from_reader(content.as_bytes());
	let mut header = None::<Vec<String>>;
	let mut messages = Vec::new();

	for record in reader.records() {
		let record = record?;

		if record.iter().all(|cell| cell.is_empty()) {
			continue;
		}

		let Some(columns) = &header else {
			header = Some(record.iter().map(str::to_owned).collect());

			continue;
		};
		let mut message = ExportedMessage::default();

		for (index, column) in columns.iter().enumerate() {
			message.set(column, record.get(index).unwrap_or_default().to_owned());
		}

		messages.push(message);
	}

	Ok(messages)
}
