//! Attachment registration.
//!
//! Sending a file is a three-step dance: register the attachment to obtain an upload URL and
//! file id, upload the bytes with [`crate::bot::UploadClient`], then reference the file id.

// std
use std::{fs::File, io::Read, path::Path};
// self
use crate::{
	_prelude::*,
	bot::bot_path,
	client::LineWorksClient,
	error::ApiError,
	response::AttachmentResponse,
};

const SNIFF_LEN: u64 = 8192;

/// Registers files with the bot before upload.
#[derive(Clone, Copy, Debug)]
pub struct AttachmentClient<'a> {
	client: &'a LineWorksClient,
}
impl<'a> AttachmentClient<'a> {
	/// Borrows the transport.
	pub fn new(client: &'a LineWorksClient) -> Self {
		Self { client }
	}

	/// Registers the file at `path`; the content type is sniffed from the file when absent.
	pub async fn create(
		&self,
		path: impl AsRef<Path>,
		content_type: Option<&str>,
	) -> Result<AttachmentResponse> {
		let file = LocalFile::inspect(path.as_ref(), content_type)?;
		let body = serde_json::json!({
			"fileName": file.name,
			"size": file.size,
			"contentType": file.content_type,
		});
		let reply = self.client.post(&bot_path(self.client, "/attachments"), &body).await?;

		Ok(AttachmentResponse::from(reply))
	}
}

/// Metadata of a local file about to be registered or uploaded.
#[derive(Clone, Debug)]
pub(crate) struct LocalFile {
	pub(crate) name: String,
	pub(crate) size: u64,
	pub(crate) content_type: String,
}
impl LocalFile {
	pub(crate) fn inspect(path: &Path, content_type: Option<&str>) -> Result<Self, ApiError> {
		let metadata = std::fs::metadata(path)
			.ok()
			.filter(|metadata| metadata.is_file())
			.ok_or_else(|| ApiError::invalid_argument(format!("File not found: {}", path.display())))?;

		let content_type = match content_type {
			Some(content_type) => content_type.to_owned(),
			None => sniff_content_type(path)?.to_owned(),
		};

		Ok(Self { name: file_name(path), size: metadata.len(), content_type })
	}

	pub(crate) fn read(path: &Path) -> Result<Vec<u8>, ApiError> {
		std::fs::read(path)
			.map_err(|_| ApiError::invalid_argument(format!("File not found: {}", path.display())))
	}
}

fn file_name(path: &Path) -> String {
	path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Sniffs the media type of the file at `path` from its leading bytes.
pub fn sniff_content_type(path: &Path) -> Result<&'static str, ApiError> {
	let mut head = Vec::with_capacity(SNIFF_LEN as usize);

	File::open(path)
		.and_then(|file| file.take(SNIFF_LEN).read_to_end(&mut head))
		.map_err(|_| ApiError::invalid_argument(format!("File not found: {}", path.display())))?;

	Ok(content_type_of(&head))
}

/// Media type from magic bytes; undetected UTF-8 is `text/plain`, anything else is
/// `application/octet-stream`.
pub fn content_type_of(bytes: &[u8]) -> &'static str {
	if let Some(kind) = infer::get(bytes) {
		return kind.mime_type();
	}

	// A multi-byte character cut off by the sniff window still counts as text.
	let text = match std::str::from_utf8(bytes) {
		Ok(_) => true,
		Err(e) => e.error_len().is_none(),
	};

	if !bytes.is_empty() && text && !bytes.contains(&0) {
		"text/plain"
	} else {
		"application/octet-stream"
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::path::PathBuf;
	// crates.io
	use httpmock::prelude::*;
	// self
	use super::*;
	use crate::_preludet::*;

	fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
		let dir = std::env::temp_dir()
			.join(format!("lineworks-attachment-{}-{}", std::process::id(), name));

		std::fs::create_dir_all(&dir).expect("Temp directory should be creatable.");

		let path = dir.join(name);

		std::fs::write(&path, contents).expect("Temp file should be writable.");

		path
	}

	#[test]
	fn content_type_comes_from_magic_bytes() {
		assert_eq!(content_type_of(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"), "image/png");
		assert_eq!(content_type_of(b"%PDF-1.7\n"), "application/pdf");
		assert_eq!(content_type_of("報告 report".as_bytes()), "text/plain");
		assert_eq!(content_type_of(&"報".as_bytes()[..2]), "text/plain");
		assert_eq!(content_type_of(b"\0\x01\x02"), "application/octet-stream");
		assert_eq!(content_type_of(b""), "application/octet-stream");
	}

	#[test]
	fn sniffing_ignores_misleading_extensions() {
		let png = temp_file("menu.txt", b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR");
		let text = temp_file("notes.png", b"plain words");

		assert_eq!(sniff_content_type(&png).expect("PNG should sniff."), "image/png");
		assert_eq!(sniff_content_type(&text).expect("Text should sniff."), "text/plain");
		assert!(sniff_content_type(Path::new("/definitely/not/here.bin")).is_err());
	}

	#[tokio::test]
	async fn missing_file_is_rejected_before_io() {
		let (client, _cache) = build_test_client("http://127.0.0.1:9", true);
		let err = AttachmentClient::new(&client)
			.create("/definitely/not/here.png", None)
			.await
			.expect_err("Missing file must be rejected.");

		assert_eq!(err.to_string(), "File not found: /definitely/not/here.png");
	}

	#[tokio::test]
	async fn create_registers_name_size_and_type() {
		let server = MockServer::start_async().await;
		let path = temp_file("notes.txt", b"hello");

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
				when.method(POST).path("/v1.0/bots/2000001/attachments").json_body(
					serde_json::json!({
						"fileName": "notes.txt",
						"size": 5,
						"contentType": "text/plain",
					}),
				);
				then.status(200).header("content-type", "application/json").body(
					r#"{"uploadUrl":"https://upload.example.com/u/1","fileId":"file-1"}"#,
				);
			})
			.await;
		let (client, _cache) = build_test_client(&server.base_url(), true);
		let response = AttachmentClient::new(&client)
			.create(&path, None)
			.await
			.expect("Attachment should be registered.");

		assert_eq!(response.upload_url().as_deref(), Some("https://upload.example.com/u/1"));
		assert_eq!(response.file_id().as_deref(), Some("file-1"));
		mock.assert_calls_async(1).await;
	}
}
