//! Multipart uploads to pre-signed attachment URLs.

// std
use std::path::Path;
// crates.io
use reqwest::multipart::{Form, Part};
// self
use crate::{
	_prelude::*,
	bot::attachment::LocalFile,
	client::LineWorksClient,
	error::ApiError,
	response::UploadResponse,
};

/// Uploads file bytes to the URL returned by attachment registration.
#[derive(Clone, Copy, Debug)]
pub struct UploadClient<'a> {
	client: &'a LineWorksClient,
}
impl<'a> UploadClient<'a> {
	/// Borrows the transport.
	pub fn new(client: &'a LineWorksClient) -> Self {
		Self { client }
	}

	/// Posts the file at `path` as `Filedata` plus its `resourceName`, bearer-authenticated.
	pub async fn upload(
		&self,
		upload_url: &str,
		path: impl AsRef<Path>,
		content_type: Option<&str>,
	) -> Result<UploadResponse> {
		let path = path.as_ref();
		let file = LocalFile::inspect(path, content_type)?;
		let bytes = LocalFile::read(path)?;
		let part = Part::bytes(bytes)
			.file_name(file.name.clone())
			.mime_str(&file.content_type)
			.map_err(|e| {
				ApiError::invalid_argument(format!(
					"Invalid content type `{}`: {e}.",
					file.content_type
				))
			})?;
		let form = Form::new().part("Filedata", part).text("resourceName", file.name);
		let reply = self.client.post_multipart(upload_url, form).await?;

		Ok(UploadResponse::from(reply))
	}
}
