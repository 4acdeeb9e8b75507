//! Attachment and upload replies.

// self
use crate::{
	_prelude::*,
	id::FileId,
	response::{def_response, string_field},
};

def_response! { AttachmentResponse, "Reply to attachment creation: where to upload and the file id to bind." }
impl AttachmentResponse {
	/// Pre-signed upload URL.
	pub fn upload_url(&self) -> Option<String> {
		string_field(&self.0, "uploadUrl")
	}

	/// File identifier to bind after upload.
	pub fn file_id(&self) -> Option<FileId> {
		string_field(&self.0, "fileId").and_then(|id| FileId::new(id).ok())
	}
}

def_response! { UploadResponse, "Reply from the multipart upload endpoint." }
impl UploadResponse {
	/// File identifier echoed by the upload endpoint.
	pub fn file_id(&self) -> Option<FileId> {
		string_field(&self.0, "fileId").and_then(|id| FileId::new(id).ok())
	}
}
