//! Rich menu operations.

// std
use std::path::Path;
// self
use crate::{
	_prelude::*,
	bot::{AttachmentClient, UploadClient, bot_path, parse_id},
	client::LineWorksClient,
	error::ApiError,
	id::{AccountId, FileId, RichMenuId},
	response::{
		ApiResponse, RichMenuBindingResponse, RichMenuImageResponse, RichMenuListResponse,
		RichMenuResponse,
	},
};

/// Manages rich menus, their images, and their default/per-user bindings.
#[derive(Clone, Copy, Debug)]
pub struct RichMenuClient<'a> {
	client: &'a LineWorksClient,
}
impl<'a> RichMenuClient<'a> {
	/// Borrows the transport.
	pub fn new(client: &'a LineWorksClient) -> Self {
		Self { client }
	}

	/// One page of rich menus.
	pub async fn list(&self, cursor: Option<&str>) -> Result<RichMenuListResponse> {
		let query = cursor.map(|cursor| vec![("cursor", cursor.to_owned())]).unwrap_or_default();
		let reply = self.client.get(&bot_path(self.client, "/richmenus"), &query).await?;

		Ok(RichMenuListResponse::from(reply))
	}

	/// Rich menu detail.
	pub async fn get(&self, rich_menu_id: impl AsRef<str>) -> Result<RichMenuResponse> {
		let path = self.menu_path(rich_menu_id.as_ref(), "")?;

		Ok(RichMenuResponse::from(self.client.get(&path, &[]).await?))
	}

	/// Creates a rich menu from its JSON definition.
	pub async fn create(&self, rich_menu: &Json) -> Result<RichMenuResponse> {
		let reply = self.client.post(&bot_path(self.client, "/richmenus"), rich_menu).await?;

		Ok(RichMenuResponse::from(reply))
	}

	/// Deletes a rich menu.
	pub async fn delete(&self, rich_menu_id: impl AsRef<str>) -> Result<ApiResponse> {
		let path = self.menu_path(rich_menu_id.as_ref(), "")?;

		Ok(ApiResponse::from(self.client.delete(&path, &[]).await?))
	}

	/// Makes `rich_menu_id` the menu shown to users without a personal binding.
	pub async fn set_default(&self, rich_menu_id: impl AsRef<str>) -> Result<ApiResponse> {
		let rich_menu_id = parse_id::<RichMenuId>(rich_menu_id.as_ref())?;
		let body = serde_json::json!({ "richMenuId": rich_menu_id });
		let reply = self.client.post(&bot_path(self.client, "/richmenus/default"), &body).await?;

		Ok(ApiResponse::from(reply))
	}

	/// Current default binding.
	pub async fn get_default(&self) -> Result<RichMenuBindingResponse> {
		let reply = self.client.get(&bot_path(self.client, "/richmenus/default"), &[]).await?;

		Ok(RichMenuBindingResponse::from(reply))
	}

	/// Clears the default binding.
	pub async fn delete_default(&self) -> Result<ApiResponse> {
		let reply = self.client.delete(&bot_path(self.client, "/richmenus/default"), &[]).await?;

		Ok(ApiResponse::from(reply))
	}

	/// Binds `rich_menu_id` to one user.
	pub async fn set_for_user(
		&self,
		account_id: impl AsRef<str>,
		rich_menu_id: impl AsRef<str>,
	) -> Result<ApiResponse> {
		let rich_menu_id = parse_id::<RichMenuId>(rich_menu_id.as_ref())?;
		let path = self.user_path(account_id.as_ref())?;
		let body = serde_json::json!({ "richMenuId": rich_menu_id });

		Ok(ApiResponse::from(self.client.post(&path, &body).await?))
	}

	/// Menu bound to one user.
	pub async fn get_for_user(&self, account_id: impl AsRef<str>) -> Result<RichMenuBindingResponse> {
		let path = self.user_path(account_id.as_ref())?;

		Ok(RichMenuBindingResponse::from(self.client.get(&path, &[]).await?))
	}

	/// Removes one user's binding.
	pub async fn delete_for_user(&self, account_id: impl AsRef<str>) -> Result<ApiResponse> {
		let path = self.user_path(account_id.as_ref())?;

		Ok(ApiResponse::from(self.client.delete(&path, &[]).await?))
	}

	/// Attaches an already uploaded file as the menu image.
	pub async fn set_image(
		&self,
		rich_menu_id: impl AsRef<str>,
		file_id: impl AsRef<str>,
	) -> Result<ApiResponse> {
		let file_id = parse_id::<FileId>(file_id.as_ref())?;
		let path = self.menu_path(rich_menu_id.as_ref(), "/content")?;
		let body = serde_json::json!({ "fileId": file_id });

		Ok(ApiResponse::from(self.client.post(&path, &body).await?))
	}

	/// Downloads the menu image through the redirect the API answers with.
	pub async fn get_image(&self, rich_menu_id: impl AsRef<str>) -> Result<RichMenuImageResponse> {
		let path = self.menu_path(rich_menu_id.as_ref(), "/content")?;
		let location = self.client.redirect_location(&path, &[]).await?;

		Ok(RichMenuImageResponse::from(self.client.get_external(&location).await?))
	}

	/// Registers, uploads, and attaches the image at `image_path`.
	pub async fn upload_image(
		&self,
		rich_menu_id: impl AsRef<str>,
		image_path: impl AsRef<Path>,
	) -> Result<ApiResponse> {
		let rich_menu_id = parse_id::<RichMenuId>(rich_menu_id.as_ref())?;
		let image_path = image_path.as_ref();
		let attachment = AttachmentClient::new(self.client).create(image_path, None).await?;
		let attachments_url = || self.client.endpoint(&bot_path(self.client, "/attachments"));
		let Some(upload_url) = attachment.upload_url() else {
			return Err(ApiError::MissingField {
				field: "uploadUrl",
				url: attachments_url()?.to_string(),
			}
			.into());
		};
		let uploaded = UploadClient::new(self.client).upload(&upload_url, image_path, None).await?;
		let Some(file_id) = uploaded.file_id().or_else(|| attachment.file_id()) else {
			return Err(ApiError::MissingField { field: "fileId", url: upload_url }.into());
		};

		self.set_image(rich_menu_id, file_id).await
	}

	fn menu_path(&self, rich_menu_id: &str, rest: &str) -> Result<String, ApiError> {
		let rich_menu_id = parse_id::<RichMenuId>(rich_menu_id)?;

		Ok(bot_path(self.client, &format!("/richmenus/{rich_menu_id}{rest}")))
	}

	fn user_path(&self, account_id: &str) -> Result<String, ApiError> {
		let account_id = parse_id::<AccountId>(account_id)?;

		Ok(bot_path(self.client, &format!("/users/{account_id}/richmenus")))
	}
}
