//! Rich menu replies.

// self
use crate::{
	_prelude::*,
	client::RawResponse,
	id::RichMenuId,
	response::{def_response, int_field, next_cursor, string_field},
};

def_response! { RichMenuResponse, "Rich menu detail, also returned by rich menu creation." }
impl RichMenuResponse {
	/// Menu identifier (`richmenuId`, or `richMenuId` on older replies).
	pub fn rich_menu_id(&self) -> Option<RichMenuId> {
		string_field(&self.0, "richmenuId")
			.or_else(|| string_field(&self.0, "richMenuId"))
			.and_then(|id| RichMenuId::new(id).ok())
	}

	/// Menu name.
	pub fn name(&self) -> Option<String> {
		string_field(&self.0, "richmenuName")
	}

	/// Chat bar label.
	pub fn chat_bar_text(&self) -> Option<String> {
		string_field(&self.0, "chatBarText")
	}

	/// Menu width in pixels.
	pub fn width(&self) -> Option<i64> {
		self.0.get("size").and_then(Json::as_object).and_then(|size| int_field(size, "width"))
	}

	/// Menu height in pixels.
	pub fn height(&self) -> Option<i64> {
		self.0.get("size").and_then(Json::as_object).and_then(|size| int_field(size, "height"))
	}

	/// Tap areas as returned by the API.
	pub fn areas(&self) -> &[Json] {
		self.0.get("areas").and_then(Json::as_array).map(Vec::as_slice).unwrap_or_default()
	}

	/// Whether the menu opens expanded.
	pub fn is_selected(&self) -> bool {
		self.0.get("selected").and_then(Json::as_bool).unwrap_or(false)
	}
}

def_response! { RichMenuListResponse, "Page of rich menus." }
impl RichMenuListResponse {
	/// Menus on this page.
	pub fn rich_menus(&self) -> Vec<RichMenuResponse> {
		self.0
			.get("richmenus")
			.and_then(Json::as_array)
			.map(|menus| menus.iter().cloned().map(RichMenuResponse::from).collect())
			.unwrap_or_default()
	}

	/// Number of menus on this page.
	pub fn count(&self) -> usize {
		self.0.get("richmenus").and_then(Json::as_array).map_or(0, Vec::len)
	}

	/// Cursor for the next page.
	pub fn next_cursor(&self) -> Option<String> {
		next_cursor(&self.0)
	}
}

def_response! { RichMenuBindingResponse, "Default or per-user rich menu binding." }
impl RichMenuBindingResponse {
	/// Bound menu identifier.
	pub fn rich_menu_id(&self) -> Option<RichMenuId> {
		string_field(&self.0, "richmenuId")
			.or_else(|| string_field(&self.0, "richMenuId"))
			.and_then(|id| RichMenuId::new(id).ok())
	}
}

/// Rich menu image fetched through the two-step download.
#[derive(Clone, Debug)]
pub struct RichMenuImageResponse {
	download_url: String,
	content_type: Option<String>,
	image: Vec<u8>,
}
impl RichMenuImageResponse {
	/// Location the image was fetched from.
	pub fn download_url(&self) -> &str {
		&self.download_url
	}

	/// Image media type, when the server reported one.
	pub fn content_type(&self) -> Option<&str> {
		self.content_type.as_deref()
	}

	/// Raw image bytes.
	pub fn image(&self) -> &[u8] {
		&self.image
	}

	/// Returns true when any bytes were received.
	pub fn has_image(&self) -> bool {
		!self.image.is_empty()
	}

	/// Consumes the response, returning the image bytes.
	pub fn into_image(self) -> Vec<u8> {
		self.image
	}
}
impl From<RawResponse> for RichMenuImageResponse {
	fn from(raw: RawResponse) -> Self {
		Self { download_url: raw.url, content_type: raw.content_type, image: raw.body }
	}
}
