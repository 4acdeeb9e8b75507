//! Sends a text message to one user with credentials taken from `LINEWORKS_*` variables.
//!
//! ```sh
//! LINEWORKS_SERVICE_ACCOUNT=... LINEWORKS_PRIVATE_KEY=./private.key LINEWORKS_CLIENT_ID=... \
//! LINEWORKS_CLIENT_SECRET=... LINEWORKS_BOT_ID=... LINEWORKS_DOMAIN_ID=... \
//!     cargo run --example send_message -- user@example.com "Hello from Rust"
//! ```

// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use lineworks_client::{LineWorks, config::Settings};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut args = std::env::args().skip(1);
	let account_id = args.next().ok_or_else(|| eyre!("usage: send_message <account-id> [text]"))?;
	let text = args.next().unwrap_or_else(|| "Hello from lineworks-client.".into());
	let lineworks = LineWorks::new(Settings::from_env()?);
	let bot = lineworks.default_bot()?;
	let response = bot.message().send_text(&account_id, text).await?;

	println!(
		"Sent to {account_id} as bot {} (message id: {}).",
		bot.client().bot_id(),
		response.message_id().as_deref().unwrap_or("n/a")
	);

	Ok(())
}
