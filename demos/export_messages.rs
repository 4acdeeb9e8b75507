//! Downloads the last 24 hours of message contents and prints per-sender counts.
//!
//! Requires the `monitoring.read` scope on the app (`LINEWORKS_SCOPE="bot monitoring.read"`).

// std
use std::collections::BTreeMap;
// crates.io
use color_eyre::Result;
use time::{Duration, OffsetDateTime};
// self
use lineworks_client::{LineWorks, bot::MessageContentsQuery, config::Settings};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let lineworks = LineWorks::new(Settings::from_env()?);
	let bot = lineworks.default_bot()?;
	let end = OffsetDateTime::now_utc();
	let query = MessageContentsQuery::between(end - Duration::days(1), end)?
		.bot_message_filter("include");
	let export = bot.message_contents().download(&query).await?;
	let mut per_sender = BTreeMap::<&str, usize>::new();

	for message in export.messages() {
		*per_sender.entry(message.sender.as_str()).or_default() += 1;
	}

	println!("{} messages ({} from bots).", export.message_count(), export.bot_messages().len());

	for (sender, count) in per_sender {
		println!("{count:>6}  {sender}");
	}

	Ok(())
}
