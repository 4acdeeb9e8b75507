//! Multi-bot entry point.
//!
//! [`LineWorks`] owns the [`Settings`] and builds one [`LineWorksClient`] per configured bot on
//! first use. Every client it builds shares the same cache registry and HTTP connection pool, so
//! tokens cached by one handle are visible to the next. Without an injected transport, the pool
//! is built with the first client and reused for the rest.

// self
use crate::{
	_prelude::*,
	bot::BotClient,
	cache::CacheStores,
	client::LineWorksClient,
	config::Settings,
	http::ReqwestHttpClient,
	obs::Logger,
};

/// Lazily built, memoized clients for every bot in [`Settings::bots`].
pub struct LineWorks {
	settings: Settings,
	http_client: RwLock<Option<ReqwestHttpClient>>,
	cache_stores: CacheStores,
	logger: Option<Arc<dyn Logger>>,
	single_flight: bool,
	clients: RwLock<HashMap<String, LineWorksClient>>,
}
impl LineWorks {
	/// Creates a manager with an in-memory default cache store.
	pub fn new(settings: Settings) -> Self {
		Self {
			settings,
			http_client: RwLock::new(None),
			cache_stores: CacheStores::default(),
			logger: None,
			single_flight: false,
			clients: RwLock::new(HashMap::new()),
		}
	}

	/// Shares `http_client` across every bot.
	pub fn with_http_client(mut self, http_client: ReqwestHttpClient) -> Self {
		self.http_client = RwLock::new(Some(http_client));

		self
	}

	/// Registry from which `cache.store` is resolved.
	pub fn with_cache_stores(mut self, cache_stores: CacheStores) -> Self {
		self.cache_stores = cache_stores;

		self
	}

	/// Logger receiving diagnostics when `logging.enabled` is set.
	pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
		self.logger = Some(logger);

		self
	}

	/// Serializes concurrent token exchanges per bot.
	pub fn with_single_flight(mut self, enabled: bool) -> Self {
		self.single_flight = enabled;

		self
	}

	/// Loaded settings.
	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Configured bot names.
	pub fn bot_names(&self) -> impl Iterator<Item = &str> {
		self.settings.bots.keys().map(String::as_str)
	}

	/// Transport for `name`, or for the default bot when `None`.
	pub fn bot_client(&self, name: Option<&str>) -> Result<LineWorksClient> {
		let name = self.settings.resolve_bot_name(name)?;

		if let Some(client) = self.clients.read().get(name) {
			return Ok(client.clone());
		}

		let mut clients = self.clients.write();

		if let Some(client) = clients.get(name) {
			return Ok(client.clone());
		}

		let client = self.build(name)?;

		clients.insert(name.to_owned(), client.clone());

		Ok(client)
	}

	/// Resource clients for `name`, or for the default bot when `None`.
	pub fn bot(&self, name: Option<&str>) -> Result<BotClient> {
		Ok(self.bot_client(name)?.bot())
	}

	/// Resource clients for the default bot.
	pub fn default_bot(&self) -> Result<BotClient> {
		self.bot(None)
	}

	/// Drops memoized clients; the next lookup rebuilds them from settings.
	pub fn forget_clients(&self) {
		self.clients.write().clear();
	}

	fn build(&self, name: &str) -> Result<LineWorksClient> {
		let mut builder = LineWorksClient::builder(name, &self.settings)
			.http_client(self.transport()?)
			.cache_stores(self.cache_stores.clone())
			.single_flight(self.single_flight);

		if let Some(logger) = &self.logger {
			builder = builder.logger(logger.clone());
		}

		builder.build()
	}

	fn transport(&self) -> Result<ReqwestHttpClient> {
		if let Some(http_client) = self.http_client.read().as_ref() {
			return Ok(http_client.clone());
		}

		let mut slot = self.http_client.write();

		if let Some(http_client) = slot.as_ref() {
			return Ok(http_client.clone());
		}

		let http_client = ReqwestHttpClient::new()?;

		*slot = Some(http_client.clone());

		Ok(http_client)
	}
}
impl Debug for LineWorks {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LineWorks")
			.field("default_bot", &self.settings.default_bot)
			.field("bots", &self.settings.bots.keys().collect::<Vec<_>>())
			.field("clients", &self.clients.read().len())
			.finish()
	}
}
