// self
use crate::_prelude::*;

/// Severity attached to log messages, ordered from most to least verbose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	/// Request/response tracing.
	#[default]
	Debug,
	/// Routine events.
	Info,
	/// Recoverable anomalies.
	Warning,
	/// Failures surfaced to the caller.
	Error,
}
impl LogLevel {
	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			LogLevel::Debug => "debug",
			LogLevel::Info => "info",
			LogLevel::Warning => "warning",
			LogLevel::Error => "error",
		}
	}
}
impl Display for LogLevel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Logging collaborator receiving request tracing and error reports.
pub trait Logger
where
	Self: Send + Sync,
{
	/// Emits one message with a JSON object of structured context.
	fn log(&self, level: LogLevel, message: &str, context: &Json);
}

/// Logger that drops every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;
impl Logger for NoopLogger {
	fn log(&self, _: LogLevel, _: &str, _: &Json) {}
}

/// Logger that forwards messages as `tracing` events under the `lineworks_client` target.
#[cfg(feature = "tracing")]
#[derive(Clone, Debug, Default)]
pub struct TracingLogger {
	channel: Option<String>,
}
#[cfg(feature = "tracing")]
impl TracingLogger {
	/// Tags every event with the given channel name.
	pub fn with_channel(channel: impl Into<String>) -> Self {
		Self { channel: Some(channel.into()) }
	}
}
#[cfg(feature = "tracing")]
impl Logger for TracingLogger {
	fn log(&self, level: LogLevel, message: &str, context: &Json) {
		let channel = self.channel.as_deref().unwrap_or("default");

		match level {
			LogLevel::Debug =>
				tracing::debug!(target: "lineworks_client", channel, %context, "{message}"),
			LogLevel::Info =>
				tracing::info!(target: "lineworks_client", channel, %context, "{message}"),
			LogLevel::Warning =>
				tracing::warn!(target: "lineworks_client", channel, %context, "{message}"),
			LogLevel::Error =>
				tracing::error!(target: "lineworks_client", channel, %context, "{message}"),
		}
	}
}

/// Applies logging settings in front of a [`Logger`]: the enabled switch, the minimum level,
/// and the component prefix.
#[derive(Clone)]
pub struct LogSink {
	logger: Arc<dyn Logger>,
	enabled: bool,
	level: LogLevel,
	prefix: String,
}
impl LogSink {
	/// Creates an enabled sink.
	pub fn new(logger: Arc<dyn Logger>, level: LogLevel, prefix: impl Into<String>) -> Self {
		Self { logger, enabled: true, level, prefix: prefix.into() }
	}

	/// Sink that never emits.
	pub fn disabled() -> Self {
		Self {
			logger: Arc::new(NoopLogger),
			enabled: false,
			level: LogLevel::Error,
			prefix: String::new(),
		}
	}

	/// Overrides the enabled switch.
	pub fn with_enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;

		self
	}

	/// Derives a sink sharing the same logger under another component prefix.
	pub fn scoped(&self, prefix: impl Into<String>) -> Self {
		Self { prefix: prefix.into(), ..self.clone() }
	}

	/// Returns true when messages at `level` would be emitted.
	pub fn enabled_for(&self, level: LogLevel) -> bool {
		self.enabled && level >= self.level
	}

	/// Emits `message` when the sink admits `level`.
	pub fn log(&self, level: LogLevel, message: &str, context: Json) {
		if !self.enabled_for(level) {
			return;
		}

		let line = if self.prefix.is_empty() {
			message.to_owned()
		} else {
			format!("{} {message}", self.prefix)
		};

		self.logger.log(level, &line, &context);
	}

	/// Emits a debug message.
	pub fn debug(&self, message: &str, context: Json) {
		self.log(LogLevel::Debug, message, context);
	}

	/// Emits an error message.
	pub fn error(&self, message: &str, context: Json) {
		self.log(LogLevel::Error, message, context);
	}
}
impl Debug for LogSink {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LogSink")
			.field("enabled", &self.enabled)
			.field("level", &self.level)
			.field("prefix", &self.prefix)
			.finish()
	}
}
