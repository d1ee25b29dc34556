//! Plugin lifecycle.

use crate::context::ServerContext;
use crate::error::PluginError;
use crate::system::EventSystem;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Lifecycle every plugin goes through:
///
/// 1. construction
/// 2. [`register_handlers`](SimplePlugin::register_handlers) before any event flows
/// 3. [`on_init`](SimplePlugin::on_init) to load config and data
/// 4. events
/// 5. [`on_shutdown`](SimplePlugin::on_shutdown) to persist state
///
/// Handlers are plain synchronous closures. Anything they share with the
/// plugin lives behind an `Arc`.
#[async_trait]
pub trait SimplePlugin: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    async fn register_handlers(
        &mut self,
        events: Arc<EventSystem>,
        context: Arc<dyn ServerContext>,
    ) -> Result<(), PluginError>;

    async fn on_init(&mut self, _context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
        Ok(())
    }

    /// Shutdown errors are logged by the host but never stop it from exiting.
    async fn on_shutdown(&mut self, _context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
        Ok(())
    }
}

/// Severity for [`ServerContext::log`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(s)
    }
}
