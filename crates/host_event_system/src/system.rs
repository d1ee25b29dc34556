//! The typed event bus connecting the host to its plugins.
//!
//! Events are routed by string key:
//!
//! - `core:<event>` for host events such as `core:entity_death`
//! - `plugin:<plugin>:<event>` for plugin-to-plugin traffic
//!
//! Each event is serialized once to JSON and every handler registered for the
//! key deserializes it into the type it asked for. A handler that fails is
//! logged and counted; it never stops the remaining handlers from running.

use crate::error::EventError;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, trace};

/// Anything that can travel over the bus.
///
/// Implemented automatically for every `Serialize + DeserializeOwned` type, so
/// event structs only need the usual serde derives.
pub trait Event: Send + Sync + Any + std::fmt::Debug {
    fn type_name() -> &'static str
    where
        Self: Sized;

    fn serialize(&self) -> Result<Vec<u8>, EventError>;

    fn deserialize(data: &[u8]) -> Result<Self, EventError>
    where
        Self: Sized;
}

impl<T> Event for T
where
    T: Serialize + DeserializeOwned + Send + Sync + Any + std::fmt::Debug + 'static,
{
    fn type_name() -> &'static str {
        std::any::type_name::<T>()
    }

    fn serialize(&self) -> Result<Vec<u8>, EventError> {
        serde_json::to_vec(self).map_err(EventError::Serialization)
    }

    fn deserialize(data: &[u8]) -> Result<Self, EventError> {
        serde_json::from_slice(data).map_err(EventError::Deserialization)
    }
}

/// Type-erased handler stored in the bus.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, data: &[u8]) -> Result<(), EventError>;

    fn handler_name(&self) -> &str;
}

/// Adapts a plain closure over a concrete event type to [`EventHandler`].
pub struct TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(T) -> Result<(), EventError> + Send + Sync,
{
    handler: F,
    name: String,
    _phantom: std::marker::PhantomData<fn(T)>,
}

impl<T, F> TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(T) -> Result<(), EventError> + Send + Sync,
{
    pub fn new(name: String, handler: F) -> Self {
        Self {
            handler,
            name,
            _phantom: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<T, F> EventHandler for TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(T) -> Result<(), EventError> + Send + Sync,
{
    async fn handle(&self, data: &[u8]) -> Result<(), EventError> {
        let event = T::deserialize(data)?;
        (self.handler)(event)
    }

    fn handler_name(&self) -> &str {
        &self.name
    }
}

/// Counters exposed for health logging.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventSystemStats {
    pub total_handlers: usize,
    pub events_emitted: u64,
    pub handler_failures: u64,
}

/// Central registry of handlers keyed by event key.
pub struct EventSystem {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
    stats: RwLock<EventSystemStats>,
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSystem {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            stats: RwLock::new(EventSystemStats::default()),
        }
    }

    /// Registers a handler for a host event, e.g. `on_core("entity_death", ..)`.
    pub async fn on_core<T, F>(&self, event_name: &str, handler: F) -> Result<(), EventError>
    where
        T: Event + 'static,
        F: Fn(T) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.register_typed_handler(format!("core:{}", event_name), handler)
            .await
    }

    /// Registers a handler for an event published by another plugin.
    pub async fn on_plugin<T, F>(
        &self,
        plugin_name: &str,
        event_name: &str,
        handler: F,
    ) -> Result<(), EventError>
    where
        T: Event + 'static,
        F: Fn(T) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.register_typed_handler(format!("plugin:{}:{}", plugin_name, event_name), handler)
            .await
    }

    async fn register_typed_handler<T, F>(&self, event_key: String, handler: F) -> Result<(), EventError>
    where
        T: Event + 'static,
        F: Fn(T) -> Result<(), EventError> + Send + Sync + 'static,
    {
        let handler_name = format!("{}::{}", event_key, T::type_name());
        let handler: Arc<dyn EventHandler> = Arc::new(TypedEventHandler::new(handler_name, handler));

        self.handlers
            .write()
            .await
            .entry(event_key.clone())
            .or_default()
            .push(handler);
        self.stats.write().await.total_handlers += 1;

        info!("📝 Registered handler for {}", event_key);
        Ok(())
    }

    pub async fn emit_core<T>(&self, event_name: &str, event: &T) -> Result<(), EventError>
    where
        T: Event,
    {
        self.emit_event(&format!("core:{}", event_name), event).await
    }

    pub async fn emit_plugin<T>(
        &self,
        plugin_name: &str,
        event_name: &str,
        event: &T,
    ) -> Result<(), EventError>
    where
        T: Event,
    {
        self.emit_event(&format!("plugin:{}:{}", plugin_name, event_name), event)
            .await
    }

    /// Serializes once and runs every handler for the key in registration order.
    ///
    /// Only a serialization failure is returned; handler failures are logged.
    async fn emit_event<T>(&self, event_key: &str, event: &T) -> Result<(), EventError>
    where
        T: Event,
    {
        let data = event.serialize()?;
        let handlers = self.handlers.read().await;

        let Some(event_handlers) = handlers.get(event_key) else {
            trace!("No handlers for event: {}", event_key);
            return Ok(());
        };

        debug!("📤 Emitting {} to {} handlers", event_key, event_handlers.len());

        let mut failures = 0u64;
        for handler in event_handlers {
            if let Err(e) = handler.handle(&data).await {
                error!("❌ Handler {} failed: {}", handler.handler_name(), e);
                failures += 1;
            }
        }

        let mut stats = self.stats.write().await;
        stats.events_emitted += 1;
        stats.handler_failures += failures;
        Ok(())
    }

    pub async fn handler_count(&self, event_key: &str) -> usize {
        self.handlers
            .read()
            .await
            .get(event_key)
            .map_or(0, Vec::len)
    }

    pub async fn get_stats(&self) -> EventSystemStats {
        self.stats.read().await.clone()
    }
}
