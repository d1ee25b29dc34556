//! # Host Event System
//!
//! The contract between the game host and its plugins.
//!
//! The host turns engine callbacks into typed events on an [`EventSystem`]
//! (`core:entity_death`, `core:chat_command`, `core:server_save`) and hands
//! each plugin a [`ServerContext`] through which it reaches the outside world:
//! push notifications, chat replies, permissions, localized messages and
//! persisted JSON objects.
//!
//! ```rust,no_run
//! use host_event_system::*;
//! use std::sync::Arc;
//!
//! struct Greeter;
//!
//! #[async_trait]
//! impl SimplePlugin for Greeter {
//!     fn name(&self) -> &str { "greeter" }
//!     fn version(&self) -> &str { "1.0.0" }
//!
//!     async fn register_handlers(
//!         &mut self,
//!         events: Arc<EventSystem>,
//!         context: Arc<dyn ServerContext>,
//!     ) -> Result<(), PluginError> {
//!         let chat = context.chat();
//!         events
//!             .on_core(host_event_system::events::CHAT_COMMAND, move |event: ChatCommandEvent| {
//!                 if event.command == "hello" {
//!                     chat.reply(event.player.id, "Hello!");
//!                 }
//!                 Ok(())
//!             })
//!             .await?;
//!         Ok(())
//!     }
//! }
//! ```

pub mod context;
pub mod error;
pub mod events;
pub mod plugin;
pub mod system;
pub mod types;

pub use async_trait::async_trait;
pub use context::{
    ChatService, DataStore, DataStoreExt, Localization, Notification, NotificationChannel,
    NotificationKind, PairingData, PermissionService, ServerContext,
};
pub use error::{EventError, PluginError, ServerError, StoreError};
pub use events::{ChatCommandEvent, EntityDeathEvent, ServerSaveEvent};
pub use plugin::{LogLevel, SimplePlugin};
pub use system::{Event, EventHandler, EventSystem, EventSystemStats, TypedEventHandler};
pub use types::{
    AuthorizedPlayer, BuildingGrade, BuildingPrivilege, DestroyedEntity, EntityKind, HitInfo,
    PlayerId, PlayerInfo, Position,
};

use std::sync::Arc;

/// Current Unix time in seconds, or 0 if the clock sits before the epoch.
pub fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

pub fn create_event_system() -> Arc<EventSystem> {
    Arc::new(EventSystem::new())
}
