//! Host services exposed to plugins.
//!
//! A plugin never talks to the game engine directly. Everything it needs from
//! the outside world (push notifications, chat replies, permissions,
//! localized text, persisted objects) comes through [`ServerContext`] and the
//! narrow service traits below, which keeps plugins testable against fakes.

use crate::error::{ServerError, StoreError};
use crate::plugin::LogLevel;
use crate::types::PlayerId;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Companion-app channel a push notification is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    SmartAlarm,
}

/// Opaque server pairing metadata attached to every push notification.
///
/// The companion app uses it to find its way back to the server; plugins
/// pass it through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairingData(pub BTreeMap<String, String>);

/// A push notification addressed to one or more players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub recipients: Vec<PlayerId>,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub pairing: PairingData,
}

/// Outbound push channel to players' mobile devices.
pub trait NotificationChannel: Send + Sync {
    fn send_notification(&self, notification: &Notification) -> Result<(), ServerError>;
}

/// Named permission registry.
pub trait PermissionService: Send + Sync {
    fn register_permission(&self, permission: &str, owner: &str);

    fn user_has_permission(&self, player: PlayerId, permission: &str) -> bool;
}

/// In-game chat replies.
pub trait ChatService: Send + Sync {
    fn reply(&self, player: PlayerId, message: &str);
}

/// Message catalog keyed by plugin and message key.
///
/// `get_message` resolves in the player's language when one is given and
/// known, falls back to English, and finally returns the key itself.
pub trait Localization: Send + Sync {
    fn register_messages(&self, plugin: &str, language: &str, messages: HashMap<String, String>);

    fn get_message(&self, key: &str, plugin: &str, player: Option<PlayerId>) -> String;
}

/// Whole-object JSON store addressed by name.
pub trait DataStore: Send + Sync {
    fn exists(&self, name: &str) -> bool;

    /// Returns `Ok(None)` when no object with that name has been written yet.
    fn read_object(&self, name: &str) -> Result<Option<serde_json::Value>, StoreError>;

    fn write_object(&self, name: &str, value: &serde_json::Value) -> Result<(), StoreError>;
}

/// Typed helpers over any [`DataStore`].
pub trait DataStoreExt {
    fn read_typed<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError>;

    fn write_typed<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError>;
}

impl<S: DataStore + ?Sized> DataStoreExt for S {
    fn read_typed<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        match self.read_object(name)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StoreError::Deserialization(name.to_string(), e)),
            None => Ok(None),
        }
    }

    fn write_typed<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)
            .map_err(|e| StoreError::Serialization(name.to_string(), e))?;
        self.write_object(name, &value)
    }
}

/// Everything the host offers a running plugin.
pub trait ServerContext: Send + Sync {
    /// Logs through the host's logging pipeline, tagged with the plugin origin.
    fn log(&self, level: LogLevel, message: &str);

    /// Edge length of the square world map, in world units.
    fn world_size(&self) -> u32;

    fn notifications(&self) -> Arc<dyn NotificationChannel>;

    fn permissions(&self) -> Arc<dyn PermissionService>;

    fn chat(&self) -> Arc<dyn ChatService>;

    fn lang(&self) -> Arc<dyn Localization>;

    /// Store for plugin data files (player sets, tables).
    fn data_files(&self) -> Arc<dyn DataStore>;

    /// Store for plugin configuration files.
    fn config_files(&self) -> Arc<dyn DataStore>;

    fn pairing_data(&self) -> PairingData;
}
