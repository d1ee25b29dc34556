//! Core host events delivered to plugins.
//!
//! All of these are emitted in the `core` namespace; the constants below are
//! the event names plugins register against with [`EventSystem::on_core`].
//!
//! [`EventSystem::on_core`]: crate::EventSystem::on_core

use crate::types::{DestroyedEntity, HitInfo, PlayerInfo};
use serde::{Deserialize, Serialize};

/// A combat entity was destroyed.
pub const ENTITY_DEATH: &str = "entity_death";
/// A player typed a chat command.
pub const CHAT_COMMAND: &str = "chat_command";
/// The host is persisting world state; plugins should save too.
pub const SERVER_SAVE: &str = "server_save";

/// Emitted when a combat entity dies.
///
/// `hit_info` is absent when the host could not attribute the damage at all
/// (decay, admin removal and the like).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDeathEvent {
    pub entity: DestroyedEntity,
    #[serde(default)]
    pub hit_info: Option<HitInfo>,
    #[serde(default)]
    pub timestamp: u64,
}

/// Emitted for every `/command` a player sends in chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCommandEvent {
    pub player: PlayerInfo,
    /// Command name without the leading slash.
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Emitted on the host's periodic save and once more before shutdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerSaveEvent {
    #[serde(default)]
    pub timestamp: u64,
}
