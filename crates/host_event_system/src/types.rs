//! Core value types shared between the host and its plugins.
//!
//! These mirror what the game engine hands to plugins when something happens
//! in the world: who did it, what was hit, and where it stood.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable 64-bit account identifier for a player.
///
/// Serialized as a bare number so persisted player sets stay readable.
///
/// ```rust
/// use host_event_system::PlayerId;
///
/// let id: PlayerId = "76561198000000001".parse().unwrap();
/// assert_eq!(id, PlayerId(76561198000000001));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

/// A position in world space.
///
/// `x` runs west to east, `z` runs south to north and `y` is height. The
/// world origin sits at the centre of the map.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Construction grade of a building block, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingGrade {
    Twigs,
    Wood,
    Stone,
    Metal,
    TopTier,
}

/// What kind of combat entity was destroyed.
///
/// The host adapter collapses its own entity hierarchy into this closed set;
/// everything a plugin does not care about is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    Door,
    BuildingBlock { grade: BuildingGrade },
    Other,
}

/// A player entry on a building privilege (tool cupboard) list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedPlayer {
    pub user_id: PlayerId,
    #[serde(default)]
    pub username: String,
}

/// The building privilege covering an entity.
///
/// Entries can be null when the host lost track of an account, so the list is
/// kept as `Option`s and consumers decide how to treat holes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingPrivilege {
    #[serde(default)]
    pub authorized_players: Vec<Option<AuthorizedPlayer>>,
}

impl BuildingPrivilege {
    pub fn is_empty(&self) -> bool {
        self.authorized_players.is_empty()
    }
}

/// An online player as seen by the host at the moment of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub position: Position,
}

/// A combat entity that has just been destroyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestroyedEntity {
    /// Short prefab name, e.g. `door.hinged.wood`.
    pub short_name: String,
    pub kind: EntityKind,
    pub position: Position,
    #[serde(default)]
    pub building_privilege: Option<BuildingPrivilege>,
}

/// Attribution for the damage that destroyed an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitInfo {
    /// The player who dealt the final blow, if any.
    #[serde(default)]
    pub initiator: Option<PlayerInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_serializes_as_bare_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
        let back: PlayerId = serde_json::from_str("42").unwrap();
        assert_eq!(back, PlayerId(42));
    }

    #[test]
    fn player_id_parses_with_whitespace() {
        assert_eq!(" 7 ".parse::<PlayerId>().unwrap(), PlayerId(7));
        assert!("seven".parse::<PlayerId>().is_err());
    }

    #[test]
    fn grades_are_ordered_weakest_first() {
        assert!(BuildingGrade::Twigs < BuildingGrade::Wood);
        assert!(BuildingGrade::Metal < BuildingGrade::TopTier);
    }

    #[test]
    fn entity_kind_uses_tagged_json() {
        let kind: EntityKind =
            serde_json::from_str(r#"{"type":"building_block","grade":"stone"}"#).unwrap();
        assert_eq!(
            kind,
            EntityKind::BuildingBlock {
                grade: BuildingGrade::Stone
            }
        );

        let door: EntityKind = serde_json::from_str(r#"{"type":"door"}"#).unwrap();
        assert_eq!(door, EntityKind::Door);
    }

    #[test]
    fn privilege_keeps_null_entries() {
        let privilege: BuildingPrivilege = serde_json::from_str(
            r#"{"authorized_players":[{"user_id":1,"username":"a"},null]}"#,
        )
        .unwrap();
        assert_eq!(privilege.authorized_players.len(), 2);
        assert!(privilege.authorized_players[1].is_none());
    }
}
