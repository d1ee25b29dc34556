//! Raid detection and alarm dispatch.
//!
//! [`RaidNotifier`] owns every piece of mutable plugin state: the opt-out set,
//! the per-grid raid-block table and the global debounce instant. The
//! plugin keeps exactly one behind a mutex and feeds it host events.

use crate::classify::is_raid_entity;
use crate::clock::Clock;
use crate::config::PluginConfig;
use crate::error::RaidAlarmResult;
use crate::grid::grid_label;
use crate::lang::{self, format_message};
use chrono::{DateTime, Duration, Utc};
use host_event_system::{
    BuildingPrivilege, EntityDeathEvent, Notification, NotificationKind, PermissionService,
    PlayerId, ServerContext,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, trace};

/// Permission gating both alarms and the chat command when enabled.
pub const PERMISSION_USE: &str = "raidalarm.use";

/// Minimum spacing between two processed raid events, server wide.
pub fn debounce_window() -> std::time::Duration {
    std::time::Duration::from_secs(1)
}

/// How long a grid cell stays raid-blocked after an alarm.
pub fn raid_block_window() -> Duration {
    Duration::hours(1)
}

/// An alarm that went out, published to other plugins as `raid_detected`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaidAlert {
    pub grid: String,
    pub entity: String,
    pub initiator: PlayerId,
    pub recipients: Vec<PlayerId>,
    pub detected_at: DateTime<Utc>,
}

pub struct RaidNotifier {
    config: PluginConfig,
    opted_out: HashSet<PlayerId>,
    raid_blocks: HashMap<String, DateTime<Utc>>,
    last_raid: Option<Instant>,
    clock: Arc<dyn Clock>,
}

impl RaidNotifier {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            config: PluginConfig::default(),
            opted_out: HashSet::new(),
            raid_blocks: HashMap::new(),
            last_raid: None,
            clock,
        }
    }

    /// Replaces config and preferences with freshly loaded ones.
    pub fn load(&mut self, config: PluginConfig, opted_out: HashSet<PlayerId>) {
        self.config = config;
        self.opted_out = opted_out;
    }

    pub fn opted_out(&self) -> &HashSet<PlayerId> {
        &self.opted_out
    }

    pub fn is_opted_out(&self, player: PlayerId) -> bool {
        self.opted_out.contains(&player)
    }

    /// Returns whether the player was previously opted out.
    pub fn enable(&mut self, player: PlayerId) -> bool {
        self.opted_out.remove(&player)
    }

    /// Returns whether the player was newly opted out.
    pub fn disable(&mut self, player: PlayerId) -> bool {
        self.opted_out.insert(player)
    }

    /// Whether permission gating lets this player take part at all.
    pub fn may_use(&self, player: PlayerId, permissions: &dyn PermissionService) -> bool {
        !self.config.use_permissions || permissions.user_has_permission(player, PERMISSION_USE)
    }

    /// Whether an alarm fired for this grid cell within the last hour.
    pub fn is_raid_blocked(&self, grid: &str) -> bool {
        let now = self.clock.now();
        self.raid_blocks
            .get(grid)
            .is_some_and(|at| now - *at < raid_block_window())
    }

    pub fn raid_block_count(&self) -> usize {
        self.raid_blocks.len()
    }

    /// Runs the detection pipeline for one destroyed entity.
    ///
    /// Returns the alert when a notification was dispatched. Every guard that
    /// does not hold ends the pipeline silently with `Ok(None)`.
    pub fn handle_destruction(
        &mut self,
        event: &EntityDeathEvent,
        host: &dyn ServerContext,
    ) -> RaidAlarmResult<Option<RaidAlert>> {
        let entity = &event.entity;

        let Some(hit_info) = event.hit_info.as_ref() else {
            return Ok(None);
        };
        if !is_raid_entity(&entity.kind) {
            return Ok(None);
        }
        let Some(initiator) = hit_info.initiator.as_ref() else {
            trace!("{} destroyed without a player initiator", entity.short_name);
            return Ok(None);
        };

        let tick = self.clock.monotonic();
        if let Some(last) = self.last_raid {
            if tick.saturating_duration_since(last) < debounce_window() {
                trace!("Raid event for {} debounced", entity.short_name);
                return Ok(None);
            }
        }
        self.last_raid = Some(tick);
        let now = self.clock.now();

        let Some(privilege) = entity.building_privilege.as_ref().filter(|p| !p.is_empty()) else {
            debug!("{} destroyed outside any building privilege", entity.short_name);
            return Ok(None);
        };

        let permissions = host.permissions();
        let Some(recipients) = self.resolve_recipients(privilege, initiator.id, permissions.as_ref())
        else {
            debug!(
                "Player {} destroyed {} on a base they are authorized on",
                initiator.id, entity.short_name
            );
            return Ok(None);
        };

        let grid = grid_label(entity.position, host.world_size());
        self.record_raid_block(&grid, now);

        if recipients.is_empty() {
            debug!("Raid at {} has nobody left to notify", grid);
            return Ok(None);
        }

        let lang = host.lang();
        let title = lang::message(lang.as_ref(), lang::TITLE, None);
        let body = format_message(
            &lang::message(lang.as_ref(), lang::BODY, None),
            &[entity.short_name.as_str(), grid.as_str()],
        );

        host.notifications().send_notification(&Notification {
            recipients: recipients.clone(),
            kind: NotificationKind::SmartAlarm,
            title,
            body,
            pairing: host.pairing_data(),
        })?;

        info!(
            "🚨 Raid alarm: {} destroyed at {} by {}, notified {} player(s)",
            entity.short_name,
            grid,
            initiator.id,
            recipients.len()
        );

        Ok(Some(RaidAlert {
            grid,
            entity: entity.short_name.clone(),
            initiator: initiator.id,
            recipients,
            detected_at: now,
        }))
    }

    /// Picks who hears about a raid, in privilege list order.
    ///
    /// `None` means the initiator is authorized on the building, in which
    /// case nobody is told.
    fn resolve_recipients(
        &self,
        privilege: &BuildingPrivilege,
        initiator: PlayerId,
        permissions: &dyn PermissionService,
    ) -> Option<Vec<PlayerId>> {
        let mut recipients = Vec::with_capacity(privilege.authorized_players.len());

        for entry in privilege.authorized_players.iter().flatten() {
            let player = entry.user_id;
            if !self.may_use(player, permissions) {
                continue;
            }
            if player == initiator {
                return None;
            }
            if self.opted_out.contains(&player) {
                continue;
            }
            recipients.push(player);
        }

        Some(recipients)
    }

    /// Records an alarm for a cell and drops entries past the block window.
    fn record_raid_block(&mut self, grid: &str, now: DateTime<Utc>) {
        self.raid_blocks.retain(|_, at| now - *at < raid_block_window());
        self.raid_blocks.insert(grid.to_string(), now);
    }
}
