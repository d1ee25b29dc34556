//! # Raid Alarm
//!
//! Pushes a "You're getting raided!" notification to every player authorized
//! on a base when another player destroys one of its doors or upgraded
//! building blocks. Players opt out with `/raidalarm disable`; the opt-out
//! list survives restarts through the host's data store.
//!
//! Besides the push notification, each alarm is published on the bus as
//! `plugin:RaidAlarm:raid_detected` carrying a [`RaidAlert`], and the grid
//! cell it happened in stays raid-blocked for an hour. Other plugins query
//! that through a [`RaidAlarmHandle`].

pub mod classify;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod grid;
pub mod lang;
pub mod notifier;
pub mod storage;

#[cfg(test)]
mod testing;

pub use clock::{Clock, SystemClock};
pub use config::PluginConfig;
pub use error::{RaidAlarmError, RaidAlarmResult};
pub use notifier::{RaidAlert, RaidNotifier, PERMISSION_USE};

use async_trait::async_trait;
use host_event_system::events::{CHAT_COMMAND, ENTITY_DEATH, SERVER_SAVE};
use host_event_system::{
    ChatCommandEvent, EntityDeathEvent, EventSystem, LogLevel, PlayerId,
    PluginError, Position, ServerContext, ServerSaveEvent, SimplePlugin,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info, warn};

pub const PLUGIN_NAME: &str = "RaidAlarm";
pub const PLUGIN_VERSION: &str = "0.2.0";

/// Event published under `plugin:RaidAlarm:` for every alarm sent.
pub const RAID_DETECTED: &str = "raid_detected";

fn lock(state: &Mutex<RaidNotifier>) -> RaidAlarmResult<MutexGuard<'_, RaidNotifier>> {
    state.lock().map_err(|_| RaidAlarmError::StatePoisoned)
}

pub struct RaidAlarmPlugin {
    state: Arc<Mutex<RaidNotifier>>,
}

impl RaidAlarmPlugin {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(RaidNotifier::new(clock))),
        }
    }

    /// Read-only view of the plugin state for other plugins.
    pub fn handle(&self) -> RaidAlarmHandle {
        RaidAlarmHandle {
            state: self.state.clone(),
        }
    }

    fn save(&self, context: &dyn ServerContext) -> RaidAlarmResult<()> {
        let opted_out = lock(&self.state)?.opted_out().clone();
        storage::save_preferences(context.data_files().as_ref(), &opted_out)
    }
}

impl Default for RaidAlarmPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct RaidAlarmHandle {
    state: Arc<Mutex<RaidNotifier>>,
}

impl RaidAlarmHandle {
    /// Whether an alarm fired within the last hour in the grid cell holding `position`.
    pub fn is_raid_blocked_at(&self, position: Position, world_size: u32) -> RaidAlarmResult<bool> {
        self.is_grid_raid_blocked(&grid::grid_label(position, world_size))
    }

    pub fn is_grid_raid_blocked(&self, grid: &str) -> RaidAlarmResult<bool> {
        Ok(lock(&self.state)?.is_raid_blocked(grid))
    }

    pub fn is_opted_out(&self, player: PlayerId) -> RaidAlarmResult<bool> {
        Ok(lock(&self.state)?.is_opted_out(player))
    }
}

#[async_trait]
impl SimplePlugin for RaidAlarmPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn version(&self) -> &str {
        PLUGIN_VERSION
    }

    async fn register_handlers(
        &mut self,
        events: Arc<EventSystem>,
        context: Arc<dyn ServerContext>,
    ) -> Result<(), PluginError> {
        info!("🚨 RaidAlarm: Registering event handlers...");

        let state = self.state.clone();
        let host = context.clone();
        let bus = events.clone();
        events
            .on_core(ENTITY_DEATH, move |event: EntityDeathEvent| {
                let alert = lock(&state)?.handle_destruction(&event, host.as_ref())?;
                if let Some(alert) = alert {
                    publish_alert(bus.clone(), alert);
                }
                Ok(())
            })
            .await?;

        let state = self.state.clone();
        let host = context.clone();
        events
            .on_core(CHAT_COMMAND, move |event: ChatCommandEvent| {
                if !event.command.eq_ignore_ascii_case(commands::COMMAND) {
                    return Ok(());
                }
                let mut notifier = lock(&state)?;
                commands::handle_command(&mut notifier, &event.player, &event.args, host.as_ref())?;
                Ok(())
            })
            .await?;

        let state = self.state.clone();
        let host = context;
        events
            .on_core(SERVER_SAVE, move |_event: ServerSaveEvent| {
                let opted_out = lock(&state)?.opted_out().clone();
                storage::save_preferences(host.data_files().as_ref(), &opted_out)?;
                Ok(())
            })
            .await?;

        info!("🚨 RaidAlarm: ✅ All handlers registered successfully!");
        Ok(())
    }

    async fn on_init(&mut self, context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
        context
            .permissions()
            .register_permission(PERMISSION_USE, PLUGIN_NAME);
        context.lang().register_messages(
            PLUGIN_NAME,
            lang::DEFAULT_LANGUAGE,
            lang::default_messages(),
        );

        let config = config::load_config(context.config_files().as_ref())?;
        let opted_out = storage::load_preferences(context.data_files().as_ref())
            .map_err(|e| PluginError::InitializationFailed(e.to_string()))?;

        let opted_out_count = opted_out.len();
        lock(&self.state)?.load(config.clone(), opted_out);

        context.log(
            LogLevel::Info,
            &format!(
                "🚨 RaidAlarm: Initialized (permissions {}, {} opted out)",
                if config.use_permissions { "on" } else { "off" },
                opted_out_count
            ),
        );
        Ok(())
    }

    async fn on_shutdown(&mut self, context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
        self.save(context.as_ref())?;
        context.log(LogLevel::Info, "🚨 RaidAlarm: Preferences saved, shutting down");
        Ok(())
    }
}

/// Emits `raid_detected` from a background task; handlers cannot await.
///
/// Publication is best-effort. The push notification has already gone out,
/// and without a tokio runtime the alert is dropped with a warning.
fn publish_alert(events: Arc<EventSystem>, alert: RaidAlert) {
    match tokio::runtime::Handle::try_current() {
        Ok(runtime) => {
            runtime.spawn(async move {
                if let Err(e) = events.emit_plugin(PLUGIN_NAME, RAID_DETECTED, &alert).await {
                    error!("❌ RaidAlarm: Failed to publish raid alert: {}", e);
                }
            });
        }
        Err(_) => {
            warn!("RaidAlarm: No runtime available, raid alert for {} not published", alert.grid);
        }
    }
}
