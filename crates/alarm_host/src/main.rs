//! Raid alarm host.
//!
//! Loads `config.toml`, wires the raid alarm plugin to file-backed storage and
//! logging stand-ins for the game services, then feeds it events from an
//! NDJSON replay file or stdin until the input ends or a shutdown signal
//! arrives.

mod cli;
mod config;
mod logging;
mod replay;
mod services;
mod signals;
mod store;

use cli::CliArgs;
use config::AppConfig;
use host_event_system::events::SERVER_SAVE;
use host_event_system::{
    create_event_system, current_timestamp, EventSystem, ServerContext, ServerSaveEvent,
    SimplePlugin,
};
use plugin_raid_alarm::RaidAlarmPlugin;
use services::HostContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub struct Application {
    config: AppConfig,
    events: Arc<EventSystem>,
    context: Arc<HostContext>,
    plugin: RaidAlarmPlugin,
    replay: Option<PathBuf>,
}

impl Application {
    pub async fn new(args: CliArgs) -> anyhow::Result<Self> {
        // Load configuration first (before logging setup)
        let mut config = AppConfig::load_from_file(&args.config_path).await?;

        if let Some(data_dir) = args.data_dir {
            config.storage.data_dir = data_dir.to_string_lossy().to_string();
        }
        if let Some(log_level) = args.log_level {
            config.logging.level = log_level;
        }
        if args.json_logs {
            config.logging.json_format = true;
        }

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;

        logging::setup_logging(&config.logging)?;
        info!(
            "🚀 Raid Alarm Host v{} | Config: {}",
            env!("CARGO_PKG_VERSION"),
            args.config_path.display()
        );

        Self::build(config, args.replay).await
    }

    async fn build(config: AppConfig, replay: Option<PathBuf>) -> anyhow::Result<Self> {
        let events = create_event_system();
        let context = Arc::new(HostContext::from_config(&config)?);
        let plugin_context: Arc<dyn ServerContext> = context.clone();

        let mut plugin = RaidAlarmPlugin::new();
        plugin
            .register_handlers(events.clone(), plugin_context.clone())
            .await?;
        plugin.on_init(plugin_context).await?;
        info!("🔌 Loaded plugin {} v{}", plugin.name(), plugin.version());

        Ok(Self {
            config,
            events,
            context,
            plugin,
            replay,
        })
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("📋 Configuration Summary:");
        info!("  🌍 World size: {}", self.config.server.world_size);
        info!("  💾 Data directory: {}", self.config.storage.data_dir);
        info!("  ⏱️ Save interval: {}s", self.config.server.save_interval_secs);

        let saver = spawn_save_ticker(self.events.clone(), self.config.server.save_interval_secs);

        let outcome = tokio::select! {
            result = feed_input(&self.events, self.replay.clone()) => {
                result.map(|stats| {
                    info!("📥 Input finished: {} frames routed, {} skipped", stats.routed, stats.skipped);
                })
            }
            result = signals::wait_for_shutdown_signal() => {
                info!("🛑 Shutdown signal received, initiating graceful shutdown...");
                result
            }
        };

        if let Some(saver) = saver {
            saver.abort();
        }
        self.shutdown().await;

        outcome
    }

    async fn shutdown(&mut self) {
        emit_save(&self.events).await;

        let context: Arc<dyn ServerContext> = self.context.clone();
        if let Err(e) = self.plugin.on_shutdown(context).await {
            error!("❌ Plugin {} failed to shut down cleanly: {}", self.plugin.name(), e);
        }

        let stats = self.events.get_stats().await;
        info!("📊 Final Statistics:");
        info!("  - Events processed: {}", stats.events_emitted);
        info!("  - Handler failures: {}", stats.handler_failures);
        info!("  - Push notifications sent: {}", self.context.notifications.sent_count());
        info!("👋 Raid Alarm Host shutdown complete");
    }
}

async fn emit_save(events: &EventSystem) {
    let event = ServerSaveEvent {
        timestamp: current_timestamp(),
    };
    if let Err(e) = events.emit_core(SERVER_SAVE, &event).await {
        warn!("⚠️ Failed to emit server_save: {}", e);
    }
}

/// Emits `server_save` every `interval_secs`; zero disables it.
fn spawn_save_ticker(events: Arc<EventSystem>, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        return None;
    }

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            emit_save(&events).await;
        }
    }))
}

async fn feed_input(
    events: &EventSystem,
    replay: Option<PathBuf>,
) -> anyhow::Result<replay::ReplayStats> {
    match replay {
        Some(path) => {
            info!("▶️ Replaying events from {}", path.display());
            let file = tokio::fs::File::open(&path).await?;
            replay::replay_lines(events, BufReader::new(file)).await
        }
        None => {
            info!("▶️ Reading events from stdin");
            replay::replay_lines(events, BufReader::new(tokio::io::stdin())).await
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let args = CliArgs::parse();

    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("❌ Failed to start application: {:?}", e);
            std::process::exit(1);
        }
    }
}
