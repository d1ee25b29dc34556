//! Host implementations of the plugin-facing services.

use crate::config::AppConfig;
use crate::store::JsonFileStore;
use dashmap::DashMap;
use host_event_system::{
    ChatService, DataStore, Localization, LogLevel, Notification,
    NotificationChannel, PairingData, PermissionService, PlayerId, ServerContext, ServerError,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// Stand-in for the companion-app push relay: every push is logged.
#[derive(Debug, Default)]
pub struct LoggingNotificationChannel {
    sent: AtomicU64,
}

impl LoggingNotificationChannel {
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

impl NotificationChannel for LoggingNotificationChannel {
    fn send_notification(&self, notification: &Notification) -> Result<(), ServerError> {
        if notification.recipients.is_empty() {
            return Err(ServerError::Notification(
                "notification has no recipients".to_string(),
            ));
        }

        let payload = serde_json::to_string(notification)
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        info!(
            "📱 Push [{:?}] to {} player(s): {} | {}",
            notification.kind,
            notification.recipients.len(),
            notification.title,
            notification.body
        );
        debug!("Push payload: {}", payload);

        self.sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct PermissionRegistry {
    registered: DashMap<String, String>,
    grants: DashMap<PlayerId, HashSet<String>>,
}

impl PermissionRegistry {
    pub fn grant(&self, player: PlayerId, permission: &str) {
        self.grants
            .entry(player)
            .or_default()
            .insert(permission.to_string());
    }
}

impl PermissionService for PermissionRegistry {
    fn register_permission(&self, permission: &str, owner: &str) {
        if let Some(previous) = self
            .registered
            .insert(permission.to_string(), owner.to_string())
        {
            if previous != owner {
                warn!("Permission {} re-registered by {} (was {})", permission, owner, previous);
            }
        }
        debug!("Registered permission {} for {}", permission, owner);
    }

    fn user_has_permission(&self, player: PlayerId, permission: &str) -> bool {
        self.grants
            .get(&player)
            .is_some_and(|granted| granted.contains(permission))
    }
}

/// Chat replies go to the log; the host has no game chat of its own.
#[derive(Debug, Default)]
pub struct ConsoleChat;

impl ChatService for ConsoleChat {
    fn reply(&self, player: PlayerId, message: &str) {
        info!("💬 [to {}] {}", player, message);
    }
}

/// Per-plugin message catalogs with per-player language selection.
#[derive(Debug)]
pub struct MessageCatalog {
    default_language: String,
    messages: DashMap<(String, String), HashMap<String, String>>,
    player_languages: DashMap<PlayerId, String>,
}

impl MessageCatalog {
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
            messages: DashMap::new(),
            player_languages: DashMap::new(),
        }
    }

    pub fn set_player_language(&self, player: PlayerId, language: &str) {
        self.player_languages.insert(player, language.to_string());
    }

    fn lookup(&self, plugin: &str, language: &str, key: &str) -> Option<String> {
        self.messages
            .get(&(plugin.to_string(), language.to_string()))
            .and_then(|catalog| catalog.get(key).cloned())
    }
}

impl Localization for MessageCatalog {
    fn register_messages(&self, plugin: &str, language: &str, messages: HashMap<String, String>) {
        let count = messages.len();
        self.messages
            .entry((plugin.to_string(), language.to_string()))
            .or_default()
            .extend(messages);
        debug!("Registered {} {} messages for {}", count, language, plugin);
    }

    fn get_message(&self, key: &str, plugin: &str, player: Option<PlayerId>) -> String {
        let language = player
            .and_then(|p| self.player_languages.get(&p).map(|l| l.value().clone()))
            .unwrap_or_else(|| self.default_language.clone());

        self.lookup(plugin, &language, key)
            .or_else(|| self.lookup(plugin, &self.default_language, key))
            .unwrap_or_else(|| {
                warn!("Missing message {} for plugin {}", key, plugin);
                key.to_string()
            })
    }
}

/// Everything a plugin can reach on this host.
pub struct HostContext {
    world_size: u32,
    pub notifications: Arc<LoggingNotificationChannel>,
    pub permissions: Arc<PermissionRegistry>,
    pub chat: Arc<ConsoleChat>,
    pub lang: Arc<MessageCatalog>,
    data: Arc<JsonFileStore>,
    config: Arc<JsonFileStore>,
    pairing: PairingData,
}

impl HostContext {
    /// Builds the services from a validated config.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let root = config.data_dir();
        let data = JsonFileStore::open(root.join("data"))?;
        let plugin_config = JsonFileStore::open(root.join("config"))?;
        info!(
            "💾 Object stores: {} and {}",
            data.dir().display(),
            plugin_config.dir().display()
        );

        let permissions = PermissionRegistry::default();
        for (player, permission) in config.permission_grants().map_err(anyhow::Error::msg)? {
            permissions.grant(player, &permission);
        }

        let lang = MessageCatalog::new(config.server.default_language.clone());
        for (player, language) in config.player_languages().map_err(anyhow::Error::msg)? {
            lang.set_player_language(player, &language);
        }

        let mut pairing = config.pairing.clone();
        pairing
            .entry("name".to_string())
            .or_insert_with(|| config.server.server_name.clone());

        Ok(Self {
            world_size: config.server.world_size,
            notifications: Arc::new(LoggingNotificationChannel::default()),
            permissions: Arc::new(permissions),
            chat: Arc::new(ConsoleChat),
            lang: Arc::new(lang),
            data: Arc::new(data),
            config: Arc::new(plugin_config),
            pairing: PairingData(pairing),
        })
    }
}

impl ServerContext for HostContext {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => error!("{}", message),
            LogLevel::Warn => warn!("{}", message),
            LogLevel::Info => info!("{}", message),
            LogLevel::Debug => debug!("{}", message),
            LogLevel::Trace => trace!("{}", message),
        }
    }

    fn world_size(&self) -> u32 {
        self.world_size
    }

    fn notifications(&self) -> Arc<dyn NotificationChannel> {
        self.notifications.clone()
    }

    fn permissions(&self) -> Arc<dyn PermissionService> {
        self.permissions.clone()
    }

    fn chat(&self) -> Arc<dyn ChatService> {
        self.chat.clone()
    }

    fn lang(&self) -> Arc<dyn Localization> {
        self.lang.clone()
    }

    fn data_files(&self) -> Arc<dyn DataStore> {
        self.data.clone()
    }

    fn config_files(&self) -> Arc<dyn DataStore> {
        self.config.clone()
    }

    fn pairing_data(&self) -> PairingData {
        self.pairing.clone()
    }
}
