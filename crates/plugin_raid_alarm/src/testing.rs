//! In-memory fakes for every host service, shared by the unit and scenario tests.

use crate::clock::Clock;
use crate::lang;
use chrono::{DateTime, Duration, Utc};
use host_event_system::{
    AuthorizedPlayer, BuildingPrivilege, ChatService, DataStore, DestroyedEntity, EntityDeathEvent,
    EntityKind, EventSystem, HitInfo, Localization, LogLevel, Notification, NotificationChannel,
    PairingData, PermissionService, PlayerId, PlayerInfo, Position, ServerContext, ServerError,
    StoreError,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

pub const WORLD_SIZE: u32 = 3000;

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    origin: Instant,
    elapsed: Mutex<std::time::Duration>,
}

impl ManualClock {
    pub fn starting_now() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Utc::now()),
            origin: Instant::now(),
            elapsed: Mutex::new(std::time::Duration::ZERO),
        })
    }

    /// Lets time pass on both the wall and the monotonic clock.
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
        *self.elapsed.lock().unwrap() += by.to_std().unwrap();
    }

    /// Moves only the wall clock, like an NTP correction.
    pub fn step_wall(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn monotonic(&self) -> Instant {
        self.origin + *self.elapsed.lock().unwrap()
    }
}

#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<Notification>>,
    failing: AtomicBool,
}

impl RecordingChannel {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl NotificationChannel for RecordingChannel {
    fn send_notification(&self, notification: &Notification) -> Result<(), ServerError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ServerError::Notification("push service unavailable".into()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePermissions {
    registered: Mutex<Vec<(String, String)>>,
    grants: Mutex<HashSet<(PlayerId, String)>>,
}

impl FakePermissions {
    pub fn grant(&self, player: PlayerId, permission: &str) {
        self.grants
            .lock()
            .unwrap()
            .insert((player, permission.to_string()));
    }

    pub fn registered(&self) -> Vec<(String, String)> {
        self.registered.lock().unwrap().clone()
    }
}

impl PermissionService for FakePermissions {
    fn register_permission(&self, permission: &str, owner: &str) {
        self.registered
            .lock()
            .unwrap()
            .push((permission.to_string(), owner.to_string()));
    }

    fn user_has_permission(&self, player: PlayerId, permission: &str) -> bool {
        self.grants
            .lock()
            .unwrap()
            .contains(&(player, permission.to_string()))
    }
}

#[derive(Default)]
pub struct RecordingChat {
    replies: Mutex<Vec<(PlayerId, String)>>,
}

impl RecordingChat {
    pub fn replies(&self) -> Vec<(PlayerId, String)> {
        self.replies.lock().unwrap().clone()
    }

    pub fn last_reply_to(&self, player: PlayerId) -> Option<String> {
        self.replies
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| *to == player)
            .map(|(_, message)| message.clone())
    }
}

impl ChatService for RecordingChat {
    fn reply(&self, player: PlayerId, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push((player, message.to_string()));
    }
}

/// Catalog keyed by `(plugin, language, key)` with per-player languages.
#[derive(Default)]
pub struct FakeLang {
    messages: Mutex<HashMap<(String, String, String), String>>,
    languages: Mutex<HashMap<PlayerId, String>>,
}

impl FakeLang {
    pub fn set_language(&self, player: PlayerId, language: &str) {
        self.languages
            .lock()
            .unwrap()
            .insert(player, language.to_string());
    }

    fn lookup(&self, plugin: &str, language: &str, key: &str) -> Option<String> {
        self.messages
            .lock()
            .unwrap()
            .get(&(plugin.to_string(), language.to_string(), key.to_string()))
            .cloned()
    }
}

impl Localization for FakeLang {
    fn register_messages(&self, plugin: &str, language: &str, messages: HashMap<String, String>) {
        let mut catalog = self.messages.lock().unwrap();
        for (key, text) in messages {
            catalog.insert((plugin.to_string(), language.to_string(), key), text);
        }
    }

    fn get_message(&self, key: &str, plugin: &str, player: Option<PlayerId>) -> String {
        let language = player.and_then(|p| self.languages.lock().unwrap().get(&p).cloned());
        language
            .and_then(|language| self.lookup(plugin, &language, key))
            .or_else(|| self.lookup(plugin, lang::DEFAULT_LANGUAGE, key))
            .unwrap_or_else(|| key.to_string())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, serde_json::Value>>,
    failing_writes: AtomicBool,
}

impl MemoryStore {
    pub fn get(&self, name: &str) -> Option<serde_json::Value> {
        self.objects.lock().unwrap().get(name).cloned()
    }

    pub fn put(&self, name: &str, value: serde_json::Value) {
        self.objects.lock().unwrap().insert(name.to_string(), value);
    }

    pub fn set_failing_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }
}

impl DataStore for MemoryStore {
    fn exists(&self, name: &str) -> bool {
        self.objects.lock().unwrap().contains_key(name)
    }

    fn read_object(&self, name: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.get(name))
    }

    fn write_object(&self, name: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(StoreError::FileWrite(
                name.into(),
                std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            ));
        }
        self.put(name, value.clone());
        Ok(())
    }
}

pub struct FakeServer {
    pub events: Arc<EventSystem>,
    pub world_size: u32,
    pub notifications: Arc<RecordingChannel>,
    pub permissions: Arc<FakePermissions>,
    pub chat: Arc<RecordingChat>,
    pub lang: Arc<FakeLang>,
    pub data: Arc<MemoryStore>,
    pub config: Arc<MemoryStore>,
    pub pairing: PairingData,
    pub logs: Mutex<Vec<(LogLevel, String)>>,
}

impl FakeServer {
    /// A server whose catalog already holds the plugin's English messages.
    pub fn new() -> Self {
        let lang = Arc::new(FakeLang::default());
        lang.register_messages(crate::PLUGIN_NAME, lang::DEFAULT_LANGUAGE, lang::default_messages());

        Self {
            events: Arc::new(EventSystem::new()),
            world_size: WORLD_SIZE,
            notifications: Arc::default(),
            permissions: Arc::default(),
            chat: Arc::default(),
            lang,
            data: Arc::default(),
            config: Arc::default(),
            pairing: PairingData(BTreeMap::from([
                ("ip".to_string(), "203.0.113.10".to_string()),
                ("port".to_string(), "28082".to_string()),
            ])),
            logs: Mutex::new(Vec::new()),
        }
    }

    pub fn default_text(&self, key: &str) -> String {
        lang::default_messages()
            .remove(key)
            .unwrap_or_else(|| key.to_string())
    }
}

impl ServerContext for FakeServer {
    fn log(&self, level: LogLevel, message: &str) {
        self.logs.lock().unwrap().push((level, message.to_string()));
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

pub fn authorized(id: PlayerId) -> Option<AuthorizedPlayer> {
    Some(AuthorizedPlayer {
        user_id: id,
        username: format!("player{}", id),
    })
}

pub fn player_at(id: PlayerId, position: Position) -> PlayerInfo {
    PlayerInfo {
        id,
        display_name: format!("player{}", id),
        position,
    }
}

/// A wooden door at grid K12 on a 3000 map, destroyed by `initiator`.
pub fn door_event(authorized_players: &[PlayerId], initiator: Option<PlayerId>) -> EntityDeathEvent {
    EntityDeathEvent {
        entity: DestroyedEntity {
            short_name: "door.hinged.wood".to_string(),
            kind: EntityKind::Door,
            position: Position::new(75.0, 2.0, -425.0),
            building_privilege: Some(BuildingPrivilege {
                authorized_players: authorized_players.iter().copied().map(authorized).collect(),
            }),
        },
        hit_info: Some(HitInfo {
            initiator: initiator.map(|id| player_at(id, Position::new(60.0, 2.0, -400.0))),
        }),
        timestamp: 0,
    }
}
