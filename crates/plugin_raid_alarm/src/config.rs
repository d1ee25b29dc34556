use crate::error::RaidAlarmResult;
use host_event_system::{DataStore, DataStoreExt};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Name of the plugin's object in the config store.
pub const CONFIG_NAME: &str = "RaidAlarm";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Only players holding `raidalarm.use` get alarms and may use the command.
    #[serde(rename = "usePermissions", default)]
    pub use_permissions: bool,
}

/// Reads the config and writes it straight back so the file always exists in
/// its current shape. A missing config is created with defaults; an unreadable
/// one is an error and the stored object is left alone.
pub fn load_config(store: &dyn DataStore) -> RaidAlarmResult<PluginConfig> {
    let config = match store.read_typed::<PluginConfig>(CONFIG_NAME) {
        Ok(Some(config)) => config,
        Ok(None) => {
            info!("Creating a new configuration file for {}", CONFIG_NAME);
            PluginConfig::default()
        }
        Err(e) => {
            error!("Configuration for {} is unreadable: {}", CONFIG_NAME, e);
            return Err(e.into());
        }
    };

    store.write_typed(CONFIG_NAME, &config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RaidAlarmError;
    use crate::testing::MemoryStore;
    use serde_json::json;

    #[test]
    fn missing_config_is_created_with_defaults() {
        let store = MemoryStore::default();

        let config = load_config(&store).unwrap();

        assert_eq!(config, PluginConfig::default());
        assert_eq!(
            store.get(CONFIG_NAME),
            Some(json!({ "usePermissions": false }))
        );
    }

    #[test]
    fn existing_config_is_kept_and_normalized() {
        let store = MemoryStore::default();
        store.put(CONFIG_NAME, json!({ "usePermissions": true, "legacy": 3 }));

        let config = load_config(&store).unwrap();

        assert!(config.use_permissions);
        assert_eq!(store.get(CONFIG_NAME), Some(json!({ "usePermissions": true })));
    }

    #[test]
    fn unreadable_config_is_an_error_and_left_untouched() {
        let store = MemoryStore::default();
        store.put(CONFIG_NAME, json!({ "usePermissions": 1 }));

        let result = load_config(&store);

        assert!(matches!(result, Err(RaidAlarmError::Store(_))));
        assert_eq!(store.get(CONFIG_NAME), Some(json!({ "usePermissions": 1 })));
    }
}
