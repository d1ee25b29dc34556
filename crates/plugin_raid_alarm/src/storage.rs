//! Persistence of the opt-out set.
//!
//! The set is always written whole; there is no incremental update and no
//! schema version. On disk it is a sorted JSON array of player ids.

use crate::error::RaidAlarmResult;
use host_event_system::{DataStore, DataStoreExt, PlayerId};
use std::collections::HashSet;
use tracing::{debug, info};

/// Name of the plugin's object in the data store.
pub const DATA_NAME: &str = "RaidAlarm";

/// Loads the opt-out set; a store that has never been written yields an empty set.
///
/// A present but unreadable object is an error rather than an empty set, so a
/// later save cannot silently wipe everyone's preference.
pub fn load_preferences(store: &dyn DataStore) -> RaidAlarmResult<HashSet<PlayerId>> {
    match store.read_typed::<HashSet<PlayerId>>(DATA_NAME)? {
        Some(opted_out) => {
            info!("Loaded {} raid alarm opt-outs", opted_out.len());
            Ok(opted_out)
        }
        None => {
            debug!("No raid alarm data yet, starting with an empty opt-out list");
            Ok(HashSet::new())
        }
    }
}

pub fn save_preferences(store: &dyn DataStore, opted_out: &HashSet<PlayerId>) -> RaidAlarmResult<()> {
    let mut ids: Vec<PlayerId> = opted_out.iter().copied().collect();
    ids.sort_unstable();
    store.write_typed(DATA_NAME, &ids)?;
    debug!("Saved {} raid alarm opt-outs", ids.len());
    Ok(())
}
