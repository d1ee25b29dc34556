use host_event_system::{EventError, PluginError, ServerError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RaidAlarmError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Notification error: {0}")]
    Notification(#[from] ServerError),

    #[error("Raid alarm state lock poisoned")]
    StatePoisoned,
}

impl From<RaidAlarmError> for PluginError {
    fn from(e: RaidAlarmError) -> Self {
        match e {
            RaidAlarmError::Store(_) => PluginError::Runtime(e.to_string()),
            _ => PluginError::ExecutionError(e.to_string()),
        }
    }
}

impl From<RaidAlarmError> for EventError {
    fn from(e: RaidAlarmError) -> Self {
        EventError::HandlerExecution(e.to_string())
    }
}

pub type RaidAlarmResult<T> = Result<T, RaidAlarmError>;
