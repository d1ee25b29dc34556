//! Error types for the event bus, host services and plugin lifecycle.

use std::path::PathBuf;

/// Errors raised while registering, emitting or handling events.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Serialization failed when converting event to bytes
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Deserialization failed when converting bytes to event
    #[error("Deserialization error: {0}")]
    Deserialization(serde_json::Error),
    /// Handler execution failed during event processing
    #[error("Handler execution error: {0}")]
    HandlerExecution(String),
}

/// Errors returned by plugin lifecycle hooks.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Plugin initialization failed during startup
    #[error("Plugin initialization failed: {0}")]
    InitializationFailed(String),
    /// Error occurred during plugin execution
    #[error("Plugin execution error: {0}")]
    ExecutionError(String),
    /// Runtime error such as a poisoned lock or failed save
    #[error("Plugin runtime error: {0}")]
    Runtime(String),
}

impl From<EventError> for PluginError {
    fn from(e: EventError) -> Self {
        PluginError::ExecutionError(e.to_string())
    }
}

/// Errors raised by host services a plugin calls into.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The push notification channel refused or failed the request
    #[error("Notification error: {0}")]
    Notification(String),
    /// Internal server error (invalid state, missing service, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by a persisted object store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to create directory {0}: {1}")]
    DirectoryCreate(PathBuf, std::io::Error),

    #[error("Failed to read file {0}: {1}")]
    FileRead(PathBuf, std::io::Error),

    #[error("Failed to write file {0}: {1}")]
    FileWrite(PathBuf, std::io::Error),

    #[error("Failed to rename file from {0} to {1}: {2}")]
    FileRename(PathBuf, PathBuf, std::io::Error),

    #[error("Failed to serialize object {0}: {1}")]
    Serialization(String, serde_json::Error),

    #[error("Failed to deserialize object {0}: {1}")]
    Deserialization(String, serde_json::Error),

    #[error("Invalid object name: {0}")]
    InvalidName(String),
}
