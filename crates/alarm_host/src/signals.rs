//! Shutdown signal handling.
//!
//! The host stops feeding events and saves plugin state when the process is
//! asked to terminate.

use tokio::signal;
use tracing::info;

/// Waits until the process is asked to shut down.
///
/// Raced against the input feed in [`crate::Application::run`], so either the
/// replay ending or a signal triggers the final save.
///
/// # Platform Support
///
/// * **Unix platforms**: SIGINT and SIGTERM
/// * **Windows**: Ctrl+C
///
/// # Returns
///
/// `Ok(())` once a shutdown signal arrives, or an error if the signal
/// listeners could not be installed.
pub async fn wait_for_shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => {
                info!("📡 Received SIGINT");
            }
            _ = sigterm.recv() => {
                info!("📡 Received SIGTERM");
            }
        }
    }

    #[cfg(windows)]
    {
        signal::ctrl_c().await?;
        info!("📡 Received Ctrl+C");
    }

    Ok(())
}
