//! Feeds newline-delimited JSON frames onto the event bus.
//!
//! Each line is one frame:
//!
//! ```json
//! {"namespace":"core","event":"entity_death","data":{...}}
//! ```
//!
//! `core` frames are emitted as host events; any other namespace is treated
//! as a plugin name. Blank lines and `#` comments are ignored.

use host_event_system::EventSystem;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostFrame {
    pub namespace: String,
    pub event: String,
    #[serde(default = "empty_payload")]
    pub data: serde_json::Value,
}

fn empty_payload() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub routed: u64,
    pub skipped: u64,
}

pub async fn route_frame(events: &EventSystem, frame: &HostFrame) -> anyhow::Result<()> {
    if frame.namespace == "core" {
        events.emit_core(&frame.event, &frame.data).await?;
    } else {
        events
            .emit_plugin(&frame.namespace, &frame.event, &frame.data)
            .await?;
    }
    Ok(())
}

/// Routes every frame until the reader is exhausted.
pub async fn replay_lines<R>(events: &EventSystem, reader: R) -> anyhow::Result<ReplayStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = ReplayStats::default();
    let mut lines = reader.lines();
    let mut line_number = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let frame: HostFrame = match serde_json::from_str(line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("⚠️ Skipping malformed frame on line {}: {}", line_number, e);
                stats.skipped += 1;
                continue;
            }
        };

        debug!("Routing {}:{} from line {}", frame.namespace, frame.event, line_number);
        match route_frame(events, &frame).await {
            Ok(()) => stats.routed += 1,
            Err(e) => {
                warn!("⚠️ Failed to route line {}: {}", line_number, e);
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}
