//! The `/raidalarm` chat command.

use crate::error::RaidAlarmResult;
use crate::grid::grid_label;
use crate::lang::{self, format_message};
use crate::notifier::RaidNotifier;
use host_event_system::{Notification, NotificationKind, PlayerInfo, ServerContext};
use tracing::{debug, info};

pub const COMMAND: &str = "raidalarm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    Status,
    Enable,
    Disable,
    Test,
    Unknown,
}

impl Subcommand {
    pub fn parse(arg: &str) -> Self {
        match arg.to_lowercase().as_str() {
            "status" => Subcommand::Status,
            "enable" => Subcommand::Enable,
            "disable" => Subcommand::Disable,
            "test" => Subcommand::Test,
            _ => Subcommand::Unknown,
        }
    }
}

/// Runs `/raidalarm [args]` for a player. Every path ends in exactly one reply.
pub fn handle_command(
    notifier: &mut RaidNotifier,
    player: &PlayerInfo,
    args: &[String],
    host: &dyn ServerContext,
) -> RaidAlarmResult<()> {
    let lang = host.lang();
    let chat = host.chat();
    let text = |key: &str| lang::message(lang.as_ref(), key, Some(player.id));

    if !notifier.may_use(player.id, host.permissions().as_ref()) {
        chat.reply(player.id, &text(lang::NO_PERMISSION));
        return Ok(());
    }

    let Some(first) = args.first() else {
        chat.reply(player.id, &text(lang::HELP));
        return Ok(());
    };

    let subcommand = Subcommand::parse(first);
    debug!("Player {} ran /{} {:?}", player.id, COMMAND, subcommand);

    match subcommand {
        Subcommand::Status => {
            let key = if notifier.is_opted_out(player.id) {
                lang::STATUS_DISABLED
            } else {
                lang::STATUS_ENABLED
            };
            chat.reply(player.id, &text(key));
        }
        Subcommand::Enable => {
            if notifier.enable(player.id) {
                info!("Player {} enabled raid alarms", player.id);
            }
            chat.reply(player.id, &text(lang::STATUS_ENABLED));
        }
        Subcommand::Disable => {
            if notifier.disable(player.id) {
                info!("Player {} disabled raid alarms", player.id);
            }
            chat.reply(player.id, &text(lang::STATUS_DISABLED));
        }
        Subcommand::Test => {
            if notifier.is_opted_out(player.id) {
                chat.reply(player.id, &text(lang::STATUS_DISABLED));
                return Ok(());
            }

            let grid = grid_label(player.position, host.world_size());
            let item = text(lang::TEST_DESTROYED);
            host.notifications().send_notification(&Notification {
                recipients: vec![player.id],
                kind: NotificationKind::SmartAlarm,
                title: text(lang::TITLE),
                body: format_message(&text(lang::BODY), &[item.as_str(), grid.as_str()]),
                pairing: host.pairing_data(),
            })?;
            chat.reply(player.id, &text(lang::TEST_SENT));
        }
        Subcommand::Unknown => {
            chat.reply(player.id, &text(lang::HELP_COMMANDS));
        }
    }

    Ok(())
}
