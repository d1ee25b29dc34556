//! Message keys, English defaults and placeholder formatting.

use host_event_system::{Localization, PlayerId};
use std::collections::HashMap;

pub const TITLE: &str = "AlarmTitle";
pub const BODY: &str = "AlarmBody";
pub const HELP: &str = "AlarmHelp";
pub const HELP_COMMANDS: &str = "AlarmHelpCommands";
pub const STATUS_ENABLED: &str = "AlarmStatusEnabled";
pub const STATUS_DISABLED: &str = "AlarmStatusDisabled";
pub const TEST_SENT: &str = "AlarmTestSent";
pub const TEST_DESTROYED: &str = "AlarmTestDestroyedItem";
pub const NO_PERMISSION: &str = "AlarmNoPermission";

pub const DEFAULT_LANGUAGE: &str = "en";

pub fn default_messages() -> HashMap<String, String> {
    [
        (TITLE, "You're getting raided!"),
        (BODY, "{0} destroyed at {1}"),
        (
            HELP,
            "To receive Raid Alarm notifications, you need the official Rust+ companion app on \
             your mobile device and pair it with this server. To do this, press Esc and click \
             \"Rust+\" in main menu.\n\nUse /raidalarm test to test your alarm. To disable it, \
             use /raidalarm disable",
        ),
        (
            HELP_COMMANDS,
            "Available commands:\n/raidalarm status|enable|disable|test",
        ),
        (STATUS_ENABLED, "Raid Alarm is enabled."),
        (STATUS_DISABLED, "Raid Alarm is disabled."),
        (
            TEST_SENT,
            "Test notification sent. If you don't receive it, make sure you're paired with the server.",
        ),
        (TEST_DESTROYED, "chair"),
        (NO_PERMISSION, "You don't have permission to use this command."),
    ]
    .into_iter()
    .map(|(key, text)| (key.to_string(), text.to_string()))
    .collect()
}

/// Looks a key up for this plugin, in the player's language when given.
pub fn message(lang: &dyn Localization, key: &str, player: Option<PlayerId>) -> String {
    lang.get_message(key, crate::PLUGIN_NAME, player)
}

/// Substitutes positional `{0}`, `{1}`, ... placeholders.
///
/// Placeholders without a matching argument are left as written. Argument text
/// is inserted verbatim and never re-scanned.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let substituted = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });

        match substituted {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
