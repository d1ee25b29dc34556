//! Command-line interface for the alarm host.

use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

/// Command line arguments parsed from user input.
///
/// Everything except the config path overrides a value from the config file.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for the data directory
    pub data_dir: Option<PathBuf>,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// NDJSON file to replay instead of reading stdin
    pub replay: Option<PathBuf>,
}

impl CliArgs {
    pub fn parse() -> Self {
        Self::from_matches(&Self::command().get_matches())
    }

    fn command() -> Command {
        Command::new("Raid Alarm Host")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Feeds game server events to the raid alarm plugin")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .default_value("config.toml"),
            )
            .arg(
                Arg::new("data-dir")
                    .short('d')
                    .long("data-dir")
                    .value_name("DIR")
                    .help("Directory for plugin data and config files"),
            )
            .arg(
                Arg::new("log-level")
                    .short('l')
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Log level (trace, debug, info, warn, error)"),
            )
            .arg(
                Arg::new("json-logs")
                    .long("json-logs")
                    .help("Output logs in JSON format")
                    .action(clap::ArgAction::SetTrue),
            )
            .arg(
                Arg::new("replay")
                    .short('r')
                    .long("replay")
                    .value_name("FILE")
                    .help("Replay events from an NDJSON file, then shut down"),
            )
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("config.toml")),
            data_dir: matches.get_one::<String>("data-dir").map(PathBuf::from),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            replay: matches.get_one::<String>("replay").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        let matches = CliArgs::command()
            .try_get_matches_from(std::iter::once("alarm_host").chain(args.iter().copied()))
            .unwrap();
        CliArgs::from_matches(&matches)
    }

    #[test]
    fn defaults() {
        let args = parse(&[]);
        assert_eq!(args.config_path, PathBuf::from("config.toml"));
        assert!(args.data_dir.is_none());
        assert!(args.log_level.is_none());
        assert!(!args.json_logs);
        assert!(args.replay.is_none());
    }

    #[test]
    fn overrides() {
        let args = parse(&[
            "-c",
            "/etc/raid.toml",
            "--data-dir",
            "/var/lib/raid",
            "-l",
            "debug",
            "--json-logs",
            "--replay",
            "session.ndjson",
        ]);
        assert_eq!(args.config_path, PathBuf::from("/etc/raid.toml"));
        assert_eq!(args.data_dir, Some(PathBuf::from("/var/lib/raid")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.json_logs);
        assert_eq!(args.replay, Some(PathBuf::from("session.ndjson")));
    }
}
