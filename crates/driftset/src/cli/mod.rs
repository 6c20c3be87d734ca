//! Command-line interface for driftset.
//!
//! This module provides the CLI structure for the `driftset` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, ListCommand, SetCommand, ShowCommand,
};

use crate::logging::Verbosity;

/// driftset - Keep your drift car chassis setups in one place
///
/// Records camber, toe, shock and rim settings for each car. Run without a
/// command to open the interactive shell.
#[derive(Debug, Parser)]
#[command(name = "driftset")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute (defaults to `shell`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive shell
    Shell,

    /// List cars
    List(ListCommand),

    /// Add a car with every setting blank
    Add(AddCommand),

    /// Show every setting of one car
    Show(ShowCommand),

    /// Change one setting of a car
    Set(SetCommand),

    /// Delete a car
    Delete(DeleteCommand),

    /// List the field keys accepted by `set`
    Fields,

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// The command to run, `shell` when none was given.
    #[must_use]
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Shell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: None,
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "driftset");
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli_with(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_command_factory_still_reachable() {
        let cli = <Cli as CommandFactory>::command();
        assert!(cli.get_subcommands().any(|sub| sub.get_name() == "fields"));
    }

    #[test]
    fn test_no_command_means_shell() {
        let cli = Cli::try_parse_from(["driftset"]).unwrap();
        assert!(matches!(cli.into_command(), Command::Shell));
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from(["driftset", "list", "--search", "rx", "--json"]).unwrap();
        let Command::List(cmd) = cli.into_command() else {
            panic!("expected list");
        };
        assert_eq!(cmd.search.as_deref(), Some("rx"));
        assert!(cmd.json);
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from(["driftset", "add", "Silvia S15"]).unwrap();
        let Command::Add(cmd) = cli.into_command() else {
            panic!("expected add");
        };
        assert_eq!(cmd.name, "Silvia S15");
    }

    #[test]
    fn test_parse_set_with_negative_value() {
        let cli = Cli::try_parse_from([
            "driftset",
            "set",
            "4",
            "front.camber_degree_left",
            "-3.5",
            "--mirror",
        ])
        .unwrap();
        let Command::Set(cmd) = cli.into_command() else {
            panic!("expected set");
        };
        assert_eq!(cmd.id, 4);
        assert_eq!(cmd.field, "front.camber_degree_left");
        assert_eq!(cmd.value, "-3.5");
        assert!(cmd.mirror);
    }

    #[test]
    fn test_parse_set_requires_value() {
        assert!(Cli::try_parse_from(["driftset", "set", "4", "front.rim_offset"]).is_err());
    }

    #[test]
    fn test_parse_delete_and_show() {
        let cli = Cli::try_parse_from(["driftset", "delete", "9", "--yes"]).unwrap();
        assert!(matches!(
            cli.into_command(),
            Command::Delete(DeleteCommand { id: 9, yes: true })
        ));

        let cli = Cli::try_parse_from(["driftset", "show", "2", "-j"]).unwrap();
        assert!(matches!(
            cli.into_command(),
            Command::Show(ShowCommand { id: 2, json: true })
        ));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["driftset", "config", "validate", "--file", "/tmp/c.toml"])
                .unwrap();
        let Command::Config(ConfigCommand::Validate { file }) = cli.into_command() else {
            panic!("expected config validate");
        };
        assert_eq!(file, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_parse_global_flags_after_command() {
        let cli = Cli::try_parse_from(["driftset", "fields", "-c", "/custom/config.toml", "-vv"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_with_quiet() {
        let cli = Cli::try_parse_from(["driftset", "-q", "list"]).unwrap();
        assert!(cli.quiet);
    }
}
