use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::task::Priority;
use crate::tasks::StatusFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskflow",
    version,
    about = "TaskFlow: simple and efficient task management",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Path to the config file.
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the task store, overriding the config.
    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a new task.
    Add {
        title: String,

        #[arg(short = 'd', long = "description", default_value = "")]
        description: String,

        #[arg(short = 'p', long = "priority", value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
    },

    /// Flip a task between open and completed.
    #[command(alias = "done")]
    Toggle {
        /// Task id, or an unambiguous prefix of one.
        id: String,
    },

    /// Delete a task permanently.
    #[command(alias = "delete")]
    Rm {
        /// Task id, or an unambiguous prefix of one.
        id: String,
    },

    /// Show tasks, grouped by priority.
    List {
        #[arg(long = "status", value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,

        /// Keep only tasks whose title or description contains this text.
        #[arg(long = "search")]
        search: Option<String>,
    },

    /// Show collection counters and completion progress.
    Stats,
}

impl Command {
    /// What runs when no subcommand is given.
    pub fn default_list() -> Self {
        Command::List {
            status: StatusFilter::All,
            search: None,
        }
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_options() {
        let cli = GlobalCli::parse_from([
            "taskflow", "add", "Buy milk", "-d", "2 liters", "-p", "high",
        ]);
        match cli.command {
            Some(Command::Add {
                title,
                description,
                priority,
            }) => {
                assert_eq!(title, "Buy milk");
                assert_eq!(description, "2 liters");
                assert_eq!(priority, Priority::High);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn done_is_an_alias_for_toggle() {
        let cli = GlobalCli::parse_from(["taskflow", "done", "deadbeef"]);
        assert!(matches!(cli.command, Some(Command::Toggle { id }) if id == "deadbeef"));
    }

    #[test]
    fn list_accepts_status_and_search() {
        let cli = GlobalCli::parse_from([
            "taskflow", "list", "--status", "active", "--search", "milk",
        ]);
        match cli.command {
            Some(Command::List { status, search }) => {
                assert_eq!(status, StatusFilter::Active);
                assert_eq!(search.as_deref(), Some("milk"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn bare_invocation_has_no_subcommand() {
        let cli = GlobalCli::parse_from(["taskflow", "-v"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 1);
    }
}
