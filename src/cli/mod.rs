//! Command-line interface definition.

use crate::constants::{APP_DESCRIPTION, APP_NAME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use clap::{Parser, Subcommand};

/// A journaling companion that turns short mood chats into diary entries
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION, version, long_about = None)]
pub struct CliArgs {
    /// Print debug logs
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(
        long,
        global = true,
        default_value = LOG_FORMAT_TEXT,
        value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON]
    )]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start a conversation and save it as a diary entry (default)
    Chat,

    /// List diary entries, oldest first
    List,

    /// Find entries whose summary or keywords contain a word
    Search {
        /// Text to look for
        keyword: String,
    },

    /// Show mood distribution and favourite keywords
    Stats,

    /// Show the current streak of consecutive days
    Streak,

    /// Move an entry to the trash
    Delete {
        /// Entry id as shown by `list`
        id: i64,
    },

    /// List trashed entries
    Trash,

    /// Restore an entry from the trash
    Restore {
        /// Entry id
        id: i64,
    },

    /// Permanently delete one trashed entry
    Purge {
        /// Entry id
        id: i64,
    },

    /// Permanently delete everything in the trash
    EmptyTrash {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Show or reset the token usage counter
    Usage {
        /// Reset the counter to zero
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    /// Print all settings
    Show,

    /// Change a setting (ai_name or theme)
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
}

impl CliArgs {
    /// The command to run; `chat` when none was given.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }

    pub fn json_logs(&self) -> bool {
        self.log_format == LOG_FORMAT_JSON
    }
}
