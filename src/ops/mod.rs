//! User-facing commands.
//!
//! Each operation takes the store, a writer for its output and, where time
//! matters, the current time. `main` wires them to the CLI subcommands.

pub mod converse;
pub mod entries;
pub mod settings;
pub mod trash;

// Re-export commonly used functions
pub use converse::run_conversation;
pub use entries::{list_entries, search_entries, show_stats, show_streak};
pub use settings::{show_settings, show_usage, update_setting};
pub use trash::{delete_entry, empty_trash, list_trash, purge_entry, restore_entry};
