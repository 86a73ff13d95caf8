/*!
# mindtalk

mindtalk is a journaling companion. The user picks a mood, talks about their
day with a locally hosted language model, and the conversation is condensed
into a diary entry with a summary, a few emotion keywords and gentle advice.

## Core Features

- Mood-aware chat with a screening step for self-harm and violence language
- Structured summaries and keyword suggestions extracted from model output
- Entries stored in SQLite with a 30-day trash before permanent deletion
- Consecutive-day streaks and mood statistics

## Architecture

- `session`: The conversation state machine
- `safety`: Screening of user messages before they reach the model
- `extract`: Parsing of summary and keyword output
- `diary_core`: Entry types, keyword rules, streak and statistics
- `db`: SQLite schema and queries
- `store`: `DiaryStore`, the storage facade, and the trash reaper
- `ai`: The `Generator` trait, Ollama client and prompts
- `ops`: Commands behind the CLI
- `cli`, `config`, `errors`, `constants`: Plumbing

## Usage Example

```rust,no_run
use mindtalk::ai::OllamaClient;
use mindtalk::diary_core::Mood;
use mindtalk::session::ConversationSession;
use mindtalk::store::DiaryStore;
use mindtalk::Config;

fn main() -> mindtalk::AppResult<()> {
    let config = Config::load()?;
    let store = DiaryStore::open(&config.db_path)?;
    let client = OllamaClient::new(&config.ollama_url, &config.chat_model, 120)?;

    let mut session = ConversationSession::new(client);
    let greeting = session.select_mood(Mood::Good, "루나")?;
    println!("{}", greeting);

    let turn = session.submit(&store, "오늘 발표를 무사히 끝냈어")?;
    println!("{}", turn.reply);
    Ok(())
}
```
*/

/// Text generation: trait, Ollama client, prompts and reply cleanup
pub mod ai;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// SQLite persistence
pub mod db;
/// Entry types and pure diary rules
pub mod diary_core;
/// Error types and utilities for error handling
pub mod errors;
/// Summary and keyword extraction from generator output
pub mod extract;
/// User-facing commands
pub mod ops;
/// Message screening
pub mod safety;
/// Conversation state machine
pub mod session;
/// Storage facade over the database
pub mod store;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use session::ConversationSession;
pub use store::DiaryStore;
