/*!
# mindtalk

Command-line journaling companion. Pick a mood, talk about your day with a
local Ollama model, and save the conversation as a diary entry with a summary,
emotion keywords and a few suggestions.

## Usage

```text
mindtalk [OPTIONS] [COMMAND]

Commands:
  chat         Start a conversation and save it as a diary entry (default)
  list         List diary entries, oldest first
  search       Find entries whose summary or keywords contain a word
  stats        Show mood distribution and favourite keywords
  streak       Show the current streak of consecutive days
  delete       Move an entry to the trash
  trash        List trashed entries
  restore      Restore an entry from the trash
  purge        Permanently delete one trashed entry
  empty-trash  Permanently delete everything in the trash
  settings     Show or change settings
  usage        Show or reset the token usage counter

Options:
  -v, --verbose                 Print debug logs
      --log-format <LOG_FORMAT> Log output format [default: text] [possible values: text, json]
```

## Configuration

- `MINDTALK_DB`: database file (defaults to `~/.local/share/mindtalk/mindtalk_diary.db`)
- `MINDTALK_OLLAMA_URL`: Ollama endpoint (defaults to `http://127.0.0.1:11434`)
- `MINDTALK_CHAT_MODEL`: model name (defaults to `llama3.2:3b`)
- `MINDTALK_GENERATION_TIMEOUT_SECS`: per-request timeout (defaults to 120)
- `RUST_LOG`: log filter, overrides `--verbose`
*/

use chrono::Local;
use clap::Parser;
use mindtalk::ai::OllamaClient;
use mindtalk::cli::{CliArgs, Commands, SettingsAction};
use mindtalk::config::Config;
use mindtalk::constants::DEFAULT_LOG_LEVEL;
use mindtalk::errors::{AppError, AppResult};
use mindtalk::ops;
use mindtalk::session::ConversationSession;
use mindtalk::store::DiaryStore;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(kind = ?e.kind(), "{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_logging(args: &CliArgs) -> AppResult<()> {
    let default_level = if args.verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if args.json_logs() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .try_init()
    };
    result.map_err(|e| AppError::Config(format!("logging: {}", e)))
}

fn run(args: CliArgs) -> AppResult<()> {
    // Obtain current date/time once for one-shot commands
    let now = Local::now().naive_local();
    let command = args.command();
    debug!("Command: {:?}", command);

    let config = Config::load()?;
    debug!("Configuration: {:?}", config);
    let store = DiaryStore::open(&config.db_path)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Chat => {
            let client = OllamaClient::new(
                &config.ollama_url,
                &config.chat_model,
                config.generation_timeout_secs,
            )?;
            info!("Using model {}", client.model());
            let mut session = ConversationSession::new(client);
            let stdin = io::stdin();
            let mut input = stdin.lock();
            ops::run_conversation(&store, &mut session, &mut input, &mut out, || {
                Local::now().naive_local()
            })?;
        }
        Commands::List => ops::list_entries(&store, &mut out)?,
        Commands::Search { keyword } => ops::search_entries(&store, &mut out, &keyword)?,
        Commands::Stats => ops::show_stats(&store, &mut out)?,
        Commands::Streak => ops::show_streak(&store, &mut out, now.date())?,
        Commands::Delete { id } => ops::delete_entry(&store, &mut out, id, now)?,
        Commands::Trash => ops::list_trash(&store, &mut out, now)?,
        Commands::Restore { id } => ops::restore_entry(&store, &mut out, id, now)?,
        Commands::Purge { id } => ops::purge_entry(&store, &mut out, id, now)?,
        Commands::EmptyTrash { yes } => ops::empty_trash(&store, &mut out, yes)?,
        Commands::Settings { action } => match action.unwrap_or(SettingsAction::Show) {
            SettingsAction::Show => ops::show_settings(&store, &mut out)?,
            SettingsAction::Set { key, value } => {
                ops::update_setting(&store, &mut out, &key, &value)?
            }
        },
        Commands::Usage { reset } => ops::show_usage(&store, &mut out, reset)?,
    }

    out.flush()?;
    Ok(())
}
