use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use hanyu_config::{Config, SettingsStore};
use hanyu_core::language::LanguageProcessor;
use hanyu_core::selection::{SelectionCheck, check_selection};
use hanyu_core::state::AppState;
use hanyu_lang_chinese::ChineseProcessor;
use hanyu_translator::Translator;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use self::controller::{AppController, TerminalOptions};

pub mod background;
pub mod bridge;
pub mod controller;
pub mod io;
pub mod profile;

#[cfg(test)]
mod tests;

#[derive(Parser)]
#[command(name = "hanyu", version, about = "Translate selected Chinese text")]
struct Cli {
    /// Profile to load from the config folder
    #[arg(long, default_value = "main")]
    profile: String,

    /// Read page events from the bridge websocket instead of the clipboard
    #[arg(long)]
    ws: bool,

    /// Settings file holding the API key and the enabled flag
    #[arg(long)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Store the API key used for translation and speech
    SetApiKey { api_key: String },
    /// Enable or disable the overlay
    Toggle,
    /// Translate text once and print the result
    Translate { text: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if atty::is(atty::Stream::Stderr) {
        builder.init();
    } else {
        builder.json().init();
    }
}

fn load_config(cli: &Cli) -> Config {
    if let Err(e) = profile::init_user_config() {
        tracing::warn!("Could not initialize user config: {}", e);
    }

    let mut config = profile::load_user_profile(&cli.profile).unwrap_or_else(|e| {
        tracing::warn!("Falling back to environment config: {}", e);
        Config::new()
    });
    if cli.ws {
        config.listen_to_ws = true;
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli);

    let settings_path = match &cli.settings {
        Some(path) => path.clone(),
        None => profile::settings_path()?,
    };
    let mut settings = SettingsStore::open(&settings_path)?;

    match cli.command {
        Some(Command::SetApiKey { api_key }) => {
            settings.set_api_key(&api_key)?;
            println!("API key saved to {}", settings.path().display());
            Ok(())
        }
        Some(Command::Toggle) => {
            let enabled = settings.toggle()?;
            println!("Plugin {}", if enabled { "enabled" } else { "disabled" });
            Ok(())
        }
        Some(Command::Translate { text }) => translate_once(config, settings, &text).await,
        None => run(config, settings).await,
    }
}

fn processor(config: &Config) -> ChineseProcessor {
    let processor = if config.dictionary.enabled {
        ChineseProcessor::with_additional_dicts(&config.dictionary.additional_paths)
    } else {
        ChineseProcessor::without_dictionary()
    };

    let metadata = processor.dictionary_metadata();
    tracing::info!(
        "Dictionary {} ({}): {} entries",
        metadata.name,
        metadata.language,
        metadata.entry_count
    );
    processor
}

async fn translate_once(config: Config, settings: SettingsStore, text: &str) -> anyhow::Result<()> {
    let processor = processor(&config);
    let normalized = processor.normalize(text);

    let text = match check_selection(&normalized, config.popup.max_chars, |c| {
        processor.is_script_char(c)
    }) {
        SelectionCheck::Accepted(text) => text,
        check => {
            if let Some(message) = check.toast_message() {
                println!("{message}");
            }
            return Ok(());
        }
    };

    let request_queue = config.network.request_queue;
    let state = Arc::new(AppState::new(config, settings));
    let app = AppController::new(state, request_queue);
    let _tasks = app.spawn_background();

    let result = app.bridge().translate(&text).await;
    app.shutdown();
    let result = result?;

    for (i, unit) in result.tuples.iter().enumerate() {
        let pinyin: Vec<String> = unit
            .pinyin
            .iter()
            .map(|p| processor.display_reading(p))
            .collect();
        println!("{}. {}  {}  {}", i + 1, unit.chinese, pinyin.join(" "), unit.english);
    }
    println!();
    println!("{}", result.full_translation);
    Ok(())
}

async fn run(config: Config, settings: SettingsStore) -> anyhow::Result<()> {
    if settings.api_key().is_none() {
        tracing::warn!("No API key set, run `hanyu set-api-key <KEY>` first");
    }

    let processor: Arc<dyn LanguageProcessor> = Arc::new(processor(&config));
    let terminal = TerminalOptions {
        columns: terminal_dimension("COLUMNS", 100),
        rows: terminal_dimension("LINES", 40),
        audio_dir: profile::audio_dir().ok(),
    };

    let request_queue = config.network.request_queue;
    let state = Arc::new(AppState::new(config, settings));
    let app = AppController::new(state, request_queue);
    let mut tasks = app.spawn_tasks(processor, terminal);

    tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for ctrl+c: {}", e);
            }
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::warn!("A task exited early"),
                Ok(Err(e)) => tracing::error!("Task failed: {e}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    app.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::debug!("Task ended with error during shutdown: {e}");
        }
    }

    Ok(())
}

fn terminal_dimension(var: &str, default: u16) -> u16 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
