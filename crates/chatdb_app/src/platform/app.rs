use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use chatdb_core::{update, AppState, Msg};
use chatdb_engine::EngineError;
use clap::Parser;
use engine_logging::{engine_info, engine_warn, LogDestination};
use log::LevelFilter;
use thiserror::Error;

use super::config::{AppConfig, OverlapSetting};
use super::effects::EffectRunner;
use super::ui::commands::{Command, HELP};
use super::ui::render::Renderer;

/// Chat and file-upload client for the chatdb page.
#[derive(Debug, Parser)]
#[command(name = "chatdb", version)]
pub struct Cli {
    /// RON config file (defaults to ./chatdb.ron when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Upload endpoint, overriding the config.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,
    /// Base URL of the JSON API routes, overriding the config.
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,
    /// Forward chat messages to the chat route and show the replies.
    #[arg(long)]
    pub chat_replies: bool,
    /// Log file, overriding the config.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// Cancel in-flight uploads and lookups when a new one starts.
    #[arg(long)]
    pub latest_wins: bool,
    /// Log at debug level.
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Everything the UI loop reacts to.
pub enum UiEvent {
    Msg(Msg),
    Quit,
}

pub fn run_app(cli: Cli) -> Result<(), AppError> {
    let (mut config, config_error) = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    apply_overrides(&mut config, &cli);

    let destination = if config.log_to_terminal {
        LogDestination::Both(config.log_file.clone())
    } else {
        LogDestination::File(config.log_file.clone())
    };
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    engine_logging::initialize(&destination, level);

    if let Some(err) = config_error {
        engine_warn!("{}; using defaults", err);
    }
    let (layout, unknown) = config.page_layout();
    for id in unknown {
        engine_warn!("Ignoring unknown page element {:?} in config", id);
    }

    let (event_tx, event_rx) = mpsc::channel::<UiEvent>();
    let runner = EffectRunner::new(config.client_settings(), event_tx.clone())?;
    spawn_input_reader(event_tx);

    let mut state = AppState::with_settings(layout, config.overlap.into())
        .with_chat_replies(config.chat_replies);
    let mut renderer = Renderer::default();
    println!("{HELP}");

    while let Ok(event) = event_rx.recv() {
        let msg = match event {
            UiEvent::Msg(msg) => msg,
            UiEvent::Quit => break,
        };
        let (next, effects) = update(state, msg);
        state = next;
        runner.run(effects);
        if state.consume_dirty() {
            for line in renderer.render(&state.view()) {
                println!("{line}");
            }
        }
    }

    engine_info!("Shutting down");
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(api_base) = &cli.api_base {
        config.api_base = api_base.clone();
    }
    if cli.chat_replies {
        config.chat_replies = true;
    }
    if let Some(log_file) = &cli.log_file {
        config.log_file = log_file.clone();
    }
    if cli.latest_wins {
        config.overlap = OverlapSetting::LatestRequestWins;
    }
}

/// Reads prompt lines on a background thread so uploads keep resolving while
/// the user types. End of input quits.
fn spawn_input_reader(event_tx: mpsc::Sender<UiEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    engine_warn!("Failed to read input: {}", err);
                    break;
                }
            };
            let command = Command::parse(&line);
            match command {
                Command::Quit => break,
                Command::Help => println!("{HELP}"),
                command => {
                    for msg in command.into_msgs() {
                        if event_tx.send(UiEvent::Msg(msg)).is_err() {
                            return;
                        }
                    }
                }
            }
        }
        let _ = event_tx.send(UiEvent::Quit);
    });
}
