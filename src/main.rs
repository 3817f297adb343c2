mod console;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use tabpad_app::{App, Command, CommandResult, Dialogs};
use tabpad_config::Config;
use tabpad_logger::LogLevel;
use tabpad_session::FsFileIo;

#[derive(Parser, Debug)]
#[command(name = "tabpad")]
#[command(about = "A multi-tab plain-text editor", long_about = None)]
#[command(version)]
struct Args {
    /// File to open at start-up
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Minimum log level (debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load().context("Failed to load config"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Warning: {:#}; using defaults", e);
        Config::default()
    });

    let min_level = match args.log_level {
        Some(level) => level,
        None => config.logging.min_level.parse().unwrap_or_else(|e| {
            eprintln!("Warning: {}; logging at info level", e);
            LogLevel::Info
        }),
    };
    tabpad_logger::init(
        config.log_file_path().ok(),
        config.logging.max_entries,
        min_level,
    );
    tabpad_logger::info("Tabpad started");

    let mut app = App::new(config, FsFileIo);

    if let Some(file) = args.file {
        let mut prompt = console::StdinPrompt;
        let mut picker = console::StdinPicker;
        let mut dialogs = Dialogs {
            prompt: &mut prompt,
            picker: &mut picker,
        };
        if let CommandResult::Error(msg) = app.dispatch(Command::Open(Some(file)), &mut dialogs) {
            eprintln!("{}", msg);
        }
    }

    console::run(&mut app).context("Console I/O failed")?;
    tabpad_logger::info("Tabpad exited");
    Ok(())
}
