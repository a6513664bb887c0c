// brandsync
// Command-line host for the brand preset engine

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record};

use brandsync::commands::BrandOrchestrator;
use brandsync::models::{ActiveBrand, PresetSource, SyncSettings, ThemeMode};
use brandsync::services::{
    FileStore, HttpOrgClient, KeyValueStore, LogEventSink, SettingsManager, StyleSheet,
};

// ============================================================================
// Logging
// ============================================================================

struct FileLogger {
    file: Mutex<std::fs::File>,
    level: LevelFilter,
}

impl FileLogger {
    fn new(log_dir: &Path, level: LevelFilter) -> Result<Self, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(log_dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("brandsync.log"))?;
        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Local::now();
        let date = timestamp.format("%Y-%m-%d");
        let time = timestamp.format("%H:%M:%S");
        let target = record.target();
        let level = record.level();
        let message = format!("{}", record.args());
        let line = format!("[{date}][{time}][{target}][{level}] {message}");

        if let Ok(mut file) = self.file.try_lock() {
            let _ = writeln!(file, "{line}");
        }

        if level <= Level::Warn {
            eprintln!("{level}: {message}");
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn init_logger(log_dir: &Path, level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
    let logger = FileLogger::new(log_dir, level)?;
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}

// ============================================================================
// Command line
// ============================================================================

#[derive(Parser)]
#[command(name = "brandsync", version, about = "Brand presets kept in sync with remote organizations")]
struct Cli {
    /// Data directory (overrides BRANDSYNC_DATA_DIR)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the visible presets
    List,
    /// Apply a preset and switch to its organization
    Select { name: String },
    /// Save the current colors as a preset
    Add { name: String },
    /// Rename a custom preset or copy a built-in one
    Rename { from: String, to: String },
    /// Delete a preset and its organization
    Delete { name: String },
    /// Show hidden built-in presets again
    Restore,
    /// Set or toggle the light/dark mode
    Theme {
        #[arg(value_enum)]
        mode: ThemeArg,
    },
    /// Set a custom accent color, e.g. #E21836
    Accent { hex: String },
    /// Print the current tokens as a CSS block
    Css,
    /// Show the active brand, organization and colors
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

fn default_data_dir() -> PathBuf {
    dirs_next::data_dir()
        .map(|dir| dir.join("brandsync"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn apply_env_overrides(settings: &mut SyncSettings) {
    if let Some(url) = non_empty_env("BRANDSYNC_API_URL") {
        settings.org_api_url = url;
    }
    if let Some(token) = non_empty_env("BRANDSYNC_API_TOKEN") {
        settings.api_token = token;
    }
}

fn print_active(active: &ActiveBrand) {
    println!(
        "Active brand: {} ({}), organization {}",
        active.brand, active.display_name, active.org_id
    );
}

#[tokio::main]
async fn main() {
    if let Err(error) = run(Cli::parse()).await {
        log::error!("{error}");
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = cli
        .data_dir
        .or_else(|| non_empty_env("BRANDSYNC_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(default_data_dir);
    let log_dir = non_empty_env("BRANDSYNC_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join("logs"));

    let settings_manager = SettingsManager::new(&data_dir);
    let mut settings = settings_manager.load()?;
    apply_env_overrides(&mut settings);

    init_logger(&log_dir, settings.log_level_filter())?;
    log::info!("Using data directory {}", data_dir.display());

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&data_dir)?);
    let sheet = Arc::new(StyleSheet::new());
    let api = HttpOrgClient::with_url(settings.org_api_url.clone())
        .with_token(settings.bearer_token().map(str::to_string))
        .with_store(Arc::clone(&store));

    let orchestrator = BrandOrchestrator::new(store, sheet.clone(), Arc::new(api), Arc::new(LogEventSink))
        .with_overwrite_policy(settings.overwrite_policy);
    let restored = orchestrator.restore_from_storage();

    match cli.command {
        Commands::List => {
            for preset in orchestrator.list_presets() {
                let marker = if preset.name == restored.brand { "*" } else { " " };
                let source = match preset.source {
                    PresetSource::Builtin => "built-in",
                    PresetSource::Custom => "custom",
                };
                println!(
                    "{marker} {:<20} {:<20} {:<8} {source}",
                    preset.name, preset.display_name, preset.swatch
                );
            }
            if orchestrator.registry().any_builtins_hidden() {
                println!("Some built-in presets are hidden; run `brandsync restore` to show them.");
            }
        }
        Commands::Select { name } => {
            let active = orchestrator.select_preset(&name).await?;
            print_active(&active);
        }
        Commands::Add { name } => match orchestrator.add_preset(&name).await? {
            Some(active) => print_active(&active),
            None => return Err(format!("Preset '{}' was not saved", name.trim()).into()),
        },
        Commands::Rename { from, to } => match orchestrator.rename_preset(&from, &to).await? {
            Some(active) => print_active(&active),
            None => return Err(format!("Could not rename '{from}' to '{to}'").into()),
        },
        Commands::Delete { name } => match orchestrator.delete_preset(&name).await? {
            Some(active) => print_active(&active),
            None => return Err(format!("No preset named '{name}'").into()),
        },
        Commands::Restore => {
            let presets = orchestrator.restore_builtins();
            println!("{} presets available", presets.len());
        }
        Commands::Theme { mode } => {
            let mode = match mode {
                ThemeArg::Light => {
                    orchestrator.set_theme(ThemeMode::Light);
                    ThemeMode::Light
                }
                ThemeArg::Dark => {
                    orchestrator.set_theme(ThemeMode::Dark);
                    ThemeMode::Dark
                }
                ThemeArg::Toggle => orchestrator.toggle_theme(),
            };
            println!("Theme: {}", mode.as_str());
        }
        Commands::Accent { hex } => {
            if !orchestrator.pick_accent(&hex) {
                return Err(format!("'{hex}' is not a hex color").into());
            }
            println!("Accent: {}", orchestrator.tokens().get_primary_hex());
        }
        Commands::Css => print!("{}", sheet.to_css()),
        Commands::Status => {
            let active = orchestrator.active_brand();
            let tokens = orchestrator.tokens().current_tokens();
            print_active(&active);
            println!("Theme: {}", orchestrator.tokens().theme_mode().as_str());
            println!(
                "Primary: {} ({})",
                tokens.primary,
                orchestrator.tokens().get_primary_hex()
            );
            println!("Primary foreground: {}", tokens.primary_foreground);
            println!("Organization API: {}", settings.org_api_url);
        }
    }

    log::logger().flush();
    Ok(())
}
