//! CLI entrypoint for MindMingle
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use mindmingle_application::{
    AuthManager, ConversationLogger, KeyValueStore, ResponseGenerator, SessionStore, StorageKeys,
    ThemeSettings,
};
use mindmingle_infrastructure::{
    Argon2PasswordHasher, ConfigLoader, FileConfig, FileKeyValueStore, GeminiGateway,
    JsonlConversationLogger,
};
use mindmingle_presentation::{App, Cli, ReplConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);

    let issues = config.validate();
    for issue in &issues {
        eprintln!("config: {}", issue.message);
    }
    if issues.iter().any(|issue| issue.is_error()) {
        bail!("Invalid configuration");
    }

    let _log_guard = init_logging(cli.verbose, &config)?;
    info!("Starting MindMingle");

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let store_file = config
        .storage
        .resolve_store_file()
        .context("Could not determine a data directory; set [storage].dir")?;
    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileKeyValueStore::open(&store_file)
            .with_context(|| format!("Failed to open {}", store_file.display()))?,
    );
    info!("Using store {}", store_file.display());

    let keys = StorageKeys::new(config.storage.app_name.clone());
    let auth = AuthManager::new(store.clone(), Arc::new(Argon2PasswordHasher::new()), keys.clone());
    let session_store = SessionStore::new(store.clone(), keys.clone());

    let gateway = Arc::new(GeminiGateway::from_config(&config.provider));
    let mut generator = ResponseGenerator::new(gateway);
    if let Some(path) = config.logging.conversation_log_path()
        && let Some(logger) = JsonlConversationLogger::new(&path)
    {
        info!("Writing conversation log to {}", path.display());
        let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
        generator = generator.with_conversation_logger(logger);
    }

    let (theme, _) = config.output.parse_theme();
    let theme = ThemeSettings::new(store, keys).with_fallback(theme);

    let repl_config = repl_config(&config, store_file.with_file_name("history.txt"), cli.quiet);

    App::new(auth, session_store, generator, theme, repl_config)
        .run()
        .await?;

    Ok(())
}

/// Command-line flags win over every config source.
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(model) = &cli.model {
        config.provider.model = model.clone();
    }
    if let Some(dir) = &cli.data_dir {
        config.storage.dir = Some(dir.display().to_string());
    }
}

fn repl_config(config: &FileConfig, default_history: PathBuf, quiet: bool) -> ReplConfig {
    let repl = ReplConfig {
        show_progress: config.repl.show_progress,
        reveal_delay: Duration::from_millis(config.repl.reveal_delay_ms),
        history_file: config
            .repl
            .history_path()
            .or(Some(default_history)),
        ..ReplConfig::default()
    };
    if quiet { repl.quiet() } else { repl }
}

/// Initialize tracing based on verbosity level.
///
/// Logs go to `[logging].file` when set, otherwise to stderr. The returned
/// guard must be held until exit so buffered lines are flushed.
fn init_logging(verbose: u8, config: &FileConfig) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = config.logging.file_path() else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path
        .file_name()
        .context("[logging].file must name a file")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}
