//! `earthrep` - CLI for reporting earthquakes
//!
//! This binary drives the report app headlessly: the map is recorded rather
//! than drawn and alerts go to stderr.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::Parser;

use earthrep::cli::{
    Cli, Command, ConfigCommand, ListCommand, LocateCommand, OutputFormat, ReportCommand,
    ResetCommand,
};
use earthrep::events::{self, AppEvent};
use earthrep::map::RecordingMap;
use earthrep::notify::StderrNotifier;
use earthrep::render::{self, ClickTarget, Element, ENTRY_CLASS};
use earthrep::{init_logging, App, Config, Coordinates, FixedPosition, FormInput, SqliteStorage};

type CliApp = App<SqliteStorage, RecordingMap, StderrNotifier>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("Failed to load configuration")?;
    let position = cli.position.or_else(|| config.home());

    match cli.command {
        Command::Report(cmd) => handle_report(config, position, cmd).await,
        Command::List(cmd) => handle_list(config, &cmd),
        Command::Locate(cmd) => handle_locate(config, position, &cmd).await,
        Command::Reset(cmd) => handle_reset(config, &cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::About => {
            println!("{}", render::ABOUT_TEXT);
            Ok(())
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn boot(config: Config) -> anyhow::Result<CliApp> {
    let storage = SqliteStorage::open(config.database_path()).with_context(|| {
        format!(
            "Failed to open storage at {}",
            config.database_path().display()
        )
    })?;
    let app = App::boot(config, storage, RecordingMap::new(), StderrNotifier)?;
    Ok(app)
}

async fn handle_report(
    config: Config,
    position: Option<Coordinates>,
    cmd: ReportCommand,
) -> anyhow::Result<()> {
    let Some(click) = Coordinates::try_new(cmd.lat, cmd.lng) else {
        bail!("Latitude and longitude must be finite numbers");
    };
    // Without a known position the map opens where the click lands.
    let provider = FixedPosition::new(position.unwrap_or(click));

    let mut app = boot(config)?;
    let (tx, rx) = events::channel();
    tx.send(AppEvent::MapClick(click)).await?;
    tx.send(AppEvent::Submit(FormInput::new(
        cmd.strength,
        cmd.duration,
        cmd.minutes_ago,
        cmd.damage,
    )))
    .await?;
    tx.send(AppEvent::Shutdown).await?;

    let summary = events::run(&mut app, &provider, &tx.downgrade(), rx).await?;
    match summary.accepted.first() {
        Some(record) => {
            println!("{}", render::list_entry_line(record));
            Ok(())
        }
        None => bail!("Report was not recorded"),
    }
}

fn handle_list(config: Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let app = boot(config)?;
    if app.store().is_empty() && cmd.format != OutputFormat::Json {
        println!("No reports yet.");
        return Ok(());
    }

    match cmd.format {
        OutputFormat::Plain => {
            for record in app.store().iter().rev() {
                println!("{}", render::list_entry_line(record));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(app.store())?);
        }
        OutputFormat::Html => {
            for entry in app.list() {
                println!("{}", entry.html);
            }
        }
    }
    Ok(())
}

async fn handle_locate(
    config: Config,
    position: Option<Coordinates>,
    cmd: &LocateCommand,
) -> anyhow::Result<()> {
    let mut app = boot(config)?;
    let provider = FixedPosition::from_option(position);
    let target = app
        .list()
        .iter()
        .find(|entry| entry.id.as_str() == cmd.id)
        .map_or_else(
            || ClickTarget::new(vec![Element::with_class(ENTRY_CLASS).data_id(&cmd.id)]),
            render::ListEntry::click_target,
        );

    let (tx, rx) = events::channel();
    tx.send(AppEvent::ListClick(target)).await?;
    tx.send(AppEvent::Shutdown).await?;
    let summary = events::run(&mut app, &provider, &tx.downgrade(), rx).await?;

    if !summary.map_ready {
        bail!("Map is not loaded; pass --position or set map.home");
    }
    if summary.focused.is_empty() {
        bail!("No report with id {}", cmd.id);
    }
    if let Some(view) = app.map().state() {
        println!("Map centered on {} at zoom {}", view.center, view.zoom);
        if let Some(record) = summary.focused.first().and_then(|id| app.store().find(id)) {
            println!("{}", render::list_entry_line(record));
        }
    }
    Ok(())
}

fn handle_reset(config: Config, cmd: &ResetCommand) -> anyhow::Result<()> {
    let mut app = boot(config)?;
    if !cmd.yes {
        println!("This will delete all {} reports.", app.store().len());
        println!("Use --yes to confirm.");
        return Ok(());
    }
    app.reset()?;
    println!("All reports deleted.");
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let storage = SqliteStorage::open(config.database_path())?;
    let stats = storage.stats()?;
    let reports = earthrep::persist::load(&storage, &config.storage.key)?.len();
    let updated_at = storage.updated_at(&config.storage.key)?;

    if json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "storage_key": config.storage.key,
            "reports": reports,
            "items": stats.item_count,
            "value_bytes": stats.value_bytes,
            "db_size_bytes": stats.db_size_bytes,
            "updated_at": updated_at,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("earthrep status");
        println!("---------------");
        println!("Database:      {}", storage.path().display());
        println!("Storage key:   {}", config.storage.key);
        println!("Reports:       {reports}");
        println!("Stored bytes:  {}", stats.value_bytes);
        println!("Database size: {} bytes", stats.db_size_bytes);
        match updated_at {
            Some(at) => println!("Last saved:    {}", at.to_rfc3339()),
            None => println!("Last saved:    never"),
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Key:                {}", config.storage.key);
                println!();
                println!("[Map]");
                println!("  Zoom level:         {}", config.map.zoom_level);
                println!("  Pan duration (ms):  {}", config.map.pan_duration_ms);
                println!("  Tile URL:           {}", config.map.tile_url);
                match config.home() {
                    Some(home) => println!("  Home:               {home}"),
                    None => println!("  Home:               (not set)"),
                }
                println!();
                println!("[Form]");
                println!("  Restore delay (ms): {}", config.form.restore_delay_ms);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
