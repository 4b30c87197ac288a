//! `fintrack` - CLI and API server
//!
//! This binary runs the HTTP API and provides maintenance commands for the
//! spreadsheet backend.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context as _;
use clap::Parser;

use fintrack::cli::{Cli, Command, ConfigCommand, SheetsCommand};
use fintrack::config::BackendKind;
use fintrack::sheet::{self, Workbook};
use fintrack::{init_logging, server, store, Config, SheetBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbosity());

    // Validation of a config file must not depend on the default one loading.
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        handle_validate(file.clone());
        return Ok(());
    }

    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Serve(serve) => {
            serve.apply(&mut config);
            config.validate()?;
            let backend = sheet::connect(&config)?;
            server::serve(&config, backend).await?;
        }
        Command::Status(status) => handle_status(&config, status.json).await?,
        Command::Sheets(SheetsCommand::Init) => {
            let backend = sheet::connect(&config)?;
            store::ensure_sheets(backend.as_ref()).await?;
            println!("Sheets ready in {}", backend.describe());
        }
        Command::Config(cmd) => handle_config(&config, cmd)?,
    }
    Ok(())
}

async fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    // File size is only known for the local workbook.
    let (location, counts, db_size_bytes) = match config.sheets.backend {
        BackendKind::Local => {
            let workbook = Workbook::open(config.database_path())?;
            let counts = store::record_counts(&workbook).await?;
            let size = workbook.stats()?.db_size_bytes;
            (workbook.describe(), counts, Some(size))
        }
        BackendKind::Google => {
            let backend = sheet::connect(config)?;
            let counts = store::record_counts(backend.as_ref()).await?;
            (backend.describe(), counts, None)
        }
    };

    if json {
        let sheets: serde_json::Map<String, serde_json::Value> = counts
            .iter()
            .map(|(sheet, count)| ((*sheet).to_string(), (*count).into()))
            .collect();
        let status = serde_json::json!({
            "backend": config.sheets.backend.to_string(),
            "location": location,
            "sheets": sheets,
            "db_size_bytes": db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("fintrack status");
        println!("---------------");
        println!("Backend:       {location}");
        if let Some(size) = db_size_bytes {
            println!("Size:          {size} bytes");
        }
        println!();
        for (sheet, count) in &counts {
            println!("  {sheet:<15}{count:>6}");
        }
        let total: usize = counts.iter().map(|(_, count)| count).sum();
        println!("  {:<15}{total:>6}", "Total");
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                let mut shown = config.clone();
                if shown.sheets.private_key.is_some() {
                    shown.sheets.private_key = Some("(redacted)".to_string());
                }
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Host:               {}", config.server.host);
                println!("  Port:               {}", config.server.port);
                println!(
                    "  Static dir:         {}",
                    config
                        .server
                        .static_dir
                        .as_ref()
                        .map_or_else(|| "(none)".to_string(), |d| d.display().to_string())
                );
                println!();
                println!("[Sheets]");
                println!("  Backend:            {}", config.sheets.backend);
                match config.sheets.backend {
                    BackendKind::Local => {
                        println!("  Database path:      {}", config.database_path().display());
                    }
                    BackendKind::Google => {
                        println!(
                            "  Spreadsheet:        {}",
                            config.sheets.spreadsheet_id.as_deref().unwrap_or("")
                        );
                        println!(
                            "  Client email:       {}",
                            config.sheets.client_email.as_deref().unwrap_or("")
                        );
                    }
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => handle_validate(file),
    }
    Ok(())
}

fn handle_validate(file: Option<std::path::PathBuf>) {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => println!("Configuration is valid."),
        Err(e) => println!("Configuration error: {e}"),
    }
}
