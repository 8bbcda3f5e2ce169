//! filedb CLI - Command line interface for inspecting and editing a store.

use anyhow::Context;
use clap::{Parser, Subcommand};
use filedb::sample::{sample_users, User, USERS};
use filedb::{Codec, FileDbConfig, Format, Json, Options, Storage, Yaml};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "filedb")]
#[command(about = "filedb CLI - Tiny file-backed record store", long_about = None)]
#[command(version = filedb::VERSION)]
struct Cli {
    /// Base directory of the store (overrides the config file)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, default_value = filedb::config::CONFIG_FILE)]
    config: PathBuf,

    /// Record format: json or yaml (overrides the config file)
    #[arg(short, long)]
    format: Option<Format>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or overwrite a record
    Write {
        collection: String,
        resource: String,

        /// Record value as JSON
        value: String,
    },

    /// Print a record
    Read {
        collection: String,
        resource: String,
    },

    /// Print every record in a collection
    ReadAll { collection: String },

    /// List record names in a collection
    List { collection: String },

    /// Delete a record, or the whole collection when no resource is given
    Delete {
        collection: String,
        resource: Option<String>,

        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },

    /// Write the sample users and read them back
    Seed,

    /// Show store info
    Info,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = FileDbConfig::load(&cli.config)?;
    if let Some(dir) = cli.dir {
        config.store.dir = dir;
    }
    if let Some(format) = cli.format {
        config.store.format = format;
    }

    init_logging(LevelFilter::from_level(config.log.level()?));

    let options = Options::new()
        .with_consistent_reads(config.store.consistent_reads)
        .with_logger(tracing::dispatcher::get_default(|d| d.clone()));

    match config.store.format {
        Format::Json => execute(Storage::<Json>::open(&config.store.dir, options)?, cli.command),
        Format::Yaml => execute(Storage::<Yaml>::open(&config.store.dir, options)?, cli.command),
    }
}

fn init_logging(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute<C: Codec>(db: Storage<C>, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Write {
            collection,
            resource,
            value,
        } => {
            let value: serde_json::Value =
                serde_json::from_str(&value).context("value is not valid JSON")?;
            db.write(&collection, &resource, &value)?;
            println!("✓ Wrote {}/{}", collection, resource);
        }

        Commands::Read {
            collection,
            resource,
        } => {
            let value: serde_json::Value = db.read(&collection, &resource)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }

        Commands::ReadAll { collection } => {
            for record in db.read_all(&collection)? {
                print!("{}", record);
            }
        }

        Commands::List { collection } => {
            let names = db.list(&collection)?;

            if names.is_empty() {
                println!("No records found.");
            } else {
                println!("Records ({}):", names.len());
                for name in names {
                    println!("  - {}", name);
                }
            }
        }

        Commands::Delete {
            collection,
            resource,
            force,
        } => {
            let resource = resource.unwrap_or_default();
            let target = if resource.is_empty() {
                format!("the whole '{}' collection", collection)
            } else {
                format!("'{}/{}'", collection, resource)
            };

            if !force {
                println!("Are you sure you want to delete {}? Use --force to confirm.", target);
                return Ok(());
            }

            db.delete(&collection, &resource)?;
            println!("✓ Deleted {}", target);
        }

        Commands::Seed => {
            for user in sample_users() {
                db.write(USERS, &user.name, &user)?;
            }

            let records = db.read_all(USERS)?;
            for record in &records {
                print!("{}", record);
            }

            let users: Vec<User> = db.read_all_as(USERS)?;
            println!("Users ({}):", users.len());
            for user in users {
                println!("  - {} ({}, {})", user.name, user.company, user.address.city);
            }
        }

        Commands::Info => {
            println!("filedb {}", filedb::VERSION);
            println!("─────────────────");
            println!("Path: {:?}", db.dir());
            println!("Format: .{}", C::EXTENSION);
        }
    }

    Ok(())
}
