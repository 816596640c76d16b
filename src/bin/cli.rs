//! StrataKV CLI
//!
//! Offline admin tool working directly on a data directory. The store is
//! opened exclusively, so this fails while a server holds the same directory.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use stratakv::http::ListResponse;
use stratakv::{QueryService, ScanQuery, StorageFacade, StrataError};
use tracing_subscriber::{fmt, EnvFilter};

/// StrataKV CLI
#[derive(Parser, Debug)]
#[command(name = "stratakv-cli")]
#[command(about = "CLI for a StrataKV data directory")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./stratakv_data")]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// List keys matching a pattern, one page at a time
    List {
        /// Regular expression matched against keys (empty matches all)
        #[arg(short, long, default_value = "")]
        search: String,

        /// 1-based page number
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Items per page (0 prints only the total)
        #[arg(short = 'n', long, default_value = "10")]
        page_size: usize,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    let store = match StorageFacade::open_path(Path::new(&args.data_dir)) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = execute(&store, args.command);
    store.close();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(StrataError::KeyNotFound) => {
            eprintln!("(not found)");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(store: &Arc<StorageFacade>, command: Commands) -> stratakv::Result<()> {
    match command {
        Commands::Get { key } => {
            let value = store.get(key.as_bytes())?;
            println!("{}", String::from_utf8_lossy(&value));
        }
        Commands::Set { key, value } => {
            store.set(key.as_bytes(), value.as_bytes())?;
            println!("OK");
        }
        Commands::Del { key } => {
            store.delete(key.as_bytes())?;
            println!("OK");
        }
        Commands::List {
            search,
            page,
            page_size,
        } => {
            let query = ScanQuery::from_page(search, page, page_size)?;
            let result = QueryService::new(Arc::clone(store)).list(&query)?;
            let body = ListResponse::from(result);
            let rendered = serde_json::to_string_pretty(&body)
                .map_err(|e| StrataError::Io(e.into()))?;
            println!("{}", rendered);
        }
    }
    Ok(())
}
