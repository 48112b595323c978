//! custsync CLI - send customers and their purchases to a remote API
//!
//! ```bash
//! custsync                                   # Parse, format and send the default files
//! custsync --customers-file c.csv --purchases-file p.csv --api-url https://host/put
//! custsync serve --port 5000                 # Start HTTP server
//! custsync customers                         # Print parsed customers as JSON
//! custsync purchases                         # Print purchases grouped by customer
//! ```
//!
//! Defaults for the files and the URL come from the environment (see
//! `custsync::config`). Flags win over the environment.

use clap::{Args, Parser, Subcommand};
use custsync::{
    api::start_server,
    logging,
    transform::{load_customers, load_purchases, run, SendOptions},
    ApiClient, Settings,
};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "custsync", version)]
#[command(about = "Send customers and their purchases to a remote API", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    send: SendArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct SendArgs {
    /// Customers CSV file [default: static/customers.csv]
    #[arg(long)]
    customers_file: Option<PathBuf>,

    /// Purchases CSV file [default: static/purchases.csv]
    #[arg(long)]
    purchases_file: Option<PathBuf>,

    /// Endpoint receiving the PUT [default: $API_URL or https://httpbin.org/put]
    #[arg(long)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
    },

    /// Parse the customers file and print it as JSON
    Customers {
        #[arg(long)]
        customers_file: Option<PathBuf>,
    },

    /// Parse the purchases file and print it as JSON
    Purchases {
        #[arg(long)]
        purchases_file: Option<PathBuf>,
    },
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let settings = Settings::from_env();

    // The run goes on without a log file.
    if let Err(e) = logging::init(&settings.log_dir) {
        eprintln!("Warning: {}", e);
    }

    let result = match cli.command {
        None => cmd_send(cli.send, settings).await,
        Some(Commands::Serve { port, host }) => cmd_serve(SocketAddr::new(host, port), settings).await,
        Some(Commands::Customers { customers_file }) => {
            cmd_customers(customers_file.unwrap_or(settings.customers_file))
        }
        Some(Commands::Purchases { purchases_file }) => {
            cmd_purchases(purchases_file.unwrap_or(settings.purchases_file))
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_send(args: SendArgs, settings: Settings) -> CmdResult {
    let defaults = SendOptions::from_settings(&settings);
    let options = SendOptions {
        customers_file: args.customers_file.unwrap_or(defaults.customers_file),
        purchases_file: args.purchases_file.unwrap_or(defaults.purchases_file),
        api_url: args.api_url.unwrap_or(defaults.api_url),
    };

    let report = run(&ApiClient::new(), &options).await?;
    info!(
        run_id = %report.run_id,
        documents = report.document_count,
        skipped_customers = report.skipped_customers,
        skipped_purchases = report.skipped_purchases,
        "Run complete"
    );

    println!("Response: {}", report.transmission);
    Ok(())
}

async fn cmd_serve(addr: SocketAddr, settings: Settings) -> CmdResult {
    start_server(addr, settings).await?;
    Ok(())
}

fn cmd_customers(path: PathBuf) -> CmdResult {
    let customers = load_customers(&path)?;
    println!("{}", serde_json::to_string_pretty(&customers)?);
    Ok(())
}

fn cmd_purchases(path: PathBuf) -> CmdResult {
    let purchases = load_purchases(&path)?;
    println!("{}", serde_json::to_string_pretty(&purchases)?);
    Ok(())
}
