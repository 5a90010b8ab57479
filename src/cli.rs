use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

use crate::config::Settings;
use commands::{check, serve};

#[derive(Parser)]
#[command(name = "segdash")]
#[command(about = "Customer segmentation dashboard: charts and summary metrics over clustered customer data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the two source tables and the config file live.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Transactions CSV (customer_id, order_date, purchase_amount, currency)
    #[arg(short, long)]
    pub transactions: Option<PathBuf>,

    /// Clustered customer features CSV (one row per customer, with a 0/1 cluster column)
    #[arg(short, long)]
    pub features: Option<PathBuf>,

    /// Configuration file; defaults to ./segdash.toml when present
    #[arg(short, long, env = "SEGDASH_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        #[command(flatten)]
        data: DataArgs,

        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
        #[arg(short, long)]
        bind_address: Option<String>,
    },
    /// Load and validate both tables, print a summary and exit
    Check {
        #[command(flatten)]
        data: DataArgs,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve { data, bind_address } => {
                let settings = Settings::load(&data, bind_address.as_deref())?;
                serve(settings).await?;
            }
            Commands::Check { data } => {
                let settings = Settings::load(&data, None)?;
                check(settings)?;
            }
        }
        Ok(())
    }
}
