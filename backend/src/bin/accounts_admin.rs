//! Operator commands for the accounts store: apply migrations, report counts.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;

use accounts::StoreSettings;
use accounts::domain::ports::EntityStore;
use accounts::outbound::persistence::{
    DbPool, DieselCustomerRepository, DieselUserRepository, migrate,
};
use clap::{Parser, Subcommand};
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// `accounts-admin` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "accounts-admin",
    about = "Maintain the accounts PostgreSQL store",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `ACCOUNTS_DB_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Apply pending schema migrations.
    Migrate,
    /// Report how many users and customers are stored.
    Stats,
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings =
        StoreSettings::load_with_database_url("accounts-admin", args.database_url.as_deref())
            .map_err(|error| io::Error::other(format!("load settings: {error}")))?;

    match args.command {
        Command::Migrate => {
            let applied = migrate(settings.database_url.as_str())
                .await
                .map_err(|error| io::Error::other(format!("migrate: {error}")))?;
            info!(count = applied.len(), "migrate finished");
            println!("applied_migrations={}", applied.len());
            for name in applied {
                println!("migration={name}");
            }
        }
        Command::Stats => {
            let pool = DbPool::new(settings.pool_config())
                .await
                .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
            let users = DieselUserRepository::new(pool.clone())
                .count()
                .await
                .map_err(|error| io::Error::other(format!("count users: {error}")))?;
            let customers = DieselCustomerRepository::new(pool.clone())
                .count()
                .await
                .map_err(|error| io::Error::other(format!("count customers: {error}")))?;
            let (connections, idle) = pool.connections();
            info!(users, customers, connections, idle, "stats collected");
            println!("users={users}");
            println!("customers={customers}");
            println!("pool_connections={connections}");
            println!("pool_idle={idle}");
        }
    }

    Ok(())
}
