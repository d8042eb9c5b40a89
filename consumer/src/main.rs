//! Consumer of the lightbnb crate: builds the pool from the environment, ensures the
//! schema, runs one lookup or search and prints the result as JSON.
//!
//! Run from repo root: `cargo run -p lightbnb-consumer -- search --city Vancouver`

use anyhow::Context;
use clap::{Parser, Subcommand};
use lightbnb::{
    connect, ensure_database_exists, ensure_schema, DbConfig, FilterComposition, OptionExt,
    PropertySearch, PropertyService, ReservationService, UserService,
};

#[derive(Parser, Debug)]
#[command(name = "lightbnb", about = "Query the LightBnB database")]
struct Cli {
    /// Skip creating the database and tables
    #[arg(long, global = true)]
    no_bootstrap: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a user by email
    User {
        #[arg(long)]
        email: String,
    },
    /// List a guest's reservations
    Reservations {
        #[arg(long)]
        guest_id: i32,
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Search reviewed properties, cheapest first
    Search {
        #[arg(long)]
        city: Option<String>,
        #[arg(long = "min-price")]
        minimum_price_per_night: Option<i64>,
        #[arg(long = "max-price")]
        maximum_price_per_night: Option<i64>,
        #[arg(long = "min-rating")]
        minimum_rating: Option<f64>,
        #[arg(long)]
        limit: Option<i64>,
        /// Apply every given filter instead of the all-or-city-only rule
        #[arg(long)]
        independent: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lightbnb=info,lightbnb_consumer=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DbConfig::from_env()?;
    if !cli.no_bootstrap {
        ensure_database_exists(&config).await?;
    }
    let pool = connect(&config).await.context("connecting to database")?;
    if !cli.no_bootstrap {
        ensure_schema(&pool).await?;
    }

    let result = run(&pool, cli.command).await;
    pool.close().await;
    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}

async fn run(pool: &sqlx::PgPool, command: Command) -> anyhow::Result<serde_json::Value> {
    let value = match command {
        Command::User { email } => {
            let user = UserService::find_by_email(pool, &email)
                .await
                .or_not_found(format!("user with email {}", email))?;
            serde_json::to_value(user)?
        }
        Command::Reservations { guest_id, limit } => {
            serde_json::to_value(ReservationService::list_for_guest(pool, guest_id, limit).await?)?
        }
        Command::Search {
            city,
            minimum_price_per_night,
            maximum_price_per_night,
            minimum_rating,
            limit,
            independent,
        } => {
            let search = PropertySearch {
                city,
                minimum_price_per_night,
                maximum_price_per_night,
                minimum_rating,
                composition: if independent {
                    FilterComposition::Independent
                } else {
                    FilterComposition::Legacy
                },
            };
            let listings = PropertyService::list(pool, &search, limit).await?;
            tracing::info!(count = listings.len(), "search done");
            serde_json::to_value(listings)?
        }
    };
    Ok(value)
}
