use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use vane::config::{Config, DatabaseBackend};
use vane::stats;
use vane::storage::{PostgresStorage, SqliteStorage, Storage};

#[derive(Parser)]
#[command(name = "vane-admin")]
#[command(about = "Vane admin management CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered users
    Users {
        /// Maximum number of users to list
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
    /// Show a user's search history, most recent first
    History {
        /// User ID
        user_id: String,
    },
    /// Show aggregated search statistics for a user
    Stats {
        /// User ID
        user_id: String,
        /// Number of top cities / recent searches to show
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let storage: Arc<dyn Storage> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            Arc::new(SqliteStorage::new(&config.database.url, config.database.max_connections).await?)
        }
        DatabaseBackend::Postgres => Arc::new(
            PostgresStorage::new(&config.database.url, config.database.max_connections).await?,
        ),
    };

    // Ensure database is initialized
    storage.init().await?;

    match cli.command {
        Commands::Users { limit } => {
            let users = storage.list_users(limit, 0).await?;
            if users.is_empty() {
                println!("No users found.");
            } else {
                println!("{:<34} {:<20} {}", "User ID", "Username", "Email");
                println!("{}", "-".repeat(80));
                for user in users {
                    println!("{:<34} {:<20} {}", user.id, user.username, user.email);
                }
            }
        }
        Commands::History { user_id } => {
            let records = storage.history_for_user(&user_id).await?;
            let ordered = stats::recent_searches(&records, records.len());
            if ordered.is_empty() {
                println!("No search history for user '{}'.", user_id);
            } else {
                println!("{:<6} {:<20} {:<8} {:<12} {:>8} {}", "ID", "City", "Country", "Condition", "Temp", "Searched At");
                println!("{}", "-".repeat(80));
                for record in ordered {
                    println!(
                        "{:<6} {:<20} {:<8} {:<12} {:>7.1}C {}",
                        record.id,
                        record.city,
                        record.country,
                        record.condition,
                        record.temperature,
                        record.searched_at
                    );
                }
            }
        }
        Commands::Stats { user_id, limit } => {
            let records = storage.history_for_user(&user_id).await?;
            let snapshot = stats::snapshot(&records, limit);

            println!("Top cities:");
            for entry in &snapshot.top_cities {
                println!("  {:<20} {}", entry.city, entry.count);
            }
            println!("Weather distribution:");
            for entry in &snapshot.weather_distribution {
                println!("  {:<20} {}", entry.condition, entry.count);
            }
            println!("Recent searches:");
            for record in &snapshot.recent_searches {
                println!("  {:<20} {} ({})", record.city, record.condition, record.searched_at);
            }
        }
    }

    Ok(())
}
