//! Rubel Woodworks CLI - Database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! rw-cli migrate
//!
//! # Create an admin account
//! rw-cli admin create -u manager -p 'long-password' --admin
//!
//! # Reset a password
//! rw-cli admin password -u manager -p 'new-long-password'
//! ```
//!
//! # Environment Variables
//!
//! - `RUBEL_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rw-cli")]
#[command(author, version, about = "Rubel Woodworks CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new account
    Create {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password (min 8 characters)
        #[arg(short, long)]
        password: String,

        /// Grant admin rights
        #[arg(long)]
        admin: bool,
    },
    /// Reset an account's password
    Password {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// New password (min 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                password,
                admin,
            } => {
                commands::admin::create_user(&username, &password, admin).await?;
            }
            AdminAction::Password { username, password } => {
                commands::admin::reset_password(&username, &password).await?;
            }
        },
    }
    Ok(())
}
