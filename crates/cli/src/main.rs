//! Grievance desk CLI - database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Run schema and session-store migrations
//! grievance-cli migrate
//!
//! # Create an admin account
//! grievance-cli admin create -u root -e admin@example.com -p 'correct horse'
//!
//! # Create a complainant account
//! grievance-cli user create -u alice -e alice@example.com -p 'battery staple'
//! ```
//!
//! # Environment Variables
//!
//! - `GRIEVANCE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use grievance_core::UserRole;

mod commands;

#[derive(Parser)]
#[command(name = "grievance-cli")]
#[command(author, version, about = "Grievance desk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations (schema and session store)
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Manage complainant accounts
    User {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create a new account
    Create {
        /// Username shown on the admin dashboard
        #[arg(short, long)]
        username: String,

        /// Email address used to log in
        #[arg(short, long)]
        email: String,

        /// Password (hashed with argon2 before storage)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => create(action, UserRole::Admin).await?,
        Commands::User { action } => create(action, UserRole::User).await?,
    }
    Ok(())
}

async fn create(action: AccountAction, role: UserRole) -> Result<(), commands::CommandError> {
    match action {
        AccountAction::Create {
            username,
            email,
            password,
        } => {
            let id = commands::account::create(&username, &email, &password, role).await?;
            tracing::info!(user_id = %id, %role, "account created");
        }
    }
    Ok(())
}
