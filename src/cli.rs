use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::models::User;
use crate::password::hash_password;
use crate::{build_app, db};

#[derive(Debug, Parser)]
#[command(name = "gamenight", version, about = "Schedule tabletop game sessions")]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the web server (the default)
    Serve,
    /// Register a user without going through the web form
    CreateUser { email: String, password: String },
}

pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let pool = db::init_pool(&cli.config.database_url).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(pool, &cli.config).await,
        Command::CreateUser { email, password } => {
            create_user(&pool, &cli.config, &email, &password).await
        }
    }
}

async fn serve(pool: sqlx::SqlitePool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_app(pool, config.settings());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

pub async fn create_user(
    pool: &sqlx::SqlitePool,
    config: &Config,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("email and password are required".into());
    }

    let hash = hash_password(password, config.bcrypt_cost).await?;
    let user = User::create(pool, email, &hash).await?;

    println!("Created user:");
    println!("  ID: {}", user.id);
    println!("  Email: {}", user.email);

    Ok(())
}
