use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use digitalsky_core::{FsDocumentStore, ImportDroneApplicationService, Principal};
use digitalsky_db::{Database, DatabaseConfig};
use digitalsky_server::auth::{JwtConfig, issue_token};
use digitalsky_server::cli::{Cli, Command, ServeArgs};
use digitalsky_server::routes;
use digitalsky_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("digitalsky=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let jwt = JwtConfig::new(cli.jwt_secret, cli.token_ttl_minutes)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cli.serve, jwt).await,
        Command::IssueToken {
            user_id,
            username,
            roles,
        } => {
            let principal = Principal::new(user_id, username, roles);
            let token = issue_token(&principal, &jwt)?;
            println!("{token}");
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs, jwt: JwtConfig) -> anyhow::Result<()> {
    let db = Database::connect(&DatabaseConfig::from_env()?).await?;
    db.migrate().await?;

    tokio::fs::create_dir_all(&args.storage_dir)
        .await
        .with_context(|| format!("Failed to create {}", args.storage_dir.display()))?;
    let documents = FsDocumentStore::new(&args.storage_dir);
    tracing::info!(root = %documents.root().display(), "Document store ready");
    let service = ImportDroneApplicationService::new(db.application_repo(), documents);

    let state = Arc::new(AppState::new(Arc::new(service), jwt));

    let app = routes::router(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(args.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", args.host, args.port);
    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
