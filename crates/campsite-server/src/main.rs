use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use campsite_api::auth;
use campsite_api::{AppState, AppStateInner};
use campsite_db::Database;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "campsite_server=debug,campsite_api=debug,tower_http=debug".into()
            }),
        )
        .init();

    // Config
    let jwt_secret = std::env::var("CAMPSITE_JWT_SECRET").unwrap_or_default();
    if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
        eprintln!("FATAL: CAMPSITE_JWT_SECRET is unset or still a placeholder.");
        eprintln!("       Set it in your .env file and restart.");
        std::process::exit(1);
    }

    let db_path = std::env::var("CAMPSITE_DB_PATH").unwrap_or_else(|_| "campsite.db".into());
    let host = std::env::var("CAMPSITE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CAMPSITE_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let site_url = std::env::var("CAMPSITE_SITE_URL")
        .unwrap_or_else(|_| format!("http://localhost:{}", port))
        .trim_end_matches('/')
        .to_string();

    let db = Database::open(&PathBuf::from(&db_path))?;

    match (
        std::env::var("CAMPSITE_ADMIN_USERNAME"),
        std::env::var("CAMPSITE_ADMIN_PASSWORD"),
    ) {
        (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
            auth::ensure_admin(&db, &username, &password)?;
        }
        (Ok(_), Err(_)) | (Err(_), Ok(_)) => {
            warn!("Set both CAMPSITE_ADMIN_USERNAME and CAMPSITE_ADMIN_PASSWORD to seed an admin");
        }
        _ => {}
    }

    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret,
        site_url,
    });

    let app = campsite_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Campsite server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                let _ = ctrl_c.await;
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        info!("Received Ctrl+C, shutting down...");
    }
}
