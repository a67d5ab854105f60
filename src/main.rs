//! `enrollment-api` server binary.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::sync::Notify;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use enrollment_api::adapters::http::{
    api_router, course::CourseHandlers, person::PersonHandlers, with_middleware,
};
use enrollment_api::adapters::postgres::{PostgresCourseRepository, PostgresPersonRepository};
use enrollment_api::config::{AppConfig, DatabaseConfig};
use enrollment_api::ports::{CourseRepository, PersonRepository};

const CONNECT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let pool = connect_with_retry(&config.database).await?;

    let courses: Arc<dyn CourseRepository> =
        Arc::new(PostgresCourseRepository::new(pool.clone()));
    let persons: Arc<dyn PersonRepository> =
        Arc::new(PostgresPersonRepository::new(pool.clone()));

    let app = with_middleware(
        api_router(CourseHandlers::new(courses), PersonHandlers::new(persons)),
        &config.server,
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "listening");

    let signalled = Arc::new(Notify::new());
    let shutdown = {
        let signalled = Arc::clone(&signalled);
        async move {
            wait_for_shutdown().await;
            signalled.notify_one();
        }
    };
    let grace = config.server.shutdown_timeout();
    let grace_elapsed = async {
        signalled.notified().await;
        tokio::time::sleep(grace).await;
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .into_future();

    tokio::select! {
        result = server => result?,
        _ = grace_elapsed => {
            tracing::warn!(grace_secs = grace.as_secs(), "in-flight requests did not finish in time");
        }
    }

    pool.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().pretty()).init();
    }
}

/// Keeps trying to open the pool until `connect_retry_secs` has elapsed.
async fn connect_with_retry(database: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let deadline = Instant::now() + database.connect_retry();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let result = PgPoolOptions::new()
            .min_connections(database.min_connections)
            .max_connections(database.max_connections)
            .acquire_timeout(database.acquire_timeout())
            .idle_timeout(database.idle_timeout())
            .max_lifetime(database.max_lifetime())
            .connect(&database.url)
            .await;

        match result {
            Ok(pool) => {
                tracing::info!(attempt, "connected to database");
                return Ok(pool);
            }
            Err(e) if Instant::now() < deadline => {
                tracing::warn!(attempt, error = %e, "database not reachable, retrying");
                tokio::time::sleep(CONNECT_RETRY_INTERVAL).await;
            }
            Err(e) => {
                tracing::error!(attempt, error = %e, "giving up on database connection");
                return Err(e);
            }
        }
    }
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C"),
        _ = terminate => tracing::info!("received SIGTERM"),
    }
}
