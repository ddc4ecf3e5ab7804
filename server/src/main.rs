use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use transit_server::config::Config;
use transit_server::routes::{create_routes, operations_routes, ticket_routes};
use transit_server::services::{Clock, SystemClock};
use transit_server::state::{AppState, OperationsState};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    tracing::info!(
        base_price = %config.ticket_policy.base_price,
        validity_minutes = config.ticket_policy.validity.num_minutes(),
        "Ticket policy loaded"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let tickets = AppState::postgres(pool.clone(), clock.clone(), config.ticket_policy);
    let operations = OperationsState::new(pool, clock);

    let app = create_routes(ticket_routes(tickets).merge(operations_routes(operations)));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
