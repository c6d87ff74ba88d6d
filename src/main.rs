use axum::Router;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use tickethub_server::config::{Config, StorageBackend};
use tickethub_server::routes::create_routes;
use tickethub_server::services::BookingFacade;
use tickethub_server::state::AppState;
use tickethub_server::storage::Stores;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    let stores = match config.storage_backend {
        StorageBackend::Memory => {
            tracing::info!("Using the in-memory storage backend");
            Stores::in_memory()
        }
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&config.database_url)
                .await
                .expect("Failed to connect to database");

            tracing::info!("Successfully connected to database");

            sqlx::migrate!()
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            tracing::info!("Migrations run successfully");

            Stores::postgres(pool)
        }
    };

    let state = AppState::new(BookingFacade::new(stores));
    let app: Router = create_routes(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
