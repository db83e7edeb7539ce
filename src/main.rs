use std::sync::Arc;

use dotenvy::dotenv;
use restaurant_service::config::{Config, StoreBackend};
use restaurant_service::domain::ports::SharedStore;
use restaurant_service::infrastructure::diesel_store::DieselStore;
use restaurant_service::infrastructure::memory_store::InMemoryStore;
use restaurant_service::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let store: SharedStore = match config.store {
        StoreBackend::Postgres => {
            let database_url = config.database_url.as_deref().unwrap_or_default();
            let pool = create_pool(database_url, config.db_pool_size, config.operation_timeout);
            run_migrations(&pool).map_err(std::io::Error::other)?;
            Arc::new(DieselStore::new(pool))
        }
        StoreBackend::Memory => {
            log::warn!("running on the in-memory store; data is lost on exit");
            Arc::new(InMemoryStore::new())
        }
    };

    log::info!(
        "Starting server at http://{}:{} (operation timeout {:?})",
        config.host,
        config.port,
        config.operation_timeout
    );

    build_server(AppState::new(store, config.operation_timeout), &config.host, config.port)?.await
}
