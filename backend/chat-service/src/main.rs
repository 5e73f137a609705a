use actix_web::{web, App, HttpServer};
use chat_service::{
    config::{self, StoreBackend},
    db, error, logging,
    repository::{PgStore, Repositories},
    routes,
    state::AppState,
};
use crypto_core::jwt as core_jwt;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> Result<(), error::AppError> {
    logging::init_tracing();
    let cfg = Arc::new(config::Config::from_env()?);

    core_jwt::initialize_jwt_keys(&cfg.jwt_private_key_pem, &cfg.jwt_public_key_pem)
        .map_err(|e| error::AppError::StartServer(format!("init jwt: {e}")))?;

    let repos = match cfg.store {
        StoreBackend::Postgres => {
            let database_url = cfg
                .database_url
                .as_deref()
                .ok_or_else(|| error::AppError::Config("DATABASE_URL missing".into()))?;

            let pool = db::init_pool(database_url)
                .await
                .map_err(|e| error::AppError::StartServer(format!("db: {e}")))?;

            // The schema must be in sync before serving
            if cfg.run_migrations {
                db::run_migrations(&pool).await.map_err(|e| {
                    error::AppError::StartServer(format!("database migrations failed: {e}"))
                })?;
            }

            Repositories::from_store(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on restart");
            Repositories::in_memory()
        }
    };

    let state = AppState::new(cfg.clone(), repos);

    let bind_addr = format!("0.0.0.0:{}", cfg.port);
    tracing::info!(%bind_addr, store = ?cfg.store, "starting chat-service");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure_routes)
            .wrap(TracingLogger::default())
    })
    .bind(&bind_addr)
    .map_err(|e| error::AppError::StartServer(e.to_string()))?
    .run()
    .await
    .map_err(|e| error::AppError::StartServer(e.to_string()))?;

    Ok(())
}
