use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::{App, HttpServer};
use anyhow::Context;
use chrono::Duration;
use dotenvy::dotenv;
use tracing::{Level, info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use attendance::{
    clock::SystemClock,
    config::Config,
    db::init_db,
    docs::ApiDoc,
    repository::{
        AttendanceRepository, UserRepository,
        memory::MemoryStore,
        mysql::{MySqlAttendanceRepository, MySqlUserRepository},
    },
    routes::{self, RateLimits},
    state::AppState,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env().context("failed to load configuration")?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level.parse::<Level>().unwrap_or(Level::INFO))
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(addr = %config.server_addr, "Server starting...");

    let (users, attendance): (Arc<dyn UserRepository>, Arc<dyn AttendanceRepository>) =
        if config.uses_memory_store() {
            warn!("DATABASE_URL=memory, records will not survive a restart");
            let store = Arc::new(MemoryStore::new());
            (
                store.clone() as Arc<dyn UserRepository>,
                store as Arc<dyn AttendanceRepository>,
            )
        } else {
            let pool = init_db(&config.database_url, config.db_max_connections)
                .await
                .context("failed to initialise database")?;
            (
                Arc::new(MySqlUserRepository::new(pool.clone())) as Arc<dyn UserRepository>,
                Arc::new(MySqlAttendanceRepository::new(pool)) as Arc<dyn AttendanceRepository>,
            )
        };

    let state = AppState::new(
        users,
        attendance,
        &config.jwt_secret,
        Duration::seconds(config.token_ttl),
        Arc::new(SystemClock),
    );
    let limits = RateLimits::from_config(&config);
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .configure(|cfg| state.configure(cfg))
            // auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, &config, &limits))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
