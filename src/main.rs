use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use utoipa_swagger_ui::SwaggerUi;

use attendance::config::Config;
use attendance::docs::ApiDoc;
use attendance::domain::AttendanceService;
use attendance::routes::{self, RateLimits};
use attendance::store::{AttendanceStore, MySqlStore};
use attendance::db;

fn init_tracing(config: &Config) -> WorkerGuard {
    // Rolling daily log, mirrored to stdout
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking.and(std::io::stdout))
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    guard
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let _guard = init_tracing(&config);

    info!("Server starting...");

    let pool = db::init_db(&config).await?;
    db::prepare_schema(&pool, config.reset_schema).await?;
    if config.seed_employees {
        db::seed_employees(&pool).await?;
    }

    let store: Arc<dyn AttendanceStore> = Arc::new(MySqlStore::new(pool.clone()));
    let service = Data::new(AttendanceService::with_system_clock(store));
    let limits = RateLimits::from_config(&config)?;
    let openapi = ApiDoc::with_prefix(&config.api_prefix);

    let server_addr = config.server_addr.clone();
    info!(%server_addr, "Server running");
    info!("Health check: http://{server_addr}/health");

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors(&config))
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", openapi.clone()),
            )
            .app_data(service.clone())
            .configure(|cfg| routes::configure(cfg, &config, &limits))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}
