use crate::{
    api::{asset, attendance, auth, employee, health},
    config::Config,
    error::AppError,
};
use actix_cors::Cors;
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{http::header, web};

pub type Limiter = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP quotas. Built once so every worker shares the same buckets.
#[derive(Clone)]
pub struct RateLimits {
    pub punch: Limiter,
    pub api: Limiter,
}

impl RateLimits {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            punch: build_limiter(config.rate_punch_per_min)?,
            api: build_limiter(config.rate_api_per_min)?,
        })
    }
}

fn build_limiter(requests_per_min: u32) -> anyhow::Result<Limiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit: {requests_per_min} per minute"))
}

/// CORS for the HR dashboard and employee pages served from other origins.
/// Wrap it around the whole app so preflight requests never reach routing.
pub fn cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600);

    if config.cors_origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }

    config
        .cors_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limits: &RateLimits) {
    // Extractor failures answer in the same `{ "error": ... }` shape as handlers
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::validation(format!("Invalid request body: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::validation(format!("Invalid path parameter: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::validation(format!("Invalid query string: {err}")).into()
    }));

    cfg.route("/health", web::get().to(health::health));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Governor::new(&limits.api))
            .service(
                web::scope("/auth")
                    // /auth/validate
                    .service(web::resource("/validate").route(web::post().to(auth::validate))),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/punch-in")
                            .wrap(Governor::new(&limits.punch))
                            .route(web::post().to(attendance::punch_in)),
                    )
                    .service(
                        web::resource("/punch-out")
                            .wrap(Governor::new(&limits.punch))
                            .route(web::post().to(attendance::punch_out)),
                    )
                    // must precede /{emp_id}
                    .service(web::resource("/all").route(web::get().to(attendance::all_for_date)))
                    .service(
                        web::resource("/approve/{id}").route(web::put().to(attendance::approve)),
                    )
                    .service(web::resource("/reject/{id}").route(web::put().to(attendance::reject)))
                    .service(web::resource("/{emp_id}").route(web::get().to(attendance::history))),
            )
            .service(
                web::scope("/employee")
                    .service(web::resource("/{emp_id}").route(web::get().to(employee::get_employee))),
            )
            .service(
                web::scope("/assets")
                    .service(web::resource("").route(web::post().to(asset::create_asset_request)))
                    .service(
                        web::resource("/{emp_id}").route(web::get().to(asset::list_asset_requests)),
                    ),
            ),
    );
}
