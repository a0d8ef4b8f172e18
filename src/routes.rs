use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, http::StatusCode, middleware::from_fn, web};

use crate::{
    api::{attendance, user},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::AppError,
    models::ApiResponse,
};

type LimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-route limiter state. Built once so every worker shares the same buckets.
#[derive(Clone)]
pub struct RateLimits {
    pub login: LimiterConfig,
    pub register: LimiterConfig,
    pub protected: LimiterConfig,
}

impl RateLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            login: build_limiter(config.rate_login_per_min),
            register: build_limiter(config.rate_register_per_min),
            protected: build_limiter(config.rate_protected_per_min),
        }
    }
}

fn build_limiter(requests_per_min: u32) -> LimiterConfig {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .finish()
        .unwrap_or_default()
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::<()>::success(StatusCode::OK, "ok", None))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limits: &RateLimits) {
    let prefix = config.api_prefix.trim_end_matches('/');

    // binding failures use the same envelope as every other error
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _| AppError::Invalid(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default().error_handler(|err, _| AppError::Invalid(err.to_string()).into()),
    );

    cfg.route("/health", web::get().to(health));

    // Public routes
    cfg.service(
        web::resource(format!("{prefix}/users/register"))
            .wrap(Governor::new(&limits.register))
            .route(web::post().to(handlers::register)),
    )
    .service(
        web::resource(format!("{prefix}/users/login"))
            .wrap(Governor::new(&limits.login))
            .route(web::post().to(handlers::login)),
    );

    // Protected routes
    cfg.service(
        web::scope(prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(Governor::new(&limits.protected)) // rate limiting
            .service(
                web::resource("/users/profile")
                    .route(web::get().to(user::get_profile))
                    .route(web::put().to(user::update_profile)),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::post().to(attendance::mark_attendance))
                            .route(web::get().to(attendance::attendance_by_date)),
                    )
                    // /attendance/user
                    .service(
                        web::resource("/user").route(web::get().to(attendance::user_attendance)),
                    ),
            ),
    );
}
