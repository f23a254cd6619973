use axum::{
    http::{HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    handlers,
    middleware::{access_gate, make_request_span, request_id},
    state::AppState,
};

/// Builds the full application: JSON API, page routes, the access gate and
/// the shared layers.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/sign-in", post(handlers::auth::sign_in))
        .route("/api/auth/sign-up", post(handlers::auth::sign_up))
        .route("/api/auth/sign-out", post(handlers::auth::sign_out))
        .route(
            "/api/auth/forgot-password",
            post(handlers::auth::forgot_password),
        )
        .route(
            "/api/auth/reset-password",
            post(handlers::auth::reset_password),
        )
        .route(
            "/api/auth/confirm-email",
            post(handlers::auth::confirm_email),
        )
        .route("/api/auth/session", get(handlers::auth::current_session));

    let social_routes = Router::new()
        .route(
            "/api/posts",
            get(handlers::posts::feed).post(handlers::posts::create_post),
        )
        .route("/api/posts/{id}", get(handlers::posts::get_post))
        .route(
            "/api/posts/{id}/comments",
            get(handlers::posts::list_comments).post(handlers::posts::create_comment),
        )
        .route("/api/users/{username}", get(handlers::users::get_profile))
        .route(
            "/api/users/{id}/follow",
            post(handlers::users::follow).delete(handlers::users::unfollow),
        );

    let admin_routes = Router::new()
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route(
            "/api/admin/users/{id}/ban",
            post(handlers::admin::ban_user).delete(handlers::admin::unban_user),
        )
        .route(
            "/api/admin/posts/{id}",
            delete(handlers::admin::delete_post),
        );

    let page_routes = Router::new()
        .route("/", get(handlers::pages::landing))
        .route("/sign-in", get(handlers::pages::sign_in))
        .route("/sign-up", get(handlers::pages::sign_up))
        .route("/forgot-password", get(handlers::pages::forgot_password))
        .route("/reset-password", get(handlers::pages::reset_password))
        .route("/reset-password/{token}", get(handlers::pages::reset_password))
        .route("/confirm-email", get(handlers::pages::confirm_email))
        .route("/home", get(handlers::pages::home))
        .route("/profile/{username}", get(handlers::pages::profile))
        .route("/posts/{id}", get(handlers::pages::post))
        .route("/admin", get(handlers::pages::admin));

    let cors = cors_layer(&state.config);

    // The gate wraps everything, fallback included; it skips `/api` itself.
    Router::new()
        .merge(auth_routes)
        .merge(social_routes)
        .merge(admin_routes)
        .merge(page_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.sessions.clone(),
            access_gate,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .max_age(std::time::Duration::from_secs(24 * 60 * 60));

    if config.cors_allow_origins.is_empty() {
        return layer.allow_origin(Any).allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer
        .allow_origin(origins)
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}
