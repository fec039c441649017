use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    init_metrics, metrics_handler, metrics_middleware, require_session,
    security_headers_middleware, trace_id,
};
use crate::routes::{admin, claims, csp, groups, health, invitations, items, metadata, profiles, wishlists};
use crate::services::email::EmailService;
use crate::services::product_metadata::ProductMetadataService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub email: EmailService,
    pub metadata: ProductMetadataService,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    init_metrics();

    let email = EmailService::new(config.email.clone());
    let metadata_service = ProductMetadataService::new(config.metadata.clone());
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        email,
        metadata: metadata_service,
    };

    // Build CORS layer based on configuration. With no configured
    // origins, cross-origin requests are rejected by default; the
    // preflight OPTIONS path is handled by the layer itself.
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes (require a session token)
    let protected_routes = Router::new()
        // Group routes
        .route(
            "/api/v1/groups",
            post(groups::create_group).get(groups::list_groups),
        )
        .route(
            "/api/v1/groups/:group_id",
            get(groups::get_group).delete(groups::delete_group),
        )
        .route(
            "/api/v1/groups/:group_id/members",
            get(groups::list_members),
        )
        .route(
            "/api/v1/groups/:group_id/members/:user_id",
            delete(groups::remove_member),
        )
        .route(
            "/api/v1/groups/:group_id/members/:user_id/role",
            put(groups::update_member_role),
        )
        // Invitation routes
        .route(
            "/api/v1/groups/:group_id/invitations",
            post(invitations::create_invitation),
        )
        .route(
            "/api/v1/invitations/:invitation_id/accept",
            post(invitations::accept_invitation),
        )
        // Wishlist routes
        .route(
            "/api/v1/groups/:group_id/wishlists",
            post(wishlists::create_wishlist).get(wishlists::list_wishlists),
        )
        .route(
            "/api/v1/wishlists/:wishlist_id",
            delete(wishlists::delete_wishlist),
        )
        // Item routes
        .route(
            "/api/v1/wishlists/:wishlist_id/items",
            post(items::create_item),
        )
        .route(
            "/api/v1/items/:item_id",
            put(items::update_item).delete(items::delete_item),
        )
        // Claim routes
        .route(
            "/api/v1/items/:item_id/claims",
            post(claims::claim_item).delete(claims::unclaim_item),
        )
        // Profile routes
        .route("/api/v1/profiles/:user_id", get(profiles::get_profile))
        // Global admin routes
        .route("/api/v1/admin/users/:user_id", delete(admin::delete_user))
        .route(
            "/api/v1/admin/users/:user_id/role",
            put(admin::update_user_role),
        )
        // Product metadata
        .route("/api/v1/metadata/fetch", post(metadata::fetch_metadata))
        // Session auth runs before all of the above
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route(
            "/api/v1/invitations/validate/:token",
            get(invitations::validate_invitation),
        )
        .route("/api/csp-report", post(csp::csp_report))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
