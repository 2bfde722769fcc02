use super::handlers;
use axum::{http::header, http::HeaderValue, routing::get, Router};
use tower_http::set_header::SetResponseHeaderLayer;

/// Creates the recipes router
///
/// Recipe endpoints are public and answer their own preflight, so they sit
/// outside the credentialed CORS layer and always allow any origin.
pub fn recipes_routes() -> Router {
    Router::new()
        .route(
            "/api/recipes",
            get(handlers::list_recipes)
                .post(handlers::submit_recipe)
                .options(handlers::recipes_preflight),
        )
        .route("/api/recipe", get(handlers::get_recipe))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
}
