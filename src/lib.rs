use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod state;
pub mod validation;

pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and API docs
        .route("/health", get(routes::health::health_check))
        .merge(routes::docs::router())

        // League endpoints
        .route(
            "/leagues/",
            get(routes::leagues::list_leagues).post(routes::leagues::create_league),
        )
        .route(
            "/leagues/{id}",
            get(routes::leagues::get_league)
                .put(routes::leagues::update_league)
                .patch(routes::leagues::partial_update_league)
                .delete(routes::leagues::delete_league),
        )

        // Team endpoints
        .route(
            "/teams/",
            get(routes::teams::list_teams).post(routes::teams::create_team),
        )
        .route(
            "/teams/{id}",
            get(routes::teams::get_team)
                .put(routes::teams::update_team)
                .patch(routes::teams::partial_update_team)
                .delete(routes::teams::delete_team),
        )

        // Player endpoints
        .route(
            "/players/",
            get(routes::players::list_players).post(routes::players::create_player),
        )
        .route(
            "/players/{id}",
            get(routes::players::get_player)
                .put(routes::players::update_player)
                .patch(routes::players::partial_update_player)
                .delete(routes::players::delete_player),
        )

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
