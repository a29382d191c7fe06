use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::models::{League, NewLeague, NewPlayer, NewTeam, Player, Team};
use crate::routes::health::HealthResponse;
use crate::state::AppState;

pub const OPENAPI_PATH: &str = "/api-doc/openapi.json";

/// OpenAPI document covering every endpoint of the service.
#[derive(OpenApi)]
#[openapi(
    info(title = "Football API", description = "Leagues, teams and players"),
    paths(
        crate::routes::health::health_check,
        crate::routes::leagues::list_leagues,
        crate::routes::leagues::create_league,
        crate::routes::leagues::get_league,
        crate::routes::leagues::update_league,
        crate::routes::leagues::partial_update_league,
        crate::routes::leagues::delete_league,
        crate::routes::teams::list_teams,
        crate::routes::teams::create_team,
        crate::routes::teams::get_team,
        crate::routes::teams::update_team,
        crate::routes::teams::partial_update_team,
        crate::routes::teams::delete_team,
        crate::routes::players::list_players,
        crate::routes::players::create_player,
        crate::routes::players::get_player,
        crate::routes::players::update_player,
        crate::routes::players::partial_update_player,
        crate::routes::players::delete_player,
    ),
    components(schemas(League, Team, Player, NewLeague, NewTeam, NewPlayer, HealthResponse)),
    tags(
        (name = "health", description = "Service readiness"),
        (name = "leagues", description = "League CRUD and the player-name lookup"),
        (name = "teams", description = "Team CRUD with filters"),
        (name = "players", description = "Player CRUD"),
    )
)]
pub struct ApiDoc;

/// Swagger UI at `/docs`, backed by the generated document.
pub fn router() -> Router<AppState> {
    SwaggerUi::new("/docs")
        .url(OPENAPI_PATH, ApiDoc::openapi())
        .into()
}
