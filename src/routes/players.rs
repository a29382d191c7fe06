use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::Value;
use sqlx::sqlite::SqlitePool;
use std::collections::HashMap;

use crate::db;
use crate::error::ApiError;
use crate::models::{NewPlayer, Player};
use crate::pagination::{Listing, Page, PageRequest};
use crate::state::AppState;
use crate::validation::{self, Validated};

// GET /players/ - List players
#[utoipa::path(
    get,
    path = "/players/",
    tag = "players",
    params(
        ("page" = Option<i64>, Query, description = "1-based page number; enables pagination"),
        ("per_page" = Option<i64>, Query, description = "Page size, default 2, at most 1000"),
    ),
    responses(
        (status = 200, description = "All players, or one page of them", body = Listing<Player>)
    )
)]
pub async fn list_players(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Listing<Player>>, ApiError> {
    let listing = match PageRequest::from_params(&params) {
        Some(request) => {
            let count = db::count_players(&state.pool).await?;
            let players = db::get_players(&state.pool, Some(request)).await?;
            Listing::Paged(Page::new(request, count, players, &state.base_url(&headers), &uri))
        }
        None => Listing::All(db::get_players(&state.pool, None).await?),
    };

    Ok(Json(listing))
}

// POST /players/ - Create a player
#[utoipa::path(
    post,
    path = "/players/",
    tag = "players",
    request_body = NewPlayer,
    responses(
        (status = 201, description = "Player created", body = Player),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 415, description = "Body is not declared as JSON")
    )
)]
pub async fn create_player(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let Json(body) = payload?;
    let mut validated = validation::validate_player(&body, NewPlayer::default(), false);
    check_team(&state.pool, &mut validated).await?;
    let new_player = validated.into_result()?;

    let player = db::insert_player(&state.pool, &new_player).await?;
    tracing::info!("Created player {} ({})", player.id, player.name);

    Ok((StatusCode::CREATED, Json(player)))
}

// GET /players/{id} - Get player by ID
#[utoipa::path(
    get,
    path = "/players/{id}",
    tag = "players",
    params(("id" = i64, Path, description = "Player id")),
    responses(
        (status = 200, description = "The player", body = Player),
        (status = 404, description = "No such player")
    )
)]
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
) -> Result<Json<Player>, ApiError> {
    let player = db::get_player_by_id(&state.pool, player_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(player))
}

// PUT /players/{id} - Replace a player
#[utoipa::path(
    put,
    path = "/players/{id}",
    tag = "players",
    params(("id" = i64, Path, description = "Player id")),
    request_body = NewPlayer,
    responses(
        (status = 200, description = "Player replaced", body = Player),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 404, description = "No such player")
    )
)]
pub async fn update_player(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Player>, ApiError> {
    let Json(body) = payload?;
    save_player(&state, player_id, &body, false).await
}

// PATCH /players/{id} - Update only the supplied fields
#[utoipa::path(
    patch,
    path = "/players/{id}",
    tag = "players",
    params(("id" = i64, Path, description = "Player id")),
    request_body = NewPlayer,
    responses(
        (status = 200, description = "Player updated", body = Player),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 404, description = "No such player")
    )
)]
pub async fn partial_update_player(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Player>, ApiError> {
    let Json(body) = payload?;
    save_player(&state, player_id, &body, true).await
}

// DELETE /players/{id} - Delete a player
#[utoipa::path(
    delete,
    path = "/players/{id}",
    tag = "players",
    params(("id" = i64, Path, description = "Player id")),
    responses(
        (status = 204, description = "Player deleted"),
        (status = 404, description = "No such player")
    )
)]
pub async fn delete_player(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !db::delete_player(&state.pool, player_id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!("Deleted player {}", player_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn save_player(
    state: &AppState,
    player_id: i64,
    body: &Value,
    partial: bool,
) -> Result<Json<Player>, ApiError> {
    let stored = db::get_player_by_id(&state.pool, player_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let mut validated = validation::validate_player(body, stored.into(), partial);
    check_team(&state.pool, &mut validated).await?;
    let changes = validated.into_result()?;

    let player = db::update_player(&state.pool, player_id, &changes)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!("Updated player {}", player_id);
    Ok(Json(player))
}

/// Reports a `team_id` that names no stored team, next to the body's other errors.
async fn check_team(pool: &SqlitePool, validated: &mut Validated<NewPlayer>) -> Result<(), sqlx::Error> {
    if validated.errors.contains("team_id") {
        return Ok(());
    }
    if let Some(id) = validated.record.team_id {
        if !db::team_exists(pool, id).await? {
            let message = format!("Invalid pk \"{}\" - object does not exist.", id);
            validated.errors.add("team_id", message);
        }
    }
    Ok(())
}
