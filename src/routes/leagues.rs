use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::db;
use crate::error::ApiError;
use crate::models::{League, NewLeague};
use crate::pagination::{Listing, Page, PageRequest};
use crate::state::AppState;
use crate::validation;

// GET /leagues/ - List leagues, or resolve a player's league with ?player_name=
#[utoipa::path(
    get,
    path = "/leagues/",
    tag = "leagues",
    params(
        ("player_name" = Option<String>, Query, description = "Answer with the league of the first player by this name (case-insensitive), or `{}`"),
        ("page" = Option<i64>, Query, description = "1-based page number; enables pagination"),
        ("per_page" = Option<i64>, Query, description = "Page size, default 2, at most 1000"),
    ),
    responses(
        (status = 200, description = "All leagues, one page of them, or the league found by player name", body = Listing<League>)
    )
)]
pub async fn list_leagues(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    if let Some(player_name) = params.get("player_name").filter(|name| !name.is_empty()) {
        let league = db::get_league_by_player_name(&state.pool, player_name).await?;

        // A miss (unknown player, or no team/league on the way) answers 200 with `{}`.
        return Ok(match league {
            Some(league) => Json(league).into_response(),
            None => {
                tracing::debug!("No league reachable from player {:?}", player_name);
                Json(json!({})).into_response()
            }
        });
    }

    let listing = match PageRequest::from_params(&params) {
        Some(request) => {
            let count = db::count_leagues(&state.pool).await?;
            let leagues = db::get_leagues(&state.pool, Some(request)).await?;
            Listing::Paged(Page::new(request, count, leagues, &state.base_url(&headers), &uri))
        }
        None => Listing::All(db::get_leagues(&state.pool, None).await?),
    };

    Ok(Json(listing).into_response())
}

// POST /leagues/ - Create a league
#[utoipa::path(
    post,
    path = "/leagues/",
    tag = "leagues",
    request_body = NewLeague,
    responses(
        (status = 201, description = "League created", body = League),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 415, description = "Body is not declared as JSON")
    )
)]
pub async fn create_league(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<League>), ApiError> {
    let Json(body) = payload?;
    let new_league = validation::validate_league(&body, NewLeague::default(), false).into_result()?;

    let league = db::insert_league(&state.pool, &new_league).await?;
    tracing::info!("Created league {} ({})", league.id, league.name);

    Ok((StatusCode::CREATED, Json(league)))
}

// GET /leagues/{id} - Get league by ID
#[utoipa::path(
    get,
    path = "/leagues/{id}",
    tag = "leagues",
    params(("id" = i64, Path, description = "League id")),
    responses(
        (status = 200, description = "The league", body = League),
        (status = 404, description = "No such league")
    )
)]
pub async fn get_league(
    State(state): State<AppState>,
    Path(league_id): Path<i64>,
) -> Result<Json<League>, ApiError> {
    let league = db::get_league_by_id(&state.pool, league_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(league))
}

// PUT /leagues/{id} - Replace a league
#[utoipa::path(
    put,
    path = "/leagues/{id}",
    tag = "leagues",
    params(("id" = i64, Path, description = "League id")),
    request_body = NewLeague,
    responses(
        (status = 200, description = "League replaced", body = League),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 404, description = "No such league")
    )
)]
pub async fn update_league(
    State(state): State<AppState>,
    Path(league_id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<League>, ApiError> {
    let Json(body) = payload?;
    save_league(&state, league_id, &body, false).await
}

// PATCH /leagues/{id} - Update only the supplied fields
#[utoipa::path(
    patch,
    path = "/leagues/{id}",
    tag = "leagues",
    params(("id" = i64, Path, description = "League id")),
    request_body = NewLeague,
    responses(
        (status = 200, description = "League updated", body = League),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 404, description = "No such league")
    )
)]
pub async fn partial_update_league(
    State(state): State<AppState>,
    Path(league_id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<League>, ApiError> {
    let Json(body) = payload?;
    save_league(&state, league_id, &body, true).await
}

// DELETE /leagues/{id} - Delete a league; its teams lose their league
#[utoipa::path(
    delete,
    path = "/leagues/{id}",
    tag = "leagues",
    params(("id" = i64, Path, description = "League id")),
    responses(
        (status = 204, description = "League deleted"),
        (status = 404, description = "No such league")
    )
)]
pub async fn delete_league(
    State(state): State<AppState>,
    Path(league_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !db::delete_league(&state.pool, league_id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!("Deleted league {}", league_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn save_league(
    state: &AppState,
    league_id: i64,
    body: &Value,
    partial: bool,
) -> Result<Json<League>, ApiError> {
    let stored = db::get_league_by_id(&state.pool, league_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let changes = validation::validate_league(body, stored.into(), partial).into_result()?;

    let league = db::update_league(&state.pool, league_id, &changes)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!("Updated league {}", league_id);
    Ok(Json(league))
}
