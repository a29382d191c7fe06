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
use crate::filters::TeamFilter;
use crate::models::{NewTeam, Team};
use crate::pagination::{Listing, Page, PageRequest};
use crate::state::AppState;
use crate::validation::{self, Validated};

// GET /teams/ - List teams, filtered by name/city/coach/championships_won/number_of_players
#[utoipa::path(
    get,
    path = "/teams/",
    tag = "teams",
    params(
        ("name" = Option<String>, Query, description = "Case-insensitive exact name"),
        ("city" = Option<String>, Query, description = "Case-insensitive exact city"),
        ("coach" = Option<String>, Query, description = "Case-insensitive exact coach"),
        ("championships_won" = Option<i64>, Query, description = "Exact number of championships"),
        ("number_of_players" = Option<i64>, Query, description = "Exact squad size"),
        ("page" = Option<i64>, Query, description = "1-based page number; enables pagination"),
        ("per_page" = Option<i64>, Query, description = "Page size, default 2, at most 1000"),
    ),
    responses(
        (status = 200, description = "Matching teams, all or one page", body = Listing<Team>)
    )
)]
pub async fn list_teams(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Listing<Team>>, ApiError> {
    let filter = TeamFilter::from_params(&params);

    let listing = match PageRequest::from_params(&params) {
        Some(request) => {
            let count = db::count_teams(&state.pool, &filter).await?;
            let teams = db::get_teams(&state.pool, &filter, Some(request)).await?;
            Listing::Paged(Page::new(request, count, teams, &state.base_url(&headers), &uri))
        }
        None => Listing::All(db::get_teams(&state.pool, &filter, None).await?),
    };

    Ok(Json(listing))
}

// POST /teams/ - Create a team
#[utoipa::path(
    post,
    path = "/teams/",
    tag = "teams",
    request_body = NewTeam,
    responses(
        (status = 201, description = "Team created", body = Team),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 415, description = "Body is not declared as JSON")
    )
)]
pub async fn create_team(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    let Json(body) = payload?;
    let mut validated = validation::validate_team(&body, NewTeam::default(), false);
    check_league(&state.pool, &mut validated).await?;
    let new_team = validated.into_result()?;

    let team = db::insert_team(&state.pool, &new_team).await?;
    tracing::info!("Created team {} ({})", team.id, team.name);

    Ok((StatusCode::CREATED, Json(team)))
}

// GET /teams/{id} - Get team by ID
#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = i64, Path, description = "Team id")),
    responses(
        (status = 200, description = "The team", body = Team),
        (status = 404, description = "No such team")
    )
)]
pub async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
) -> Result<Json<Team>, ApiError> {
    let team = db::get_team_by_id(&state.pool, team_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(team))
}

// PUT /teams/{id} - Replace a team
#[utoipa::path(
    put,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = i64, Path, description = "Team id")),
    request_body = NewTeam,
    responses(
        (status = 200, description = "Team replaced", body = Team),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 404, description = "No such team")
    )
)]
pub async fn update_team(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Team>, ApiError> {
    let Json(body) = payload?;
    save_team(&state, team_id, &body, false).await
}

// PATCH /teams/{id} - Update only the supplied fields
#[utoipa::path(
    patch,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = i64, Path, description = "Team id")),
    request_body = NewTeam,
    responses(
        (status = 200, description = "Team updated", body = Team),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 404, description = "No such team")
    )
)]
pub async fn partial_update_team(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Team>, ApiError> {
    let Json(body) = payload?;
    save_team(&state, team_id, &body, true).await
}

// DELETE /teams/{id} - Delete a team; its players lose their team
#[utoipa::path(
    delete,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = i64, Path, description = "Team id")),
    responses(
        (status = 204, description = "Team deleted"),
        (status = 404, description = "No such team")
    )
)]
pub async fn delete_team(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !db::delete_team(&state.pool, team_id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!("Deleted team {}", team_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn save_team(
    state: &AppState,
    team_id: i64,
    body: &Value,
    partial: bool,
) -> Result<Json<Team>, ApiError> {
    let stored = db::get_team_by_id(&state.pool, team_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let mut validated = validation::validate_team(body, stored.into(), partial);
    check_league(&state.pool, &mut validated).await?;
    let changes = validated.into_result()?;

    let team = db::update_team(&state.pool, team_id, &changes)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!("Updated team {}", team_id);
    Ok(Json(team))
}

/// Reports a `league_id` that names no stored league, next to the body's other errors.
async fn check_league(pool: &SqlitePool, validated: &mut Validated<NewTeam>) -> Result<(), sqlx::Error> {
    if validated.errors.contains("league_id") {
        return Ok(());
    }
    if let Some(id) = validated.record.league_id {
        if !db::league_exists(pool, id).await? {
            let message = format!("Invalid pk \"{}\" - object does not exist.", id);
            validated.errors.add("league_id", message);
        }
    }
    Ok(())
}
