mod common;

use axum::http::StatusCode;
use common::test_data::{equipa, liga, with};
use common::*;
use serde_json::json;

async fn seed_teams(app: &axum::Router) {
    create(app, "/teams/", equipa()).await;
    create(
        app,
        "/teams/",
        json!({
            "name": "Team",
            "city": "Lisbon",
            "championships_won": 1,
            "coach": "Coach",
            "number_of_players": 11
        }),
    )
    .await;
    create(
        app,
        "/teams/",
        json!({
            "name": "Clube",
            "city": "porto",
            "championships_won": 1,
            "coach": "Mister",
            "number_of_players": 25
        }),
    )
    .await;
}

fn names(body: &serde_json::Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|team| team["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_create_and_list() {
    let app = test_app().await;

    let (status, created) = post(&app, "/teams/", equipa()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["league"], json!(null));

    let (status, teams) = get(&app, "/teams/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(teams.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_league_is_rendered_by_name() {
    let app = test_app().await;
    let league_id = create(&app, "/leagues/", liga()).await;

    let (status, team) = post(&app, "/teams/", with(equipa(), "league_id", json!(league_id))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(team["league"], json!("Liga"));
    assert!(team.get("league_id").is_none());
}

#[tokio::test]
async fn test_display_league_field_is_read_only() {
    let app = test_app().await;
    create(&app, "/leagues/", liga()).await;

    let (status, team) = post(&app, "/teams/", with(equipa(), "league", json!("Liga"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(team["league"], json!(null));
}

#[tokio::test]
async fn test_unknown_league_reference_is_rejected() {
    let app = test_app().await;

    let (status, errors) = post(&app, "/teams/", with(equipa(), "league_id", json!(42))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        errors["league_id"],
        json!(["Invalid pk \"42\" - object does not exist."])
    );
}

#[tokio::test]
async fn test_unknown_league_is_reported_with_other_field_errors() {
    let app = test_app().await;
    let body = with(with(equipa(), "name", json!("")), "league_id", json!(5));

    let (status, errors) = post(&app, "/teams/", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        errors,
        json!({
            "name": ["This field may not be blank."],
            "league_id": ["Invalid pk \"5\" - object does not exist."]
        })
    );
}

#[tokio::test]
async fn test_filter_by_name_is_case_insensitive_and_exact() {
    let app = test_app().await;
    seed_teams(&app).await;

    let (status, teams) = get(&app, "/teams/?name=equipa").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&teams), vec!["Equipa"]);

    let (_, teams) = get(&app, "/teams/?name=Equip").await;
    assert_eq!(teams, json!([]));
}

#[tokio::test]
async fn test_filters_combine() {
    let app = test_app().await;
    seed_teams(&app).await;

    let (_, teams) = get(&app, "/teams/?city=PORTO").await;
    assert_eq!(names(&teams), vec!["Equipa", "Clube"]);

    let (_, teams) = get(&app, "/teams/?city=porto&championships_won=1").await;
    assert_eq!(names(&teams), vec!["Clube"]);

    let (_, teams) = get(&app, "/teams/?coach=coach&number_of_players=11").await;
    assert_eq!(names(&teams), vec!["Team"]);

    let (_, teams) = get(&app, "/teams/?championships_won=1&number_of_players=99").await;
    assert_eq!(teams, json!([]));
}

#[tokio::test]
async fn test_unknown_and_malformed_filters_are_ignored() {
    let app = test_app().await;
    seed_teams(&app).await;

    let (_, teams) = get(&app, "/teams/?stadium=Dragao").await;
    assert_eq!(teams.as_array().map(Vec::len), Some(3));

    let (status, teams) = get(&app, "/teams/?championships_won=abc&city=lisbon").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&teams), vec!["Team"]);
}

#[tokio::test]
async fn test_filter_applies_before_pagination() {
    let app = test_app().await;
    seed_teams(&app).await;

    let (_, page) = get(&app, "/teams/?city=porto&page=1&per_page=1").await;

    assert_eq!(page["count"], json!(2));
    assert_eq!(page["results"][0]["name"], json!("Equipa"));
    assert_eq!(
        page["next"],
        json!("http://testserver/teams/?city=porto&page=2&per_page=1")
    );
}

#[tokio::test]
async fn test_put_updates_team() {
    let app = test_app().await;
    let id = create(&app, "/teams/", equipa()).await;

    let body = json!({
        "name": "Equipa",
        "city": "Porto",
        "championships_won": 1,
        "coach": "Treinador",
        "number_of_players": 1
    });
    let (status, team) = put(&app, &format!("/teams/{}", id), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["championships_won"], json!(1));
    assert_eq!(team["number_of_players"], json!(1));
}

#[tokio::test]
async fn test_patch_moves_team_between_leagues() {
    let app = test_app().await;
    let first = create(&app, "/leagues/", liga()).await;
    let second = create(&app, "/leagues/", with(liga(), "name", json!("Premier"))).await;
    let id = create(&app, "/teams/", with(equipa(), "league_id", json!(first))).await;

    let (status, team) = patch(&app, &format!("/teams/{}", id), json!({"league_id": second})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["league"], json!("Premier"));

    let (_, team) = patch(&app, &format!("/teams/{}", id), json!({"league_id": null})).await;
    assert_eq!(team["league"], json!(null));
    assert_eq!(team["name"], json!("Equipa"));
}

#[tokio::test]
async fn test_patch_rejects_bad_integer() {
    let app = test_app().await;
    let id = create(&app, "/teams/", equipa()).await;

    let (status, errors) = patch(&app, &format!("/teams/{}", id), json!({"number_of_players": "eleven"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors, json!({"number_of_players": ["This field must be an integer."]}));
}

#[tokio::test]
async fn test_delete_league_clears_team_reference() {
    let app = test_app().await;
    let league_id = create(&app, "/leagues/", liga()).await;
    let team_id = create(&app, "/teams/", with(equipa(), "league_id", json!(league_id))).await;

    let (status, _) = delete(&app, &format!("/leagues/{}", league_id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, team) = get(&app, &format!("/teams/{}", team_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["league"], json!(null));
    assert_eq!(team["name"], json!("Equipa"));
}

#[tokio::test]
async fn test_delete_team() {
    let app = test_app().await;
    let id = create(&app, "/teams/", equipa()).await;

    assert_eq!(delete(&app, &format!("/teams/{}", id)).await.0, StatusCode::NO_CONTENT);
    assert_eq!(get(&app, &format!("/teams/{}", id)).await.0, StatusCode::NOT_FOUND);
    assert_eq!(delete(&app, &format!("/teams/{}", id)).await.0, StatusCode::NOT_FOUND);
}
