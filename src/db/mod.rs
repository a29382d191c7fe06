use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use std::str::FromStr;

use crate::filters::TeamFilter;
use crate::models::*;
use crate::pagination::PageRequest;

const SCHEMA: [&str; 3] = [
    r#"CREATE TABLE IF NOT EXISTS leagues (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           name TEXT NOT NULL,
           country TEXT NOT NULL,
           number_of_teams INTEGER NOT NULL,
           current_champion TEXT,
           most_championships TEXT,
           most_appearances TEXT
       )"#,
    r#"CREATE TABLE IF NOT EXISTS teams (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           name TEXT NOT NULL,
           city TEXT NOT NULL,
           championships_won INTEGER NOT NULL,
           coach TEXT NOT NULL,
           number_of_players INTEGER NOT NULL,
           league_id INTEGER REFERENCES leagues(id) ON DELETE SET NULL
       )"#,
    r#"CREATE TABLE IF NOT EXISTS players (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           name TEXT NOT NULL,
           age INTEGER NOT NULL,
           position TEXT NOT NULL,
           appearances INTEGER NOT NULL,
           team_id INTEGER REFERENCES teams(id) ON DELETE SET NULL
       )"#,
];

const TEAM_SELECT: &str = r#"SELECT t.id, t.name, t.city, t.championships_won, t.coach,
           t.number_of_players, t.league_id, l.name AS league
       FROM teams t
       LEFT JOIN leagues l ON l.id = t.league_id"#;

const PLAYER_SELECT: &str = r#"SELECT p.id, p.name, p.age, p.position, p.appearances,
           p.team_id, t.name AS team
       FROM players p
       LEFT JOIN teams t ON t.id = p.team_id"#;

pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new().connect_with(options).await
}

/// Creates the tables if they are missing.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Round-trips a trivial query to prove the pool can still reach the database.
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

fn push_window(query: &mut QueryBuilder<'_, Sqlite>, page: Option<PageRequest>) {
    if let Some(page) = page {
        query
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
    }
}

// League queries
pub async fn get_leagues(pool: &SqlitePool, page: Option<PageRequest>) -> Result<Vec<League>, sqlx::Error> {
    let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM leagues ORDER BY id");
    push_window(&mut query, page);

    query.build_query_as::<League>().fetch_all(pool).await
}

pub async fn count_leagues(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM leagues"#)
        .fetch_one(pool)
        .await
}

pub async fn get_league_by_id(pool: &SqlitePool, league_id: i64) -> Result<Option<League>, sqlx::Error> {
    sqlx::query_as::<_, League>(
        r#"SELECT * FROM leagues WHERE id = ?"#
    )
    .bind(league_id)
    .fetch_optional(pool)
    .await
}

pub async fn league_exists(pool: &SqlitePool, league_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS(SELECT 1 FROM leagues WHERE id = ?)"#)
        .bind(league_id)
        .fetch_one(pool)
        .await
}

pub async fn insert_league(pool: &SqlitePool, league: &NewLeague) -> Result<League, sqlx::Error> {
    sqlx::query_as::<_, League>(
        r#"INSERT INTO leagues
               (name, country, number_of_teams, current_champion, most_championships, most_appearances)
           VALUES (?, ?, ?, ?, ?, ?)
           RETURNING *"#
    )
    .bind(&league.name)
    .bind(&league.country)
    .bind(league.number_of_teams)
    .bind(&league.current_champion)
    .bind(&league.most_championships)
    .bind(&league.most_appearances)
    .fetch_one(pool)
    .await
}

pub async fn update_league(pool: &SqlitePool, league_id: i64, league: &NewLeague) -> Result<Option<League>, sqlx::Error> {
    sqlx::query_as::<_, League>(
        r#"UPDATE leagues
           SET name = ?, country = ?, number_of_teams = ?,
               current_champion = ?, most_championships = ?, most_appearances = ?
           WHERE id = ?
           RETURNING *"#
    )
    .bind(&league.name)
    .bind(&league.country)
    .bind(league.number_of_teams)
    .bind(&league.current_champion)
    .bind(&league.most_championships)
    .bind(&league.most_appearances)
    .bind(league_id)
    .fetch_optional(pool)
    .await
}

/// Deletes a league and detaches its teams. Returns false if it did not exist.
pub async fn delete_league(pool: &SqlitePool, league_id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(r#"UPDATE teams SET league_id = NULL WHERE league_id = ?"#)
        .bind(league_id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query(r#"DELETE FROM leagues WHERE id = ?"#)
        .bind(league_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(deleted > 0)
}

/// Follows player -> team -> league for the first player (lowest id) whose
/// name matches case-insensitively. `None` if any hop is missing.
pub async fn get_league_by_player_name(pool: &SqlitePool, player_name: &str) -> Result<Option<League>, sqlx::Error> {
    sqlx::query_as::<_, League>(
        r#"SELECT l.*
           FROM players p
           JOIN teams t ON t.id = p.team_id
           JOIN leagues l ON l.id = t.league_id
           WHERE p.id = (
               SELECT id FROM players
               WHERE name = ? COLLATE NOCASE
               ORDER BY id
               LIMIT 1
           )"#
    )
    .bind(player_name)
    .fetch_optional(pool)
    .await
}

// Team queries
pub async fn get_teams(pool: &SqlitePool, filter: &TeamFilter, page: Option<PageRequest>) -> Result<Vec<Team>, sqlx::Error> {
    let mut query = QueryBuilder::<Sqlite>::new(TEAM_SELECT);
    query.push(" WHERE 1 = 1");
    filter.push_predicates(&mut query);
    query.push(" ORDER BY t.id");
    push_window(&mut query, page);

    query.build_query_as::<Team>().fetch_all(pool).await
}

pub async fn count_teams(pool: &SqlitePool, filter: &TeamFilter) -> Result<i64, sqlx::Error> {
    let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM teams t WHERE 1 = 1");
    filter.push_predicates(&mut query);

    query.build_query_scalar::<i64>().fetch_one(pool).await
}

pub async fn get_team_by_id(pool: &SqlitePool, team_id: i64) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!("{} WHERE t.id = ?", TEAM_SELECT))
        .bind(team_id)
        .fetch_optional(pool)
        .await
}

pub async fn team_exists(pool: &SqlitePool, team_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS(SELECT 1 FROM teams WHERE id = ?)"#)
        .bind(team_id)
        .fetch_one(pool)
        .await
}

pub async fn insert_team(pool: &SqlitePool, team: &NewTeam) -> Result<Team, sqlx::Error> {
    let team_id = sqlx::query(
        r#"INSERT INTO teams
               (name, city, championships_won, coach, number_of_players, league_id)
           VALUES (?, ?, ?, ?, ?, ?)"#
    )
    .bind(&team.name)
    .bind(&team.city)
    .bind(team.championships_won)
    .bind(&team.coach)
    .bind(team.number_of_players)
    .bind(team.league_id)
    .execute(pool)
    .await?
    .last_insert_rowid();

    get_team_by_id(pool, team_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn update_team(pool: &SqlitePool, team_id: i64, team: &NewTeam) -> Result<Option<Team>, sqlx::Error> {
    let updated = sqlx::query(
        r#"UPDATE teams
           SET name = ?, city = ?, championships_won = ?, coach = ?,
               number_of_players = ?, league_id = ?
           WHERE id = ?"#
    )
    .bind(&team.name)
    .bind(&team.city)
    .bind(team.championships_won)
    .bind(&team.coach)
    .bind(team.number_of_players)
    .bind(team.league_id)
    .bind(team_id)
    .execute(pool)
    .await?
    .rows_affected();

    if updated == 0 {
        return Ok(None);
    }
    get_team_by_id(pool, team_id).await
}

/// Deletes a team and detaches its players. Returns false if it did not exist.
pub async fn delete_team(pool: &SqlitePool, team_id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(r#"UPDATE players SET team_id = NULL WHERE team_id = ?"#)
        .bind(team_id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query(r#"DELETE FROM teams WHERE id = ?"#)
        .bind(team_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(deleted > 0)
}

// Player queries
pub async fn get_players(pool: &SqlitePool, page: Option<PageRequest>) -> Result<Vec<Player>, sqlx::Error> {
    let mut query = QueryBuilder::<Sqlite>::new(PLAYER_SELECT);
    query.push(" ORDER BY p.id");
    push_window(&mut query, page);

    query.build_query_as::<Player>().fetch_all(pool).await
}

pub async fn count_players(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM players"#)
        .fetch_one(pool)
        .await
}

pub async fn get_player_by_id(pool: &SqlitePool, player_id: i64) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(&format!("{} WHERE p.id = ?", PLAYER_SELECT))
        .bind(player_id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_player(pool: &SqlitePool, player: &NewPlayer) -> Result<Player, sqlx::Error> {
    let player_id = sqlx::query(
        r#"INSERT INTO players (name, age, position, appearances, team_id)
           VALUES (?, ?, ?, ?, ?)"#
    )
    .bind(&player.name)
    .bind(player.age)
    .bind(&player.position)
    .bind(player.appearances)
    .bind(player.team_id)
    .execute(pool)
    .await?
    .last_insert_rowid();

    get_player_by_id(pool, player_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn update_player(pool: &SqlitePool, player_id: i64, player: &NewPlayer) -> Result<Option<Player>, sqlx::Error> {
    let updated = sqlx::query(
        r#"UPDATE players
           SET name = ?, age = ?, position = ?, appearances = ?, team_id = ?
           WHERE id = ?"#
    )
    .bind(&player.name)
    .bind(player.age)
    .bind(&player.position)
    .bind(player.appearances)
    .bind(player.team_id)
    .bind(player_id)
    .execute(pool)
    .await?
    .rows_affected();

    if updated == 0 {
        return Ok(None);
    }
    get_player_by_id(pool, player_id).await
}

pub async fn delete_player(pool: &SqlitePool, player_id: i64) -> Result<bool, sqlx::Error> {
    let deleted = sqlx::query(r#"DELETE FROM players WHERE id = ?"#)
        .bind(player_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(deleted > 0)
}
