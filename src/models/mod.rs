use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Integer columns hold signed 32-bit values.
pub const INT_MIN: i64 = i32::MIN as i64;
pub const INT_MAX: i64 = i32::MAX as i64;

/// League row as stored and as sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct League {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub number_of_teams: i64,
    pub current_champion: Option<String>,
    pub most_championships: Option<String>,
    pub most_appearances: Option<String>,
}

/// Team row joined with its league's name.
///
/// `league` is the display string of the referenced league; the key itself
/// is not part of the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub championships_won: i64,
    pub coach: String,
    pub number_of_players: i64,
    pub league: Option<String>,
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub league_id: Option<i64>,
}

/// Player row joined with its team's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub position: String,
    pub appearances: i64,
    pub team: Option<String>,
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub team_id: Option<i64>,
}

// Writable columns, filled from the request body and checked against the
// column constraints before inserts/updates.

#[derive(Debug, Clone, Default, PartialEq, Validate, ToSchema)]
pub struct NewLeague {
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub name: String,
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub country: String,
    #[validate(range(min = INT_MIN, max = INT_MAX))]
    pub number_of_teams: i64,
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub current_champion: Option<String>,
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub most_championships: Option<String>,
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub most_appearances: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate, ToSchema)]
pub struct NewTeam {
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub name: String,
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub city: String,
    #[validate(range(min = INT_MIN, max = INT_MAX))]
    pub championships_won: i64,
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub coach: String,
    #[validate(range(min = INT_MIN, max = INT_MAX))]
    pub number_of_players: i64,
    /// Key of the league the team plays in.
    pub league_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate, ToSchema)]
pub struct NewPlayer {
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub name: String,
    #[validate(range(min = INT_MIN, max = INT_MAX))]
    pub age: i64,
    #[validate(length(max = 30, message = "Ensure this field has no more than 30 characters."))]
    pub position: String,
    #[validate(range(min = INT_MIN, max = INT_MAX))]
    pub appearances: i64,
    /// Key of the player's team.
    pub team_id: Option<i64>,
}

impl From<League> for NewLeague {
    fn from(league: League) -> Self {
        NewLeague {
            name: league.name,
            country: league.country,
            number_of_teams: league.number_of_teams,
            current_champion: league.current_champion,
            most_championships: league.most_championships,
            most_appearances: league.most_appearances,
        }
    }
}

impl From<Team> for NewTeam {
    fn from(team: Team) -> Self {
        NewTeam {
            name: team.name,
            city: team.city,
            championships_won: team.championships_won,
            coach: team.coach,
            number_of_players: team.number_of_players,
            league_id: team.league_id,
        }
    }
}

impl From<Player> for NewPlayer {
    fn from(player: Player) -> Self {
        NewPlayer {
            name: player.name,
            age: player.age,
            position: player.position,
            appearances: player.appearances,
            team_id: player.team_id,
        }
    }
}
