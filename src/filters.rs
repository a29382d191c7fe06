use sqlx::{QueryBuilder, Sqlite};
use std::collections::HashMap;

/// Filters accepted by `GET /teams/`. Every present value narrows the
/// result (AND); unknown query parameters never reach this type.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TeamFilter {
    pub name: Option<String>,
    pub city: Option<String>,
    pub coach: Option<String>,
    pub championships_won: Option<i64>,
    pub number_of_players: Option<i64>,
}

impl TeamFilter {
    /// Empty values are skipped. Integer filters that do not parse are
    /// dropped on their own; the other filters still apply.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        TeamFilter {
            name: text_param(params, "name"),
            city: text_param(params, "city"),
            coach: text_param(params, "coach"),
            championships_won: integer_param(params, "championships_won"),
            number_of_players: integer_param(params, "number_of_players"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TeamFilter::default()
    }

    /// Appends ` AND ...` predicates against the `t` (teams) alias.
    pub fn push_predicates(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        // case-insensitive exact match
        for (column, value) in [
            ("t.name", &self.name),
            ("t.city", &self.city),
            ("t.coach", &self.coach),
        ] {
            if let Some(value) = value {
                query
                    .push(format!(" AND {} = ", column))
                    .push_bind(value.clone())
                    .push(" COLLATE NOCASE");
            }
        }

        for (column, value) in [
            ("t.championships_won", self.championships_won),
            ("t.number_of_players", self.number_of_players),
        ] {
            if let Some(value) = value {
                query.push(format!(" AND {} = ", column)).push_bind(value);
            }
        }
    }
}

fn text_param(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params.get(key).filter(|v| !v.is_empty()).cloned()
}

fn integer_param(params: &HashMap<String, String>, key: &str) -> Option<i64> {
    let raw = params.get(key).filter(|v| !v.trim().is_empty())?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!("Ignoring malformed {} filter: {:?}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_reads_known_parameters() {
        let filter = TeamFilter::from_params(&params(&[
            ("name", "equipa"),
            ("city", "Porto"),
            ("championships_won", "27"),
            ("page", "2"),
        ]));

        assert_eq!(filter.name.as_deref(), Some("equipa"));
        assert_eq!(filter.city.as_deref(), Some("Porto"));
        assert_eq!(filter.championships_won, Some(27));
        assert_eq!(filter.coach, None);
        assert_eq!(filter.number_of_players, None);
    }

    #[test]
    fn test_malformed_integer_is_ignored() {
        let filter = TeamFilter::from_params(&params(&[
            ("number_of_players", "many"),
            ("coach", "Treinador"),
        ]));

        assert_eq!(filter.number_of_players, None);
        assert_eq!(filter.coach.as_deref(), Some("Treinador"));
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let filter = TeamFilter::from_params(&params(&[("name", ""), ("championships_won", "")]));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_predicates_sql() {
        let filter = TeamFilter {
            name: Some("equipa".into()),
            number_of_players: Some(11),
            ..TeamFilter::default()
        };

        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM teams t WHERE 1 = 1");
        filter.push_predicates(&mut query);

        assert_eq!(
            query.sql(),
            "SELECT * FROM teams t WHERE 1 = 1 AND t.name = ? COLLATE NOCASE AND t.number_of_players = ?"
        );
    }
}
