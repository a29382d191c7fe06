//! Request-body validation.
//!
//! Bodies arrive as untyped JSON. A [`Form`] first coerces each known field
//! into the typed record (presence, null, blank and type checks); the
//! record's `#[validate]` constraints then run on the result. Every violation
//! ends up in one [`FieldErrors`] map instead of stopping at the first one.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{NewLeague, NewPlayer, NewTeam};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const NOT_STRING: &str = "Not a valid string.";
pub const NOT_INTEGER: &str = "This field must be an integer.";

/// Field name -> human readable violations.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Takes over the fields of `other` that have no errors here yet.
    pub fn merge_missing(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_insert(messages);
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::default();
        for (field, violations) in errors.field_errors() {
            for violation in violations.iter() {
                fields.add(field.as_ref(), describe(violation));
            }
        }
        fields
    }
}

fn describe(violation: &ValidationError) -> String {
    if let Some(message) = &violation.message {
        return message.to_string();
    }

    // bounds may be stored as floats depending on the field type
    let param = |name: &str| {
        violation
            .params
            .get(name)
            .and_then(Value::as_f64)
            .map(|n| n as i64)
    };

    match violation.code.as_ref() {
        "range" => match (param("value"), param("max"), param("min")) {
            (Some(value), Some(max), _) if value > max => {
                format!("Ensure this value is less than or equal to {}.", max)
            }
            (_, _, Some(min)) => format!("Ensure this value is greater than or equal to {}.", min),
            _ => "Value out of range.".to_string(),
        },
        code => format!("Invalid value ({}).", code),
    }
}

/// Outcome of validating a body: the record as far as it could be filled,
/// plus every violation found. Callers may add further errors (unknown keys)
/// before turning it into a result.
#[derive(Debug)]
pub struct Validated<T> {
    pub record: T,
    pub errors: FieldErrors,
}

impl<T: Validate> Validated<T> {
    fn check(record: T, mut errors: FieldErrors) -> Self {
        if let Err(violations) = record.validate() {
            errors.merge_missing(violations.into());
        }
        Validated { record, errors }
    }
}

impl<T> Validated<T> {
    pub fn into_result(self) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(self.record)
        } else {
            Err(self.errors)
        }
    }
}

/// Walks a JSON object, writing coerced values into their targets.
///
/// In partial mode a missing field is simply left alone; otherwise missing
/// required fields are reported.
pub struct Form<'a> {
    body: &'a Map<String, Value>,
    partial: bool,
    errors: FieldErrors,
}

impl<'a> Form<'a> {
    pub fn new(body: &'a Value, partial: bool) -> Result<Self, FieldErrors> {
        match body {
            Value::Object(map) => Ok(Self {
                body: map,
                partial,
                errors: FieldErrors::default(),
            }),
            other => Err(FieldErrors::single(
                "non_field_errors",
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_kind(other)
                ),
            )),
        }
    }

    fn field(&self, field: &str) -> Option<&'a Value> {
        let body: &'a Map<String, Value> = self.body;
        body.get(field)
    }

    fn required(&mut self, field: &str) -> Option<&'a Value> {
        let value = self.field(field);
        if value.is_none() && !self.partial {
            self.errors.add(field, REQUIRED);
        }
        value
    }

    pub fn text(&mut self, field: &str, target: &mut String) {
        let Some(value) = self.required(field) else {
            return;
        };

        match parse_text(value) {
            Ok(Some(text)) => *target = text,
            Ok(None) => self.errors.add(field, NOT_NULL),
            Err(message) => self.errors.add(field, message),
        }
    }

    pub fn optional_text(&mut self, field: &str, target: &mut Option<String>) {
        let Some(value) = self.field(field) else {
            return;
        };

        match parse_text(value) {
            Ok(text) => *target = text,
            Err(message) => self.errors.add(field, message),
        }
    }

    pub fn integer(&mut self, field: &str, target: &mut i64) {
        let Some(value) = self.required(field) else {
            return;
        };

        match parse_integer(value) {
            Ok(number) => *target = number,
            Err(message) => self.errors.add(field, message),
        }
    }

    /// Nullable primary-key reference. Existence is checked by the caller.
    pub fn reference(&mut self, field: &str, target: &mut Option<i64>) {
        let Some(value) = self.field(field) else {
            return;
        };

        match parse_reference(value) {
            Ok(key) => *target = key,
            Err(message) => self.errors.add(field, message),
        }
    }

    pub fn finish(self) -> FieldErrors {
        self.errors
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// `Ok(None)` means an explicit null.
fn parse_text(value: &Value) -> Result<Option<String>, &'static str> {
    let text = match value {
        Value::Null => return Ok(None),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(NOT_STRING),
    };

    if text.is_empty() {
        return Err(NOT_BLANK);
    }

    Ok(Some(text))
}

fn parse_integer(value: &Value) -> Result<i64, &'static str> {
    let number = match value {
        Value::Null => return Err(NOT_NULL),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 1e15)
                .map(|f| f as i64),
        },
        Value::String(s) => integer_from_str(s),
        _ => None,
    };

    number.ok_or(NOT_INTEGER)
}

/// Accepts "27", " 27 " and "27.0"; the fractional part must be all zeros.
fn integer_from_str(raw: &str) -> Option<i64> {
    let re = regex::Regex::new(r"^\s*([+-]?\d+)(?:\.0*)?\s*$").ok()?;
    let caps = re.captures(raw)?;
    caps.get(1)?.as_str().parse().ok()
}

fn parse_reference(value: &Value) -> Result<Option<i64>, String> {
    let key = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    key.map(Some).ok_or_else(|| {
        format!(
            "Incorrect type. Expected pk value, received {}.",
            json_kind(value)
        )
    })
}

pub fn validate_league(body: &Value, base: NewLeague, partial: bool) -> Validated<NewLeague> {
    let mut league = base;
    let mut form = match Form::new(body, partial) {
        Ok(form) => form,
        Err(errors) => return Validated { record: league, errors },
    };

    form.text("name", &mut league.name);
    form.text("country", &mut league.country);
    form.integer("number_of_teams", &mut league.number_of_teams);
    form.optional_text("current_champion", &mut league.current_champion);
    form.optional_text("most_championships", &mut league.most_championships);
    form.optional_text("most_appearances", &mut league.most_appearances);

    let errors = form.finish();
    Validated::check(league, errors)
}

pub fn validate_team(body: &Value, base: NewTeam, partial: bool) -> Validated<NewTeam> {
    let mut team = base;
    let mut form = match Form::new(body, partial) {
        Ok(form) => form,
        Err(errors) => return Validated { record: team, errors },
    };

    form.text("name", &mut team.name);
    form.text("city", &mut team.city);
    form.integer("championships_won", &mut team.championships_won);
    form.text("coach", &mut team.coach);
    form.integer("number_of_players", &mut team.number_of_players);
    form.reference("league_id", &mut team.league_id);

    let errors = form.finish();
    Validated::check(team, errors)
}

pub fn validate_player(body: &Value, base: NewPlayer, partial: bool) -> Validated<NewPlayer> {
    let mut player = base;
    let mut form = match Form::new(body, partial) {
        Ok(form) => form,
        Err(errors) => return Validated { record: player, errors },
    };

    form.text("name", &mut player.name);
    form.integer("age", &mut player.age);
    form.text("position", &mut player.position);
    form.integer("appearances", &mut player.appearances);
    form.reference("team_id", &mut player.team_id);

    let errors = form.finish();
    Validated::check(player, errors)
}
