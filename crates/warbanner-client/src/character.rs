//! Character import parsing.
//!
//! The character payload is opaque to the server; the client is the one
//! that reads it, extracts the name and race, and classifies the faction
//! before any request goes out. Two shapes are accepted, matching what
//! exporters actually produce: a wrapped `{"character": {name, race}}`
//! and a flat `{name, race}`.

use serde_json::Value;
use warbanner_faction::{Faction, FactionTable};

use crate::ClientError;

/// A parsed character export: the fields the lobby protocol needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterImport {
    pub name: String,
    pub race: String,
    pub faction: Faction,
}

/// Parses a raw character blob and classifies its race.
///
/// Malformed JSON, a missing or blank `name` or `race`, and an
/// unrecognized race are all hard errors surfaced before any request is
/// made.
pub fn parse_character(raw: &str, table: &FactionTable) -> Result<CharacterImport, ClientError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ClientError::Character(e.to_string()))?;

    // Wrapped form first, then flat.
    let body = value.get("character").unwrap_or(&value);

    let name = string_field(body, "name")?;
    let race = string_field(body, "race")?;
    let faction = table
        .classify(&race)
        .map_err(|e| ClientError::Character(e.to_string()))?;

    Ok(CharacterImport {
        name,
        race,
        faction,
    })
}

fn string_field(body: &Value, key: &str) -> Result<String, ClientError> {
    match body.get(key).and_then(Value::as_str).map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ClientError::Character(format!(
            "missing or empty field: {key}"
        ))),
    }
}

// =========================================================================
// Tests
// =========================================================================
