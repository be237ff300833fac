//! Faction types and the race classifier for Warbanner.
//!
//! Every participant in a lobby belongs to exactly one of two opposing
//! factions. The faction is never chosen directly — it is derived from the
//! character's race by [`FactionTable::classify`], and fixed for the
//! lifetime of the lobby once derived.
//!
//! The race sets are injected as configuration rather than hard-coded in
//! the classification logic, so a deployment can extend them without
//! touching this crate's matching code. [`FactionTable::default`] carries
//! the ten classic races.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Races that classify as Alliance in the default table.
const ALLIANCE_RACES: &[&str] = &["HUMAN", "DWARF", "NIGHTELF", "GNOME", "DRAENEI"];

/// Races that classify as Horde in the default table.
const HORDE_RACES: &[&str] = &["ORC", "UNDEAD", "TAUREN", "TROLL", "BLOODELF"];

// ---------------------------------------------------------------------------
// Faction
// ---------------------------------------------------------------------------

/// One of the two opposing sides a participant is classified into.
///
/// Serializes as `"Alliance"` / `"Horde"` — these exact strings are part
/// of the wire contract, both in requests (the `faction` field) and in
/// status responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Alliance,
    Horde,
}

impl Faction {
    /// Returns the opposing faction.
    pub fn opponent(self) -> Self {
        match self {
            Self::Alliance => Self::Horde,
            Self::Horde => Self::Alliance,
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alliance => write!(f, "Alliance"),
            Self::Horde => write!(f, "Horde"),
        }
    }
}

/// Parses the exact wire strings `"Alliance"` and `"Horde"`.
///
/// This is intentionally strict — requests carry the faction as a string,
/// and anything else must be rejected before it reaches the lobby registry.
impl FromStr for Faction {
    type Err = FactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Alliance" => Ok(Self::Alliance),
            "Horde" => Ok(Self::Horde),
            other => Err(FactionError::UnknownFaction(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from faction classification and parsing.
#[derive(Debug, thiserror::Error)]
pub enum FactionError {
    /// The race identifier is in neither faction's set.
    /// The caller must not create or join a lobby with an unclassified
    /// faction — this is a hard error, not a default.
    #[error("unknown race: {0}")]
    UnrecognizedRace(String),

    /// A `faction` wire field that is neither `"Alliance"` nor `"Horde"`.
    #[error("unknown faction: {0}")]
    UnknownFaction(String),
}

// ---------------------------------------------------------------------------
// FactionTable
// ---------------------------------------------------------------------------

/// Two disjoint, immutable sets of known race identifiers.
///
/// Race identifiers are normalized before lookup: upper-cased, with
/// whitespace and underscores stripped. `"night elf"`, `"NIGHT_ELF"`, and
/// `"NightElf"` all classify identically.
#[derive(Debug, Clone)]
pub struct FactionTable {
    alliance: HashSet<String>,
    horde: HashSet<String>,
}

impl FactionTable {
    /// Builds a table from two race sets. Inputs are normalized, so the
    /// caller can supply them in any spelling.
    pub fn new<I, J, S>(alliance: I, horde: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            alliance: alliance
                .into_iter()
                .map(|r| normalize(r.as_ref()))
                .collect(),
            horde: horde.into_iter().map(|r| normalize(r.as_ref())).collect(),
        }
    }

    /// Maps a race identifier to its faction.
    ///
    /// Pure and side-effect free. Unrecognized input returns
    /// [`FactionError::UnrecognizedRace`].
    pub fn classify(&self, race: &str) -> Result<Faction, FactionError> {
        let key = normalize(race);
        if self.alliance.contains(&key) {
            Ok(Faction::Alliance)
        } else if self.horde.contains(&key) {
            Ok(Faction::Horde)
        } else {
            Err(FactionError::UnrecognizedRace(race.to_string()))
        }
    }
}

impl Default for FactionTable {
    fn default() -> Self {
        Self::new(ALLIANCE_RACES.iter(), HORDE_RACES.iter())
    }
}

/// Upper-cases and strips whitespace and underscores.
fn normalize(race: &str) -> String {
    race.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_uppercase)
        .collect()
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_all_alliance_races_return_alliance() {
        let table = FactionTable::default();
        for race in ALLIANCE_RACES {
            assert_eq!(
                table.classify(race).unwrap(),
                Faction::Alliance,
                "{race} should be Alliance"
            );
        }
    }

    #[test]
    fn test_classify_all_horde_races_return_horde() {
        let table = FactionTable::default();
        for race in HORDE_RACES {
            assert_eq!(
                table.classify(race).unwrap(),
                Faction::Horde,
                "{race} should be Horde"
            );
        }
    }

    #[test]
    fn test_classify_is_case_and_separator_insensitive() {
        // All spellings of the same race must classify identically.
        let table = FactionTable::default();
        for spelling in ["night elf", "NIGHT_ELF", "NightElf", "nightelf", " Night_Elf "] {
            assert_eq!(
                table.classify(spelling).unwrap(),
                Faction::Alliance,
                "{spelling:?} should classify as Alliance"
            );
        }
    }

    #[test]
    fn test_classify_unknown_race_returns_error() {
        let table = FactionTable::default();
        let result = table.classify("pandaren");
        assert!(
            matches!(result, Err(FactionError::UnrecognizedRace(r)) if r == "pandaren"),
            "unknown race must be a hard error"
        );
    }

    #[test]
    fn test_classify_empty_string_returns_error() {
        let table = FactionTable::default();
        assert!(matches!(
            table.classify(""),
            Err(FactionError::UnrecognizedRace(_))
        ));
    }

    #[test]
    fn test_custom_table_overrides_defaults() {
        // The sets are configuration — a table with extra races classifies
        // them without any change to the matching logic.
        let table = FactionTable::new(["worgen"], ["goblin"]);
        assert_eq!(table.classify("Worgen").unwrap(), Faction::Alliance);
        assert_eq!(table.classify("GOBLIN").unwrap(), Faction::Horde);
        assert!(table.classify("human").is_err());
    }

    #[test]
    fn test_faction_from_str_accepts_exact_wire_strings() {
        assert_eq!("Alliance".parse::<Faction>().unwrap(), Faction::Alliance);
        assert_eq!("Horde".parse::<Faction>().unwrap(), Faction::Horde);
    }

    #[test]
    fn test_faction_from_str_rejects_other_spellings() {
        // The wire contract is exact — no case folding on the faction field.
        for bad in ["alliance", "HORDE", "Neutral", ""] {
            assert!(
                matches!(bad.parse::<Faction>(), Err(FactionError::UnknownFaction(_))),
                "{bad:?} must not parse"
            );
        }
    }

    #[test]
    fn test_faction_serializes_as_wire_string() {
        assert_eq!(
            serde_json::to_string(&Faction::Alliance).unwrap(),
            "\"Alliance\""
        );
        assert_eq!(serde_json::to_string(&Faction::Horde).unwrap(), "\"Horde\"");
    }

    #[test]
    fn test_faction_opponent() {
        assert_eq!(Faction::Alliance.opponent(), Faction::Horde);
        assert_eq!(Faction::Horde.opponent(), Faction::Alliance);
    }
}
