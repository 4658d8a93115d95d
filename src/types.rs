use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type RoomCode = String;
pub type PlayerId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomPhase {
    Lobby,
    Picking,
    Reveal,
}

/// A player's foraging target for the round.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Berry,
    Mushroom,
    Deer,
}

impl Choice {
    /// Noise this target adds to the table's total.
    pub fn noise(&self) -> i32 {
        match self {
            Choice::Berry => 1,
            Choice::Mushroom => 2,
            Choice::Deer => 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Normalized code, the primary key. Clients may show the raw `name`.
    pub code: RoomCode,
    pub name: String,
    pub host_id: PlayerId,
    pub phase: RoomPhase,
    /// Monotonic round counter; 0 before the first start.
    pub round: u32,
    /// Dice shown to players, set together with `limit_total` on the
    /// transition into `picking`.
    pub dice: Option<Vec<u8>>,
    pub limit_total: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Client-generated UUID, stable across reconnects.
    pub id: PlayerId,
    pub room_code: RoomCode,
    pub name: String,
    pub is_host: bool,
    pub score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pick {
    pub id: String,
    pub room_code: RoomCode,
    pub round: u32,
    pub player_id: PlayerId,
    pub choice: Choice,
    pub created_at: String,
}

/// Normalize a human-chosen room name into its code: collapse each
/// whitespace run to a single hyphen, strip everything but ASCII
/// alphanumerics and hyphens, uppercase. Idempotent.
pub fn normalize_room_code(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_room_code() {
        assert_eq!(normalize_room_code("  camp fire!! "), "CAMP-FIRE");
        assert_eq!(normalize_room_code("dark scary forest"), "DARK-SCARY-FOREST");
        assert_eq!(normalize_room_code("Tent_7"), "TENT7");
        assert_eq!(normalize_room_code("a   b\tc"), "A-B-C");
        assert_eq!(normalize_room_code("!!!"), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["  camp fire!! ", "Nacht Wald", "already-OK-42"] {
            let once = normalize_room_code(raw);
            assert_eq!(normalize_room_code(&once), once);
        }
    }

    #[test]
    fn test_noise_weights() {
        assert_eq!(Choice::Berry.noise(), 1);
        assert_eq!(Choice::Mushroom.noise(), 2);
        assert_eq!(Choice::Deer.noise(), 3);
    }

    #[test]
    fn test_choice_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Choice::Deer).unwrap(), "\"deer\"");
        assert_eq!(
            serde_json::from_str::<Choice>("\"mushroom\"").unwrap(),
            Choice::Mushroom
        );
        assert_eq!(
            serde_json::to_string(&RoomPhase::Picking).unwrap(),
            "\"picking\""
        );
    }
}
