//! Wire types: HTTP request/response bodies and the room change feed.

use serde::{Deserialize, Serialize};

use crate::types::{Choice, Pick, Player, PlayerId, Room, RoomCode, RoomPhase};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_name: String,
    pub player_name: String,
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRoomResponse {
    pub code: RoomCode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    pub player_name: String,
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickRequest {
    pub player_id: PlayerId,
    pub choice: Choice,
}

/// Body for host-only actions (start, reveal).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostActionRequest {
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRoundResponse {
    pub ok: bool,
    pub dice: Vec<u8>,
    pub limit: i32,
    pub round: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealResponse {
    pub ok: bool,
    pub blew_limit: bool,
    pub total_noise: i32,
    pub phase: RoomPhase,
    /// Only the players whose score write succeeded.
    pub players: Vec<PlayerInfo>,
}

/// Player row as shown to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    pub score: i64,
}

impl From<&Player> for PlayerInfo {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            is_host: p.is_host,
            score: p.score,
        }
    }
}

/// One pick as shown to clients. The choice is withheld while the round
/// is still being played; who-has-picked stays visible.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickInfo {
    pub player_id: PlayerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice: Option<Choice>,
    pub created_at: String,
}

impl PickInfo {
    pub fn from_pick(pick: &Pick, revealed: bool) -> Self {
        Self {
            player_id: pick.player_id.clone(),
            choice: revealed.then_some(pick.choice),
            created_at: pick.created_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStateResponse {
    pub room: Room,
    pub players: Vec<PlayerInfo>,
    /// Picks for the current round only.
    pub picks: Vec<PickInfo>,
}

/// Row-level change event pushed to sockets subscribed to a room.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ChangeEvent {
    RoomUpdated {
        room: Room,
    },
    PlayerUpserted {
        player: Player,
    },
    /// A pick landed; the choice stays hidden until reveal.
    PickSubmitted {
        room_code: RoomCode,
        round: u32,
        player_id: PlayerId,
    },
}

impl ChangeEvent {
    /// Room the event belongs to, for per-socket filtering.
    pub fn room_code(&self) -> &str {
        match self {
            ChangeEvent::RoomUpdated { room } => &room.code,
            ChangeEvent::PlayerUpserted { player } => &player.room_code,
            ChangeEvent::PickSubmitted { room_code, .. } => room_code,
        }
    }
}
