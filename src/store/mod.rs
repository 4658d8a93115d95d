//! Row-store seam.
//!
//! The game core needs exactly three things from its backing store: read
//! rows matching a filter, upsert a row on a declared unique key, and
//! delete rows matching a filter — plus a conditional room update used to
//! serialize round transitions. `Store` captures that contract so the
//! default in-memory tables can be swapped for a hosted row store without
//! touching the game logic.

mod mem;

pub use mem::MemStore;

use async_trait::async_trait;

use crate::types::{Pick, Player, Room, RoomPhase};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Expected row values for a conditional room update; `None` matches any.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomExpect {
    pub phase: Option<RoomPhase>,
    pub round: Option<u32>,
}

/// Columns written by a conditional room update; `None` leaves the column
/// untouched. Dice and limit are only ever written as a pair.
#[derive(Debug, Clone, Default)]
pub struct RoomPatch {
    pub phase: Option<RoomPhase>,
    pub round: Option<u32>,
    pub dice_and_limit: Option<(Vec<u8>, i32)>,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Insert or fully replace a room row, keyed on `code`.
    async fn upsert_room(&self, room: Room) -> StoreResult<()>;

    async fn room(&self, code: &str) -> StoreResult<Option<Room>>;

    /// Conditional update with compare-and-swap semantics. Returns
    /// `Ok(false)` when no row matched `code` plus the expectations, in
    /// which case nothing was written.
    async fn update_room_if(
        &self,
        code: &str,
        expect: RoomExpect,
        patch: RoomPatch,
    ) -> StoreResult<bool>;

    /// Insert or update a player row, keyed on `id`. An insert starts the
    /// score at zero; an update never touches the score column.
    async fn upsert_player(
        &self,
        id: &str,
        room_code: &str,
        name: &str,
        is_host: bool,
    ) -> StoreResult<Player>;

    async fn players_in_room(&self, code: &str) -> StoreResult<Vec<Player>>;

    async fn update_player_score(&self, id: &str, score: i64) -> StoreResult<()>;

    /// Insert or replace a pick, keyed on (room_code, round, player_id).
    async fn upsert_pick(&self, pick: Pick) -> StoreResult<()>;

    async fn picks_for_round(&self, code: &str, round: u32) -> StoreResult<Vec<Pick>>;

    async fn delete_picks(&self, code: &str, round: u32) -> StoreResult<()>;
}
