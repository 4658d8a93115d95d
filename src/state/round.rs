use rand::Rng;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::protocol::ChangeEvent;
use crate::store::{RoomExpect, RoomPatch};
use crate::types::{normalize_room_code, RoomPhase};

/// Dice pool bounds: a lone forager still rolls one die, and the budget
/// stops scaling past five players.
const MIN_DICE: usize = 1;
const MAX_DICE: usize = 5;

/// Flat slack added on top of the dice sum.
const LIMIT_OFFSET: i32 = 5;

/// Parameters that open a `picking` phase.
#[derive(Debug, Clone)]
pub struct RoundSetup {
    pub round: u32,
    pub dice: Vec<u8>,
    pub limit: i32,
}

/// Number of dice rolled for a table of `player_count`.
pub fn dice_pool_size(player_count: usize) -> usize {
    player_count.clamp(MIN_DICE, MAX_DICE)
}

/// Roll `count` six-sided dice. Order is preserved; the sequence is shown
/// to players as rolled.
pub fn roll_dice(count: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    (0..count).map(|_| rng.random_range(1..=6)).collect()
}

/// The round's noise budget: dice sum plus a fixed offset. Bigger table,
/// louder forest.
pub fn scare_limit(dice: &[u8]) -> i32 {
    dice.iter().map(|&d| i32::from(d)).sum::<i32>() + LIMIT_OFFSET
}

impl AppState {
    /// Open a new round: roll the dice, derive the scare limit, and move
    /// the room into `picking`. Host only.
    ///
    /// The room write is conditional on the round number observed here,
    /// so two concurrent starts cannot both roll.
    pub async fn start_round(&self, raw_code: &str, player_id: &str) -> AppResult<RoundSetup> {
        let code = normalize_room_code(raw_code);
        let room = self.require_room(&code).await?;
        if room.host_id != player_id {
            return Err(AppError::Unauthorized(
                "only the host can start a round".to_string(),
            ));
        }

        let players = self.store.players_in_room(&code).await?;
        let dice = roll_dice(dice_pool_size(players.len()));
        let limit = scare_limit(&dice);
        let round = room.round + 1;

        let won = self
            .store
            .update_room_if(
                &code,
                RoomExpect {
                    round: Some(room.round),
                    ..Default::default()
                },
                RoomPatch {
                    phase: Some(RoomPhase::Picking),
                    round: Some(round),
                    dice_and_limit: Some((dice.clone(), limit)),
                },
            )
            .await?;
        if !won {
            return Err(AppError::Conflict(
                "round was started concurrently".to_string(),
            ));
        }

        // Stray picks already keyed to the new round number would leak
        // into scoring; the round filter handles everything older.
        self.store.delete_picks(&code, round).await?;

        tracing::info!(
            "room {} round {}: dice {:?}, limit {}",
            code,
            round,
            dice,
            limit
        );
        if let Some(updated) = self.store.room(&code).await? {
            self.emit(ChangeEvent::RoomUpdated { room: updated });
        }

        Ok(RoundSetup { round, dice, limit })
    }
}
