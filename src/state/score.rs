//! Reveal scoring.
//!
//! Scoring is a pure function of one round's picks and the room's noise
//! limit; `reveal_round` wraps it with the phase transition and the
//! per-player score writes.

use std::collections::HashMap;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::protocol::{ChangeEvent, PlayerInfo};
use crate::store::{RoomExpect, RoomPatch};
use crate::types::{normalize_room_code, Choice, Pick, PlayerId, RoomPhase};

/// Outcome of scoring one round's picks against the noise limit.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub blew_limit: bool,
    pub total_noise: i32,
    /// Score delta per player who submitted a pick. Players without a
    /// pick are skipped entirely and do not appear.
    pub deltas: HashMap<PlayerId, i32>,
}

/// Score a round.
///
/// Total noise is the weighted sum over all submitted picks; the table
/// blows the limit only when a limit is configured and noise strictly
/// exceeds it. All deer pickers share one fate per round, decided by the
/// deer count alone: a lone hunter takes the full prize, while rivals
/// spook the herd and lose points even on a quiet night.
pub fn score_round(picks: &[Pick], limit: Option<i32>) -> RoundOutcome {
    let deer_count = picks.iter().filter(|p| p.choice == Choice::Deer).count();
    let total_noise: i32 = picks.iter().map(|p| p.choice.noise()).sum();
    let blew_limit = limit.is_some_and(|l| total_noise > l);

    let mut deltas = HashMap::with_capacity(picks.len());
    for pick in picks {
        let delta = match (blew_limit, pick.choice) {
            (false, Choice::Berry) => 1,
            (false, Choice::Mushroom) => 2,
            (false, Choice::Deer) if deer_count <= 1 => 3,
            (false, Choice::Deer) => -1,
            (true, Choice::Berry) => 0,
            (true, Choice::Mushroom) => -1,
            (true, Choice::Deer) if deer_count <= 1 => -2,
            (true, Choice::Deer) => -3,
        };
        deltas.insert(pick.player_id.clone(), delta);
    }

    RoundOutcome {
        blew_limit,
        total_noise,
        deltas,
    }
}

/// What the reveal returns for display.
#[derive(Debug, Clone)]
pub struct RevealSummary {
    pub blew_limit: bool,
    pub total_noise: i32,
    /// Only the players whose score write succeeded.
    pub players: Vec<PlayerInfo>,
}

impl AppState {
    /// Close the picking phase and apply the round's scores. Host only.
    ///
    /// The `picking -> reveal` flip is a conditional update on the phase
    /// and round and happens before any score write, so a repeated or
    /// concurrent reveal loses the swap and re-applies nothing.
    pub async fn reveal_round(&self, raw_code: &str, player_id: &str) -> AppResult<RevealSummary> {
        let code = normalize_room_code(raw_code);
        let room = self.require_room(&code).await?;
        if room.host_id != player_id {
            return Err(AppError::Unauthorized(
                "only the host can reveal".to_string(),
            ));
        }
        if room.phase != RoomPhase::Picking {
            return Err(AppError::PhaseConflict(
                "room has no round in progress".to_string(),
            ));
        }

        let won = self
            .store
            .update_room_if(
                &code,
                RoomExpect {
                    phase: Some(RoomPhase::Picking),
                    round: Some(room.round),
                },
                RoomPatch {
                    phase: Some(RoomPhase::Reveal),
                    ..Default::default()
                },
            )
            .await?;
        if !won {
            return Err(AppError::Conflict(
                "round was already revealed".to_string(),
            ));
        }

        let picks = self.store.picks_for_round(&code, room.round).await?;
        let players = self.store.players_in_room(&code).await?;
        let outcome = score_round(&picks, room.limit_total);

        let mut updated = Vec::new();
        for player in players {
            let Some(delta) = outcome.deltas.get(&player.id) else {
                continue; // never picked this round
            };
            let score = player.score + i64::from(*delta);
            // One failed write must not sink the rest of the table.
            match self.store.update_player_score(&player.id, score).await {
                Ok(()) => {
                    let player = crate::types::Player { score, ..player };
                    self.emit(ChangeEvent::PlayerUpserted {
                        player: player.clone(),
                    });
                    updated.push(PlayerInfo::from(&player));
                }
                Err(e) => {
                    tracing::error!("score update failed for player {}: {}", player.id, e);
                }
            }
        }

        tracing::info!(
            "room {} round {} revealed: noise {} vs limit {:?}, blown {}",
            code,
            room.round,
            outcome.total_noise,
            room.limit_total,
            outcome.blew_limit
        );
        if let Some(updated_room) = self.store.room(&code).await? {
            self.emit(ChangeEvent::RoomUpdated { room: updated_room });
        }

        Ok(RevealSummary {
            blew_limit: outcome.blew_limit,
            total_noise: outcome.total_noise,
            players: updated,
        })
    }
}
