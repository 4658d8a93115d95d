use super::AppState;
use crate::error::{AppError, AppResult};
use crate::protocol::ChangeEvent;
use crate::types::{normalize_room_code, Choice, Pick, RoomPhase};

impl AppState {
    /// Record a player's hidden choice for the active round. A later pick
    /// for the same (room, round, player) overwrites the earlier one.
    pub async fn submit_pick(
        &self,
        raw_code: &str,
        player_id: &str,
        choice: Choice,
    ) -> AppResult<Pick> {
        if player_id.is_empty() {
            return Err(AppError::Validation("playerId is required".to_string()));
        }

        let code = normalize_room_code(raw_code);
        let room = self.require_room(&code).await?;
        if room.phase != RoomPhase::Picking {
            return Err(AppError::PhaseConflict(
                "room is not accepting picks".to_string(),
            ));
        }

        let pick = Pick {
            id: uuid::Uuid::new_v4().to_string(),
            room_code: code.clone(),
            round: room.round,
            player_id: player_id.to_string(),
            choice,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.store.upsert_pick(pick.clone()).await?;

        tracing::debug!("pick stored for {} in room {} round {}", player_id, code, room.round);
        // The choice stays hidden until reveal; the event only says who.
        self.emit(ChangeEvent::PickSubmitted {
            room_code: code,
            round: room.round,
            player_id: pick.player_id.clone(),
        });

        Ok(pick)
    }
}
