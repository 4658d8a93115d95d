use super::AppState;
use crate::error::{AppError, AppResult};
use crate::protocol::{ChangeEvent, PickInfo, PlayerInfo, RoomStateResponse};
use crate::types::{normalize_room_code, Player, Room, RoomPhase};

impl AppState {
    /// Create (or re-claim) a room and seat the caller as its host.
    pub async fn create_room(
        &self,
        room_name: &str,
        player_name: &str,
        player_id: &str,
    ) -> AppResult<Room> {
        let room_name = room_name.trim();
        let player_name = player_name.trim();
        if room_name.is_empty() || player_name.is_empty() || player_id.is_empty() {
            return Err(AppError::Validation(
                "roomName, playerName and playerId are required".to_string(),
            ));
        }

        let code = normalize_room_code(room_name);
        if code.is_empty() {
            return Err(AppError::Validation(format!(
                "room name {room_name:?} has no usable characters"
            )));
        }

        let room = Room {
            code: code.clone(),
            name: room_name.to_string(),
            host_id: player_id.to_string(),
            phase: RoomPhase::Lobby,
            round: 0,
            dice: None,
            limit_total: None,
        };
        self.store.upsert_room(room.clone()).await?;
        let host = self
            .store
            .upsert_player(player_id, &code, player_name, true)
            .await?;

        tracing::info!("room {} created by {}", code, player_id);
        self.emit(ChangeEvent::RoomUpdated { room: room.clone() });
        self.emit(ChangeEvent::PlayerUpserted { player: host });

        Ok(room)
    }

    /// Join an existing room. Rejoining with a known id updates the name
    /// and leaves the score alone.
    pub async fn join_room(
        &self,
        raw_code: &str,
        player_name: &str,
        player_id: &str,
    ) -> AppResult<Player> {
        let player_name = player_name.trim();
        if player_name.is_empty() || player_id.is_empty() {
            return Err(AppError::Validation(
                "playerName and playerId are required".to_string(),
            ));
        }

        let code = normalize_room_code(raw_code);
        let room = self.require_room(&code).await?;

        let is_host = room.host_id == player_id;
        let player = self
            .store
            .upsert_player(player_id, &code, player_name, is_host)
            .await?;

        tracing::debug!("player {} joined room {}", player_id, code);
        self.emit(ChangeEvent::PlayerUpserted {
            player: player.clone(),
        });

        Ok(player)
    }

    /// Snapshot of a room for clients: the room row, its players, and the
    /// current round's picks. Choices are withheld until reveal.
    pub async fn room_state(&self, raw_code: &str) -> AppResult<RoomStateResponse> {
        let code = normalize_room_code(raw_code);
        let room = self.require_room(&code).await?;
        let players = self.store.players_in_room(&code).await?;
        let picks = self.store.picks_for_round(&code, room.round).await?;

        let revealed = room.phase == RoomPhase::Reveal;
        Ok(RoomStateResponse {
            players: players.iter().map(PlayerInfo::from).collect(),
            picks: picks
                .iter()
                .map(|p| PickInfo::from_pick(p, revealed))
                .collect(),
            room,
        })
    }
}
