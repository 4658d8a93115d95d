//! In-memory `Store` backed by `RwLock`ed tables.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RoomExpect, RoomPatch, Store, StoreError, StoreResult};
use crate::types::{Pick, Player, Room};

/// Composite pick key: (room_code, round, player_id)
type PickKey = (String, u32, String);

#[derive(Default)]
pub struct MemStore {
    rooms: RwLock<HashMap<String, Room>>,
    players: RwLock<HashMap<String, Player>>,
    picks: RwLock<HashMap<PickKey, Pick>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn upsert_room(&self, room: Room) -> StoreResult<()> {
        self.rooms.write().await.insert(room.code.clone(), room);
        Ok(())
    }

    async fn room(&self, code: &str) -> StoreResult<Option<Room>> {
        Ok(self.rooms.read().await.get(code).cloned())
    }

    async fn update_room_if(
        &self,
        code: &str,
        expect: RoomExpect,
        patch: RoomPatch,
    ) -> StoreResult<bool> {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(code) else {
            return Ok(false);
        };
        if expect.phase.is_some_and(|p| p != room.phase) {
            return Ok(false);
        }
        if expect.round.is_some_and(|r| r != room.round) {
            return Ok(false);
        }

        if let Some(phase) = patch.phase {
            room.phase = phase;
        }
        if let Some(round) = patch.round {
            room.round = round;
        }
        if let Some((dice, limit)) = patch.dice_and_limit {
            room.dice = Some(dice);
            room.limit_total = Some(limit);
        }
        Ok(true)
    }

    async fn upsert_player(
        &self,
        id: &str,
        room_code: &str,
        name: &str,
        is_host: bool,
    ) -> StoreResult<Player> {
        let mut players = self.players.write().await;
        let player = players
            .entry(id.to_string())
            .and_modify(|p| {
                p.room_code = room_code.to_string();
                p.name = name.to_string();
                p.is_host = is_host;
            })
            .or_insert_with(|| Player {
                id: id.to_string(),
                room_code: room_code.to_string(),
                name: name.to_string(),
                is_host,
                score: 0,
            });
        Ok(player.clone())
    }

    async fn players_in_room(&self, code: &str) -> StoreResult<Vec<Player>> {
        let players = self.players.read().await;
        let mut in_room: Vec<Player> = players
            .values()
            .filter(|p| p.room_code == code)
            .cloned()
            .collect();
        // Stable order for responses; HashMap iteration is arbitrary.
        in_room.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(in_room)
    }

    async fn update_player_score(&self, id: &str, score: i64) -> StoreResult<()> {
        let mut players = self.players.write().await;
        let player = players
            .get_mut(id)
            .ok_or_else(|| StoreError::Rejected(format!("no player row {id}")))?;
        player.score = score;
        Ok(())
    }

    async fn upsert_pick(&self, pick: Pick) -> StoreResult<()> {
        let key = (
            pick.room_code.clone(),
            pick.round,
            pick.player_id.clone(),
        );
        self.picks.write().await.insert(key, pick);
        Ok(())
    }

    async fn picks_for_round(&self, code: &str, round: u32) -> StoreResult<Vec<Pick>> {
        let picks = self.picks.read().await;
        let mut for_round: Vec<Pick> = picks
            .iter()
            .filter(|((room, r, _), _)| room == code && *r == round)
            .map(|(_, pick)| pick.clone())
            .collect();
        for_round.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(for_round)
    }

    async fn delete_picks(&self, code: &str, round: u32) -> StoreResult<()> {
        self.picks
            .write()
            .await
            .retain(|(room, r, _), _| !(room == code && *r == round));
        Ok(())
    }
}
