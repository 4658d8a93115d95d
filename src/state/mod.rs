mod pick;
mod room;
mod round;
mod score;

pub use round::{dice_pool_size, roll_dice, scare_limit, RoundSetup};
pub use score::{score_round, RevealSummary, RoundOutcome};

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::error::{AppError, AppResult};
use crate::protocol::ChangeEvent;
use crate::store::{MemStore, Store};
use crate::types::Room;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Broadcast channel feeding the per-room change sockets
    pub events: broadcast::Sender<ChangeEvent>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self { store, events: tx }
    }

    /// State over the default in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemStore::new()))
    }

    /// Fan an event out to connected sockets. No receivers is fine.
    pub(crate) fn emit(&self, event: ChangeEvent) {
        let _ = self.events.send(event);
    }

    /// Fetch a room or fail. `code` must already be normalized.
    pub(crate) async fn require_room(&self, code: &str) -> AppResult<Room> {
        self.store
            .room(code)
            .await?
            .ok_or_else(|| AppError::RoomNotFound(code.to_string()))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Choice, RoomPhase};

    #[tokio::test]
    async fn test_create_room_normalizes_code() {
        let state = AppState::in_memory();
        let room = state
            .create_room("  camp fire!! ", "Ada", "host-1")
            .await
            .unwrap();

        assert_eq!(room.code, "CAMP-FIRE");
        assert_eq!(room.phase, RoomPhase::Lobby);
        assert_eq!(room.round, 0);
        assert!(room.dice.is_none());
        assert!(room.limit_total.is_none());

        let players = state.store.players_in_room("CAMP-FIRE").await.unwrap();
        assert_eq!(players.len(), 1);
        assert!(players[0].is_host);
    }

    #[tokio::test]
    async fn test_create_room_rejects_blank_fields() {
        let state = AppState::in_memory();

        let err = state.create_room("", "Ada", "host-1").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = state
            .create_room("camp", "  ", "host-1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Name with no usable characters normalizes to an empty code.
        let err = state.create_room("!!!", "Ada", "host-1").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_join_unknown_room() {
        let state = AppState::in_memory();
        let err = state.join_room("NOWHERE", "Bea", "p-2").await.unwrap_err();
        assert!(matches!(err, AppError::RoomNotFound(_)));
    }

    #[tokio::test]
    async fn test_join_sets_host_flag_by_id() {
        let state = AppState::in_memory();
        state.create_room("camp", "Ada", "host-1").await.unwrap();

        let bea = state.join_room("camp", "Bea", "p-2").await.unwrap();
        assert!(!bea.is_host);

        // The host rejoining from a fresh tab keeps the flag.
        let ada = state.join_room("CAMP", "Ada", "host-1").await.unwrap();
        assert!(ada.is_host);
    }

    #[tokio::test]
    async fn test_rejoin_updates_name_keeps_score() {
        let state = AppState::in_memory();
        state.create_room("camp", "Ada", "host-1").await.unwrap();
        state.join_room("camp", "Bea", "p-2").await.unwrap();
        state.store.update_player_score("p-2", 5).await.unwrap();

        let rejoined = state.join_room("camp", "Beatrix", "p-2").await.unwrap();
        assert_eq!(rejoined.name, "Beatrix");
        assert_eq!(rejoined.score, 5);
    }

    #[tokio::test]
    async fn test_round_lifecycle() {
        let state = AppState::in_memory();
        state.create_room("camp", "Ada", "host-1").await.unwrap();
        state.join_room("camp", "Bea", "p-2").await.unwrap();

        let setup = state.start_round("camp", "host-1").await.unwrap();
        assert_eq!(setup.round, 1);
        assert_eq!(setup.dice.len(), 2);
        assert_eq!(
            setup.limit,
            setup.dice.iter().map(|&d| i32::from(d)).sum::<i32>() + 5
        );

        let room = state.store.room("CAMP").await.unwrap().unwrap();
        assert_eq!(room.phase, RoomPhase::Picking);
        assert_eq!(room.round, 1);
        assert_eq!(room.dice.as_deref(), Some(&setup.dice[..]));
        assert_eq!(room.limit_total, Some(setup.limit));
    }

    #[tokio::test]
    async fn test_start_round_is_host_only() {
        let state = AppState::in_memory();
        state.create_room("camp", "Ada", "host-1").await.unwrap();
        state.join_room("camp", "Bea", "p-2").await.unwrap();

        let err = state.start_round("camp", "p-2").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_pick_requires_picking_phase() {
        let state = AppState::in_memory();
        state.create_room("camp", "Ada", "host-1").await.unwrap();

        let err = state
            .submit_pick("camp", "host-1", Choice::Berry)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PhaseConflict(_)));
    }

    #[tokio::test]
    async fn test_pick_overwrites_within_round() {
        let state = AppState::in_memory();
        state.create_room("camp", "Ada", "host-1").await.unwrap();
        state.start_round("camp", "host-1").await.unwrap();

        state
            .submit_pick("camp", "host-1", Choice::Deer)
            .await
            .unwrap();
        state
            .submit_pick("camp", "host-1", Choice::Berry)
            .await
            .unwrap();

        let picks = state.store.picks_for_round("CAMP", 1).await.unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].choice, Choice::Berry);
    }

    #[tokio::test]
    async fn test_new_round_leaves_old_picks_behind() {
        let state = AppState::in_memory();
        state.create_room("camp", "Ada", "host-1").await.unwrap();
        state.start_round("camp", "host-1").await.unwrap();
        state
            .submit_pick("camp", "host-1", Choice::Deer)
            .await
            .unwrap();
        state.reveal_round("camp", "host-1").await.unwrap();

        state.start_round("camp", "host-1").await.unwrap();
        assert!(state.store.picks_for_round("CAMP", 2).await.unwrap().is_empty());
        // Round 1 picks are still in storage, just out of scope.
        assert_eq!(state.store.picks_for_round("CAMP", 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_room_state_masks_choices_until_reveal() {
        let state = AppState::in_memory();
        state.create_room("camp", "Ada", "host-1").await.unwrap();
        state.join_room("camp", "Bea", "p-2").await.unwrap();
        state.start_round("camp", "host-1").await.unwrap();
        state
            .submit_pick("camp", "p-2", Choice::Mushroom)
            .await
            .unwrap();

        let snapshot = state.room_state("camp").await.unwrap();
        assert_eq!(snapshot.picks.len(), 1);
        assert!(snapshot.picks[0].choice.is_none());

        state.submit_pick("camp", "host-1", Choice::Berry).await.unwrap();
        state.reveal_round("camp", "host-1").await.unwrap();

        let snapshot = state.room_state("camp").await.unwrap();
        assert_eq!(snapshot.picks.len(), 2);
        assert!(snapshot.picks.iter().all(|p| p.choice.is_some()));
    }

    #[tokio::test]
    async fn test_events_are_emitted_per_room() {
        let state = AppState::in_memory();
        let mut rx = state.events.subscribe();

        state.create_room("camp", "Ada", "host-1").await.unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.room_code(), "CAMP");
        assert!(matches!(first, ChangeEvent::RoomUpdated { .. }));

        let second = rx.recv().await.unwrap();
        assert!(matches!(second, ChangeEvent::PlayerUpserted { .. }));
    }
}
