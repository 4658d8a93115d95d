//! HTTP endpoints for the game operations.
//!
//! Thin glue: each handler decodes the body, calls into `AppState`, and
//! re-encodes the result. All rule enforcement lives in the state layer.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::AppResult;
use crate::protocol::{
    CreateRoomRequest, CreateRoomResponse, HostActionRequest, JoinRoomRequest, OkResponse,
    PickRequest, RevealResponse, RoomStateResponse, StartRoundResponse,
};
use crate::state::AppState;
use crate::types::RoomPhase;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/rooms", post(create_room))
        .route("/api/rooms/{code}", get(room_state))
        .route("/api/rooms/{code}/join", post(join_room))
        .route("/api/rooms/{code}/pick", post(submit_pick))
        .route("/api/rooms/{code}/start", post(start_round))
        .route("/api/rooms/{code}/reveal", post(reveal_round))
}

async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> AppResult<Json<CreateRoomResponse>> {
    let room = state
        .create_room(&req.room_name, &req.player_name, &req.player_id)
        .await?;
    Ok(Json(CreateRoomResponse { code: room.code }))
}

async fn room_state(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<RoomStateResponse>> {
    Ok(Json(state.room_state(&code).await?))
}

async fn join_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<JoinRoomRequest>,
) -> AppResult<Json<OkResponse>> {
    state
        .join_room(&code, &req.player_name, &req.player_id)
        .await?;
    Ok(Json(OkResponse::ok()))
}

async fn submit_pick(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<PickRequest>,
) -> AppResult<Json<OkResponse>> {
    state.submit_pick(&code, &req.player_id, req.choice).await?;
    Ok(Json(OkResponse::ok()))
}

async fn start_round(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<HostActionRequest>,
) -> AppResult<Json<StartRoundResponse>> {
    let setup = state.start_round(&code, &req.player_id).await?;
    Ok(Json(StartRoundResponse {
        ok: true,
        dice: setup.dice,
        limit: setup.limit,
        round: setup.round,
    }))
}

async fn reveal_round(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<HostActionRequest>,
) -> AppResult<Json<RevealResponse>> {
    let summary = state.reveal_round(&code, &req.player_id).await?;
    Ok(Json(RevealResponse {
        ok: true,
        blew_limit: summary.blew_limit,
        total_noise: summary.total_noise,
        phase: RoomPhase::Reveal,
        players: summary.players,
    }))
}
