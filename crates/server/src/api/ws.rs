//! Live solve feed over WebSocket.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use flagforge_api_types::SolveEventMessage;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use super::state::AppState;
use crate::events::{SolveEvent, SolveStream};

pub async fn solves_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    info!("new solve feed connection request");
    let stream = state.service.subscribe_solves();
    ws.on_upgrade(move |socket| handle_socket(socket, stream))
}

async fn handle_socket(socket: WebSocket, mut stream: SolveStream) {
    let (mut sender, mut receiver) = socket.split();
    info!("solve feed connection established");

    let writer_task = tokio::spawn(async move {
        loop {
            let event = match stream.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "solve feed subscriber lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let json = match serde_json::to_string(&solve_message(event)) {
                Ok(json) => json,
                Err(err) => {
                    error!(error = %err, "failed to serialize solve event");
                    break;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // The feed is one-way; reading only watches for the client going away.
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "solve feed receive error");
                break;
            }
        }
    }

    writer_task.abort();
    info!("solve feed connection closed");
}

fn solve_message(event: SolveEvent) -> SolveEventMessage {
    SolveEventMessage {
        challenge_id: event.challenge_id.to_string(),
        challenge_title: event.challenge_title,
        user_email: event.user_email.to_string(),
        points_awarded: event.points_awarded,
        first_blood: event.first_blood,
        solved_at: event.solved_at,
    }
}
