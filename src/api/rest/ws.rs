use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::StreamExt;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::state::AppState;

/// Streams every successful driver assignment to the client as JSON.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| stream_assignments(socket, state))
}

async fn stream_assignments(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.assignment_events_tx.subscribe();

    info!("assignment feed subscriber connected");

    let send_task = tokio::spawn(async move {
        loop {
            let assignment = match events.recv().await {
                Ok(assignment) => assignment,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "assignment feed subscriber lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let json = match serde_json::to_string(&assignment) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize assignment event");
                    continue;
                }
            };

            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            if matches!(message, Message::Close(_)) {
                break;
            }
        }
    });

    until_either_finishes(send_task, recv_task).await;

    info!("assignment feed subscriber disconnected");
}

/// Waits for one pump to end, then aborts and reaps the other so its
/// subscription is released with the socket.
async fn until_either_finishes(mut first: JoinHandle<()>, mut second: JoinHandle<()>) {
    tokio::select! {
        _ = &mut first => {
            second.abort();
            let _ = second.await;
        },
        _ = &mut second => {
            first.abort();
            let _ = first.await;
        },
    }
}
