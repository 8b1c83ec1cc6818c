//! Per-connection pump between a store subscription and a WebSocket.

use actix_ws::{Message, MessageStream, Session};
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::StoreSubscription;

/// Forward store changes to the client until either side goes away.
///
/// Dropping the subscription on return tears down the store listener, so
/// no callback keeps firing for a closed socket.
pub(super) async fn run_feed(
    mut session: Session,
    mut stream: MessageStream,
    mut subscription: StoreSubscription,
) {
    loop {
        tokio::select! {
            change = subscription.changed() => {
                let Some(value) = change else {
                    // The feeding adapter is gone; close cleanly.
                    let _ = session.close(None).await;
                    break;
                };
                let payload = value.unwrap_or(Value::Null).to_string();
                if session.text(payload).await.is_err() {
                    break;
                }
            }
            message = stream.recv() => {
                match message {
                    Some(Ok(Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(reason))) => {
                        debug!(?reason, "client closed change feed");
                        let _ = session.close(reason).await;
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }
        }
    }
}
