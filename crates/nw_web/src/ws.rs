use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use crate::AppState;

pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| subscriber(socket, state))
}

async fn subscriber(socket: WebSocket, state: Arc<AppState>) {
    info!(subscribers = state.hub.subscriber_count() + 1, "Client connected");
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.hub.subscribe();

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let text = match serde_json::to_string(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(error = %e, "could not encode push event");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "slow subscriber skipped events");
                }
                Err(RecvError::Closed) => break,
            },
            msg = receiver.next() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    info!("Client disconnected");
}

#[cfg(test)]
mod tests {
    use crate::{create_app, AppState, BroadcastHub};
    use futures_util::StreamExt;
    use nw_core::{NewsPayload, NewsSink};
    use nw_scrapers::HealthMonitor;
    use nw_storage::InMemoryStorage;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio_tungstenite::{connect_async, tungstenite::Message as ClientMessage};

    async fn wait_for_subscribers(hub: &BroadcastHub, expected: usize) {
        for _ in 0..200 {
            if hub.subscriber_count() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} subscribers, have {}", expected, hub.subscriber_count());
    }

    #[tokio::test]
    async fn test_socket_receives_published_items() {
        let dir = tempfile::tempdir().unwrap();
        let hub = BroadcastHub::default();
        let state = AppState {
            storage: Arc::new(InMemoryStorage::new()),
            hub: hub.clone(),
            monitor: HealthMonitor::new(),
            static_dir: dir.path().to_path_buf(),
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_app(state)).await.unwrap();
        });

        let (mut socket, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
        wait_for_subscribers(&hub, 1).await;

        hub.publish(NewsPayload::new("G1", "T", "S"));
        hub.publish(NewsPayload::new("UOL", "U", "V"));

        let mut received = Vec::new();
        while received.len() < 2 {
            let msg = tokio::time::timeout(Duration::from_secs(5), socket.next())
                .await
                .expect("no event pushed")
                .unwrap()
                .unwrap();
            if let ClientMessage::Text(text) = msg {
                received.push(serde_json::from_str::<serde_json::Value>(&text).unwrap());
            }
        }
        assert_eq!(
            received[0],
            serde_json::json!({"event": "nova_noticia", "data": {"fonte": "G1", "titulo": "T", "resumo": "S"}})
        );
        assert_eq!(received[1]["data"]["fonte"], "UOL");

        socket.close(None).await.unwrap();
        wait_for_subscribers(&hub, 0).await;
    }
}
