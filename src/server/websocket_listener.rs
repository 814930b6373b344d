use crate::model::{ClientId, GameEvent};
use crate::server::{Connection, Relay, RelayHandler};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::WebSocketUpgrade;
use axum::response::IntoResponse;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, info, warn};

pub async fn handle_websocket(ws: WebSocketUpgrade, relay: Relay) -> impl IntoResponse {
    ws.on_upgrade(move |socket| listen(socket, relay))
}

async fn listen(socket: WebSocket, relay: Relay) {
    let (ws_sender, ws_receiver) = socket.split();
    let (tx, rx) = tokio::sync::mpsc::channel(32);

    let client_id = ClientId::new_v4();
    relay.register(Connection::new(client_id, tx)).await;

    let sender_task = pump_outgoing(rx, ws_sender);
    let receiver_task = pump_incoming(ws_receiver, client_id, &relay);

    tokio::select! {
        _ = sender_task => {
            debug!(%client_id, "sender task completed");
        }
        _ = receiver_task => {
            debug!(%client_id, "receiver task completed");
        }
    }

    if let Err(e) = relay.disconnect(client_id).await {
        error!(%client_id, "failed to disconnect: {:?}", e);
    }
}

async fn pump_outgoing(mut rx: Receiver<Message>, mut ws_sender: SplitSink<WebSocket, Message>) {
    while let Some(msg) = rx.recv().await {
        if let Err(e) = ws_sender.send(msg).await {
            error!("failed to send message: {:?}", e);
            break;
        }
    }
}

async fn pump_incoming(mut receiver: SplitStream<WebSocket>, client_id: ClientId, relay: &Relay) {
    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<GameEvent>(&text) {
                Ok(event) => {
                    if let Err(e) = relay.handle_event(client_id, event).await {
                        error!(%client_id, "failed to handle event: {:?}", e);
                    }
                }
                Err(e) => {
                    warn!(%client_id, "dropping frame outside the event vocabulary: {:?}", e);
                }
            },
            Ok(Message::Close(_)) => {
                info!(%client_id, "client closed the connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(%client_id, "failed to receive message: {:?}", e);
                break;
            }
        }
    }
}
