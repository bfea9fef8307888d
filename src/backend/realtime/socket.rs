/**
 * Relay WebSocket Handler
 *
 * Upgrades `GET /` and `GET /ws` and drives one connection: a writer task
 * drains the connection's outbound queue into the socket while the reader
 * loop hands each inbound text frame to the relay.
 *
 * Close and transport errors only end this connection. Ping/pong is
 * answered by axum.
 */

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};

use crate::backend::realtime::relay::Relay;

pub async fn relay_upgrade(ws: WebSocketUpgrade, State(relay): State<Relay>) -> Response {
    ws.on_upgrade(move |socket| serve_connection(socket, relay))
}

async fn serve_connection(socket: WebSocket, relay: Relay) {
    let (connection, mut outbound) = relay.connect();
    let connection_id = connection.id();
    tracing::info!("[Relay] Connection {} opened", connection_id);

    let (mut sink, mut stream) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if let Err(e) = sink.send(Message::Text(text.into())).await {
                tracing::debug!("[Relay] Write to connection {} failed: {}", connection_id, e);
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => relay.handle_text(&connection, text.as_str()).await,
            Ok(Message::Binary(_)) => relay.reject_binary(&connection),
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("[Relay] Connection {} errored: {}", connection_id, e);
                break;
            }
        }
    }

    drop(connection);
    if let Err(e) = writer.await {
        tracing::warn!("[Relay] Writer task for connection {} failed: {}", connection_id, e);
    }
    tracing::info!("[Relay] Connection {} closed", connection_id);
}
