//! WebSocket transport
//!
//! One task per connection. On accept the connection is subscribed through
//! the pipeline (which replays history), a writer task drains the
//! listener's queue into the socket, and the read loop feeds `sendMessage`
//! events into the pipeline. The listener is unsubscribed when either side
//! ends.

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn;
use tokio_tungstenite::accept_async;
use tracing::{debug, error, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::pipeline::Pipeline;
use crate::transport::message::{ClientEvent, ServerEvent};
use crate::utils::error::ChatError;

/// Bind `addr` and serve until the listener fails.
pub async fn start_websocket_server(addr: &str, pipeline: Pipeline) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(target: "websocket", "WebSocket server listening on ws://{}", listener.local_addr()?);
    serve(listener, pipeline).await
}

/// Accept connections on an already bound listener.
pub async fn serve(listener: TcpListener, pipeline: Pipeline) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        debug!(target: "websocket", %peer, "tcp connection accepted");
        spawn(handle_connection(stream, pipeline.clone()));
    }
}

async fn handle_connection(stream: TcpStream, pipeline: Pipeline) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!(target: "websocket", "WebSocket handshake error: {e}");
            return;
        }
    };
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let subscription = match pipeline.connect().await {
        Ok(sub) => sub,
        Err(e) => {
            error!(target: "websocket", error = %e, "could not load history for new listener");
            let _ = ws_sender
                .send(encode(&ServerEvent::error("history unavailable")))
                .await;
            return;
        }
    };
    let client_id = subscription.id.clone();
    let mut events = subscription.events;
    info!(target: "websocket", %client_id, "client connected");

    // broker -> client
    {
        let client_id = client_id.clone();
        let pipeline = pipeline.clone();
        spawn(async move {
            while let Some(event) = events.recv().await {
                if let Err(e) = ws_sender.send(encode(&event)).await {
                    warn!(target: "websocket", %client_id, "Failed to send message: {e}");
                    break;
                }
            }
            pipeline.disconnect(&client_id);
            debug!(target: "websocket", %client_id, "send loop closed");
        });
    }

    // client -> pipeline
    while let Some(Ok(msg)) = ws_receiver.next().await {
        let text = match msg {
            WsMessage::Text(text) => text,
            WsMessage::Close(_) => break,
            _ => continue,
        };

        let reply = match serde_json::from_str::<ClientEvent>(text.as_str()) {
            Ok(ClientEvent::SendMessage { sender, body }) => {
                match pipeline.ingest(&sender, &body).await {
                    Ok(_) => None,
                    Err(ChatError::Validation(e)) => Some(ServerEvent::error(e.to_string())),
                    Err(ChatError::StoreUnavailable(_)) => {
                        Some(ServerEvent::error("failed to send message"))
                    }
                }
            }
            Err(err) => {
                warn!(
                    target: "websocket",
                    %client_id,
                    "Invalid client message: {err} | {}",
                    text.as_str().chars().take(100).collect::<String>()
                );
                Some(ServerEvent::error("invalid event"))
            }
        };

        if let Some(event) = reply {
            pipeline.deliver(&client_id, event);
        }
    }

    info!(target: "websocket", %client_id, "client disconnected");
    // Dropping the registry entry closes the queue; the writer drains and exits.
    pipeline.disconnect(&client_id);
}

fn encode(event: &ServerEvent) -> WsMessage {
    match serde_json::to_string(event) {
        Ok(json) => WsMessage::text(json),
        Err(e) => {
            error!(target: "websocket", "Failed to serialize event: {e}");
            WsMessage::text(r#"{"event":"error","message":"internal error"}"#)
        }
    }
}
