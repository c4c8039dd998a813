// @file: twin_distributor/src/api/ws_server.rs
// @description: WebSocket ingest server. Each text frame is one typed payload.
// @author: LAS.

use std::net::SocketAddr;
use futures_util::{SinkExt, StreamExt};
use log::{error, info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use crate::core::dispatcher::Dispatcher;
use crate::core::models::{IngestMessage, IngestReply};
use crate::utils::config::AppConfig;


pub async fn start_server(dispatcher: Dispatcher, config: AppConfig) -> std::io::Result<()> {
    let addr: SocketAddr = config.server_bind_address.parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let listener: TcpListener = TcpListener::bind(&addr).await?;

    info!("WebSocket ingest server listening on: {}", addr);

    while let Ok((stream, peer)) = listener.accept().await {
        let dispatcher_clone: Dispatcher = dispatcher.clone();
        tokio::spawn(handle_connection(stream, peer, dispatcher_clone));
    }
    Ok(())
}


async fn handle_connection(stream: TcpStream, peer: SocketAddr, dispatcher: Dispatcher) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            error!("Error during websocket handshake with {}: {}", peer, e);
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();
    info!("Collector connected: {}", peer);

    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let reply: IngestReply = process_frame(&dispatcher, &text).await;
                match serde_json::to_string(&reply) {
                    Ok(json) => {
                        if write.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => error!("Failed to encode reply: {}", e),
                }
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => break,
            Err(e) => {
                warn!("Error reading from {}: {}", peer, e);
                break;
            }
            _ => {} // Binary frames are not part of the protocol
        }
    }

    info!("Collector disconnected: {}", peer);
}

/// Decodes one frame, dispatches it and builds the reply. Never fails the connection.
pub async fn process_frame(dispatcher: &Dispatcher, text: &str) -> IngestReply {
    let message: IngestMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            return IngestReply::Error { message: format!("invalid ingest message: {}", e) };
        }
    };

    match dispatcher.dispatch(message.sensor_type, &message.data).await {
        Ok(()) => IngestReply::Ok { sensor_type: message.sensor_type },
        Err(e) => {
            warn!("Rejected {} payload: {}", message.sensor_type, e);
            IngestReply::Error { message: e.to_string() }
        }
    }
}
