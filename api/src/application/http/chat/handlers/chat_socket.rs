use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{
    SinkExt, StreamExt,
    future::{self, Ready},
};
use nutriscope_core::domain::chat::{entities::ChatFrame, session::ChatSession};
use tracing::{Instrument, info, info_span};

use crate::application::http::server::app_state::AppState;

/// Upgrades to a WebSocket carrying the nutrition chat.
///
/// Each text message from the client is answered by frames of the form
/// `"<id> <cumulative text>"`, terminated by `"<id>:done"` or
/// `"<id>:error <message>"`.
pub async fn chat_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let span = info_span!("chat_session");

    async move {
        info!("Chat session opened");
        let (sender, receiver) = socket.split();

        // Close frames and transport errors end the inbound stream. Binary
        // frames are ignored and ping/pong is answered by the transport.
        let inbound = receiver
            .take_while(|message| {
                future::ready(matches!(message, Ok(m) if !matches!(m, Message::Close(_))))
            })
            .filter_map(|message| {
                future::ready(match message {
                    Ok(Message::Text(text)) => Some(text.as_str().to_owned()),
                    _ => None,
                })
            });

        let outbound = sender.with(|frame: ChatFrame| -> Ready<Result<Message, axum::Error>> {
            future::ready(Ok(Message::Text(frame.to_string().into())))
        });

        let max_pending = state.service.chat_config().max_pending;
        let mut session = ChatSession::new(state.service.clone()).with_max_pending(max_pending);
        let final_state = session.run(Box::pin(inbound), Box::pin(outbound)).await;

        info!(state = ?final_state, "Chat session closed");
    }
    .instrument(span)
    .await
}
