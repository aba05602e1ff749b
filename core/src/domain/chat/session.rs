use std::{collections::VecDeque, fmt::Display, pin::pin};

use futures::{Sink, SinkExt, Stream, StreamExt, TryStreamExt, stream};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    chat::{
        entities::{ChatFrame, ChatMessage, SessionState},
        ports::ChatService,
        value_objects::CorrelationIdGenerator,
    },
    common::DEFAULT_MAX_PENDING_MESSAGES,
};

/// How the processing of one inbound message ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    Completed,
    Failed,
    Disconnected,
}

/// Drives one chat connection: reads user messages one at a time and streams
/// the cumulative answer back, tagged with a per-message correlation id.
///
/// Messages received while an answer is still streaming are queued and handled
/// in arrival order once that answer finishes. At most `max_pending` messages
/// wait; any further message is answered right away with an error frame.
pub struct ChatSession<S> {
    service: S,
    state: SessionState,
    ids: CorrelationIdGenerator,
    pending: VecDeque<String>,
    max_pending: usize,
}

impl<S> ChatSession<S>
where
    S: ChatService,
{
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: SessionState::Open,
            ids: CorrelationIdGenerator::default(),
            pending: VecDeque::new(),
            max_pending: DEFAULT_MAX_PENDING_MESSAGES,
        }
    }

    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runs until the inbound stream ends or the outbound sink rejects a frame.
    pub async fn run<In, Out>(&mut self, mut inbound: In, mut outbound: Out) -> SessionState
    where
        In: Stream<Item = String> + Unpin + Send,
        Out: Sink<ChatFrame> + Unpin + Send,
        Out::Error: Display,
    {
        while self.state != SessionState::Closed {
            let text = match self.pending.pop_front() {
                Some(text) => text,
                None => match inbound.next().await {
                    Some(text) => text,
                    None => {
                        debug!("Chat client disconnected");
                        self.state = SessionState::Closed;
                        break;
                    }
                },
            };

            if self.process_message(text, &mut inbound, &mut outbound).await
                == MessageOutcome::Disconnected
            {
                self.state = SessionState::Closed;
            }
        }

        self.state
    }

    async fn process_message<In, Out>(
        &mut self,
        text: String,
        inbound: &mut In,
        outbound: &mut Out,
    ) -> MessageOutcome
    where
        In: Stream<Item = String> + Unpin + Send,
        Out: Sink<ChatFrame> + Unpin + Send,
        Out::Error: Display,
    {
        let correlation_id = self.ids.next_id();

        if text.trim().is_empty() {
            let frame = ChatFrame::Error {
                correlation_id,
                message: "message must not be empty".to_string(),
            };
            return match send_frame(outbound, frame).await {
                true => MessageOutcome::Failed,
                false => MessageOutcome::Disconnected,
            };
        }

        info!(%correlation_id, "Chat message received");
        self.state = SessionState::AwaitingCompletion;

        let message = ChatMessage {
            correlation_id,
            text,
        };
        let mut upstream = pin!(stream::once(self.service.open_completion(message)).try_flatten());
        let mut response = String::new();

        let outcome = loop {
            tokio::select! {
                biased;

                fragment = upstream.next() => match fragment {
                    Some(Ok(fragment)) => {
                        if fragment.is_empty() {
                            continue;
                        }
                        response.push_str(&fragment);
                        let frame = ChatFrame::Partial {
                            correlation_id,
                            text: response.clone(),
                        };
                        if !send_frame(outbound, frame).await {
                            break MessageOutcome::Disconnected;
                        }
                    }
                    Some(Err(err)) => {
                        warn!(%correlation_id, error = %err, "Chat completion failed");
                        let frame = error_frame(correlation_id);
                        if !send_frame(outbound, frame).await {
                            break MessageOutcome::Disconnected;
                        }
                        break MessageOutcome::Failed;
                    }
                    None => {
                        if !send_frame(outbound, ChatFrame::Done { correlation_id }).await {
                            break MessageOutcome::Disconnected;
                        }
                        info!(%correlation_id, chars = response.len(), "Chat completion finished");
                        break MessageOutcome::Completed;
                    }
                },
                next_message = inbound.next() => match next_message {
                    Some(text) => {
                        if !Self::enqueue(
                            &mut self.pending,
                            self.max_pending,
                            &mut self.ids,
                            text,
                            outbound,
                        )
                        .await
                        {
                            break MessageOutcome::Disconnected;
                        }
                    }
                    None => {
                        info!(%correlation_id, "Client disconnected mid-stream, abandoning completion");
                        break MessageOutcome::Disconnected;
                    }
                },
            }
        };

        if outcome != MessageOutcome::Disconnected {
            self.state = SessionState::Open;
        }

        outcome
    }

    /// Queues a message that arrived mid-stream. When the queue is full the
    /// message is rejected with its own error frame. Returns `false` when the
    /// client can no longer be reached.
    async fn enqueue<Out>(
        pending: &mut VecDeque<String>,
        max_pending: usize,
        ids: &mut CorrelationIdGenerator,
        text: String,
        outbound: &mut Out,
    ) -> bool
    where
        Out: Sink<ChatFrame> + Unpin + Send,
        Out::Error: Display,
    {
        if pending.len() < max_pending {
            pending.push_back(text);
            return true;
        }

        let correlation_id = ids.next_id();
        warn!(%correlation_id, max_pending = max_pending, "Chat queue full, rejecting message");
        let frame = ChatFrame::Error {
            correlation_id,
            message: "too many messages pending, please wait for the current answer".to_string(),
        };
        send_frame(outbound, frame).await
    }
}

fn error_frame(correlation_id: Uuid) -> ChatFrame {
    ChatFrame::Error {
        correlation_id,
        message: "the assistant is unavailable, please try again".to_string(),
    }
}

/// Returns `false` when the client can no longer be reached.
async fn send_frame<Out>(outbound: &mut Out, frame: ChatFrame) -> bool
where
    Out: Sink<ChatFrame> + Unpin,
    Out::Error: Display,
{
    match outbound.send(frame).await {
        Ok(()) => true,
        Err(err) => {
            debug!(error = %err, "Failed to deliver chat frame");
            false
        }
    }
}
