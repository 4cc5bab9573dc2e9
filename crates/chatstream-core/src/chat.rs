//! Streaming chat transport.
//!
//! Implements the client side of the backend's `data: <fragment>` /
//! `data: [DONE]` text stream, plus the canonical-message reconciliation
//! performed once a stream completes.

use futures::StreamExt;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::ApiClient;
use crate::error::{ClientError, Result, response_to_error};
use crate::models::SessionIdentity;

/// Response header carrying the authoritative session id.
pub const SESSION_ID_HEADER: &str = "X-Session-ID";

/// End-of-stream sentinel payload.
const DONE_SENTINEL: &str = "[DONE]";

/// Marker that opens every stream frame.
const FRAME_PREFIX: &str = "data: ";

/// Terminator between frames.
const FRAME_TERMINATOR: &str = "\n\n";

#[derive(Serialize)]
struct ChatStreamRequest<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bot_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct LatestMessageResponse {
    content: String,
}

/// One entry of a server-side conversation history
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize)]
struct ChatHistoryResponse {
    messages: Vec<HistoryMessage>,
}

enum Frame {
    Fragment(String),
    Done,
}

/// Incremental decoder for the `data:`-framed stream body.
///
/// Bytes arrive in arbitrary chunk sizes; a frame is only complete once its
/// `\n\n` terminator has been seen, so a payload keeps any newlines embedded
/// between the `data: ` marker and the terminator.
#[derive(Debug, Default)]
struct FrameBuffer {
    buf: String,
}

impl FrameBuffer {
    fn push(&mut self, chunk: &str) -> Vec<Frame> {
        self.buf.push_str(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buf.find(FRAME_TERMINATOR) {
            let raw = self.buf[..pos].to_string();
            self.buf.drain(..pos + FRAME_TERMINATOR.len());
            if let Some(frame) = parse_frame(&raw) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Consume whatever is left once the connection closed without a
    /// terminator (e.g. a network interruption mid-frame).
    fn finish(self) -> Option<Frame> {
        let raw = self.buf.trim_end_matches('\n');
        if raw.is_empty() {
            return None;
        }
        parse_frame(raw)
    }
}

fn parse_frame(raw: &str) -> Option<Frame> {
    let payload = raw.strip_prefix(FRAME_PREFIX)?;
    if payload == DONE_SENTINEL {
        Some(Frame::Done)
    } else {
        Some(Frame::Fragment(payload.to_string()))
    }
}

/// A single streaming conversational turn.
///
/// The session id handshake happens before the first fragment: if the server
/// confirmed an id via the response header, it is available here as soon as
/// the turn opens.
pub struct ChatTurn {
    /// Authoritative session id from the response header, when present.
    pub server_session_id: Option<String>,
    /// Reply fragments in arrival order. The `[DONE]` sentinel is consumed
    /// internally and never yielded.
    pub fragments: BoxStream<'static, Result<String>>,
}

impl std::fmt::Debug for ChatTurn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatTurn")
            .field("server_session_id", &self.server_session_id)
            .field("fragments", &"<stream>")
            .finish()
    }
}

impl ApiClient {
    /// Open a streaming chat turn.
    ///
    /// Fails with [`ClientError::Api`] before any streaming begins if the
    /// response status is not 2xx.
    pub async fn stream_chat(
        &self,
        message: &str,
        session_id: Option<&str>,
        bot_id: Option<&str>,
    ) -> Result<ChatTurn> {
        let body = ChatStreamRequest {
            message,
            session_id,
            bot_id,
        };
        let response = self
            .http
            .post(self.url("/chat/stream"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(response_to_error(response).await);
        }

        let server_session_id = response
            .headers()
            .get(SESSION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let fragments = async_stream::stream! {
            let mut byte_stream = response.bytes_stream();
            let mut buffer = FrameBuffer::default();

            while let Some(chunk) = byte_stream.next().await {
                let chunk = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield Err(ClientError::Http(e));
                        return;
                    }
                };

                for frame in buffer.push(&String::from_utf8_lossy(&chunk)) {
                    match frame {
                        Frame::Fragment(text) => yield Ok(text),
                        Frame::Done => return,
                    }
                }
            }

            // Closed without the sentinel: keep a complete trailing frame,
            // then end the turn with what we have.
            if let Some(Frame::Fragment(text)) = buffer.finish() {
                yield Ok(text);
            }
        };

        Ok(ChatTurn {
            server_session_id,
            fragments: Box::pin(fragments),
        })
    }

    /// Run a full conversational turn: stream the reply, then reconcile it
    /// with the canonical message.
    ///
    /// `on_delta` observes the accumulated reply after every fragment. The
    /// returned string is the canonical server-side message when available,
    /// falling back to the accumulated streamed text otherwise.
    pub async fn send_message(
        &self,
        message: &str,
        identity: &mut SessionIdentity,
        bot_id: Option<&str>,
        mut on_delta: impl FnMut(&str),
    ) -> Result<String> {
        let mut turn = self
            .stream_chat(message, Some(identity.effective()), bot_id)
            .await?;

        if let Some(id) = turn.server_session_id.take() {
            identity.observe_server_id(id);
        }

        let mut accumulated = String::new();
        while let Some(fragment) = turn.fragments.next().await {
            match fragment {
                Ok(text) => {
                    accumulated.push_str(&text);
                    on_delta(&accumulated);
                }
                Err(e) if accumulated.is_empty() => return Err(e),
                Err(e) => {
                    // Partial reply in hand; treat the interruption like a
                    // premature close rather than losing the turn.
                    warn!(error = %e, "chat stream interrupted, keeping partial reply");
                    break;
                }
            }
        }

        // The streamed approximation can lose formatting the canonical
        // endpoint preserves, so prefer the server's copy of the reply.
        match self.latest_message(identity.effective()).await {
            Ok(content) => Ok(content),
            Err(e) => {
                warn!(error = %e, "canonical message lookup failed, using streamed text");
                Ok(accumulated)
            }
        }
    }

    /// Fetch the authoritative last assistant message of a session.
    pub async fn latest_message(&self, session_id: &str) -> Result<String> {
        let response = self
            .http
            .get(self.url(&format!("/chat/latest/{session_id}")))
            .send()
            .await?;
        let latest: LatestMessageResponse = Self::decode_json(response).await?;
        Ok(latest.content)
    }

    /// Fetch the full server-side history of a session.
    pub async fn chat_history(&self, session_id: &str) -> Result<Vec<HistoryMessage>> {
        let response = self
            .http
            .get(self.url(&format!("/chat/history/{session_id}")))
            .send()
            .await?;
        let history: ChatHistoryResponse = Self::decode_json(response).await?;
        Ok(history.messages)
    }

    /// Clear the server-side history of a session.
    pub async fn clear_chat_history(&self, session_id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/chat/history/{session_id}")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(response_to_error(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(frames: Vec<Frame>) -> Vec<String> {
        frames
            .into_iter()
            .filter_map(|f| match f {
                Frame::Fragment(text) => Some(text),
                Frame::Done => None,
            })
            .collect()
    }

    #[test]
    fn test_payloads_concatenate_in_order() {
        let mut buffer = FrameBuffer::default();
        let mut accumulated = String::new();

        for text in fragments(buffer.push("data: Hello\n\ndata:  world\n\n")) {
            accumulated.push_str(&text);
        }
        assert_eq!(accumulated, "Hello world");
    }

    #[test]
    fn test_frames_split_across_chunks() {
        let mut buffer = FrameBuffer::default();

        assert!(buffer.push("data: Hel").is_empty());
        assert!(buffer.push("lo\n").is_empty());
        let frames = buffer.push("\ndata: !\n\n");
        assert_eq!(fragments(frames), vec!["Hello", "!"]);
    }

    #[test]
    fn test_embedded_newlines_preserved() {
        let mut buffer = FrameBuffer::default();
        let frames = buffer.push("data: line one\nline two\n\n");
        assert_eq!(fragments(frames), vec!["line one\nline two"]);
    }

    #[test]
    fn test_done_sentinel_not_treated_as_payload() {
        let mut buffer = FrameBuffer::default();
        let frames = buffer.push("data: Hello\n\ndata:  world\n\ndata: [DONE]\n\n");

        assert_eq!(frames.len(), 3);
        assert!(matches!(frames[2], Frame::Done));
        assert_eq!(fragments(frames), vec!["Hello", " world"]);
    }

    #[test]
    fn test_lines_without_marker_skipped() {
        let mut buffer = FrameBuffer::default();
        let frames = buffer.push(": comment\n\ndata: ok\n\n");
        assert_eq!(fragments(frames), vec!["ok"]);
    }

    #[test]
    fn test_finish_recovers_unterminated_frame() {
        let mut buffer = FrameBuffer::default();
        assert!(buffer.push("data: tail").is_empty());

        match buffer.finish() {
            Some(Frame::Fragment(text)) => assert_eq!(text, "tail"),
            _ => panic!("expected trailing fragment"),
        }
    }

    #[test]
    fn test_finish_ignores_trailing_sentinel_and_noise() {
        let buffer = FrameBuffer {
            buf: "data: [DONE]".to_string(),
        };
        assert!(matches!(buffer.finish(), Some(Frame::Done)));

        let buffer = FrameBuffer {
            buf: "\n".to_string(),
        };
        assert!(buffer.finish().is_none());
    }
}
