use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures_util::{SinkExt, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use super::transcript::TranscriptAssembler;
use crate::config::VoiceConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Streaming,
    Closing,
    Reconnecting,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Websocket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Gave up after {attempts} reconnect attempts")]
    ReconnectLimit { attempts: u32 },

    #[error("Session task aborted")]
    Aborted,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    State(SessionState),
    /// The transcript rebuilt after a partial result arrived.
    Transcript(String),
}

/// Caller's handle to a running session. Dropping it tears the session
/// down; [`SessionHandle::terminate`] ends it cleanly and returns the final
/// transcript.
pub struct SessionHandle {
    events: mpsc::Receiver<SessionEvent>,
    audio: mpsc::Sender<Vec<u8>>,
    terminate: mpsc::Sender<()>,
    task: JoinHandle<Result<String, SessionError>>,
}

impl SessionHandle {
    /// Sender for raw audio chunks; cloneable so a capture task can own it.
    pub fn audio_sender(&self) -> mpsc::Sender<Vec<u8>> {
        self.audio.clone()
    }

    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Ask the service to end the session, close the socket, and return the
    /// assembled transcript.
    pub async fn terminate(self) -> Result<String, SessionError> {
        let _ = self.terminate.send(()).await;
        drop(self.audio);
        match self.task.await {
            Ok(result) => result,
            Err(_) => Err(SessionError::Aborted),
        }
    }
}

/// Open a realtime transcription session with the given service token.
pub fn start(config: &VoiceConfig, token: SecretString) -> SessionHandle {
    let (audio_tx, audio_rx) = mpsc::channel::<Vec<u8>>(64);
    let (terminate_tx, terminate_rx) = mpsc::channel::<()>(1);
    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(64);

    let url = format!(
        "{}?sample_rate={}&token={}",
        config.realtime_url,
        config.sample_rate,
        token.expose_secret()
    );

    let task = tokio::spawn(run_session(
        url,
        config.clone(),
        audio_rx,
        terminate_rx,
        event_tx,
    ));

    SessionHandle {
        events: event_rx,
        audio: audio_tx,
        terminate: terminate_tx,
        task,
    }
}

#[derive(Debug)]
enum StreamOutcome {
    /// Caller asked for the session to end (or the audio side went away).
    Terminated,
    /// The service closed the stream, possibly with a close frame.
    Closed(Option<CloseFrame<'static>>),
    /// The socket errored or dropped without a close frame.
    Failed,
}

#[derive(Debug, PartialEq, Eq)]
enum NextStep {
    Finish,
    Reconnect,
}

/// Reconnect accounting, separate from the socket plumbing. A successful
/// connection resets the budget; each abnormal close spends one attempt.
#[derive(Debug)]
struct ReconnectPolicy {
    attempts: u32,
    max_attempts: u32,
}

impl ReconnectPolicy {
    fn new(max_attempts: u32) -> Self {
        Self {
            attempts: 0,
            max_attempts,
        }
    }

    fn connected(&mut self) {
        self.attempts = 0;
    }

    fn abnormal_close(&mut self) -> Result<(), SessionError> {
        self.attempts += 1;
        if self.attempts > self.max_attempts {
            Err(SessionError::ReconnectLimit {
                attempts: self.max_attempts,
            })
        } else {
            Ok(())
        }
    }
}

fn is_normal_close(frame: Option<&CloseFrame<'_>>) -> bool {
    matches!(frame, Some(frame) if frame.code == CloseCode::Normal)
}

fn after_stream(
    outcome: &StreamOutcome,
    policy: &mut ReconnectPolicy,
) -> Result<NextStep, SessionError> {
    match outcome {
        StreamOutcome::Terminated => Ok(NextStep::Finish),
        StreamOutcome::Closed(frame) if is_normal_close(frame.as_ref()) => Ok(NextStep::Finish),
        StreamOutcome::Closed(_) | StreamOutcome::Failed => {
            policy.abnormal_close()?;
            Ok(NextStep::Reconnect)
        }
    }
}

#[derive(Debug, Deserialize)]
struct RealtimeFrame {
    #[serde(default)]
    audio_start: Option<u64>,
    #[serde(default)]
    text: Option<String>,
}

/// Fold a partial-result frame into the assembler; returns the rebuilt
/// transcript when the frame carried one. Frames without an offset (acks,
/// session begin/end markers) are ignored.
fn ingest_fragment(assembler: &mut TranscriptAssembler, payload: &str) -> Option<String> {
    let frame: RealtimeFrame = match serde_json::from_str(payload) {
        Ok(frame) => frame,
        Err(err) => {
            debug!(error = %err, "unrecognized realtime frame");
            return None;
        }
    };
    let offset = frame.audio_start?;
    assembler.insert(offset, frame.text?);
    Some(assembler.render())
}

async fn emit_state(events: &mpsc::Sender<SessionEvent>, state: SessionState) {
    debug!(?state, "session state change");
    let _ = events.send(SessionEvent::State(state)).await;
}

async fn run_session(
    url: String,
    config: VoiceConfig,
    mut audio_rx: mpsc::Receiver<Vec<u8>>,
    mut terminate_rx: mpsc::Receiver<()>,
    events: mpsc::Sender<SessionEvent>,
) -> Result<String, SessionError> {
    let mut assembler = TranscriptAssembler::new();
    let mut policy = ReconnectPolicy::new(config.max_reconnects);

    loop {
        emit_state(&events, SessionState::Connecting).await;
        let stream = match connect_async(url.as_str()).await {
            Ok((stream, _response)) => {
                policy.connected();
                stream
            }
            Err(err) => {
                warn!(error = %err, "realtime socket failed to connect");
                if policy.abnormal_close().is_err() {
                    return Err(SessionError::Socket(err));
                }
                emit_state(&events, SessionState::Reconnecting).await;
                tokio::time::sleep(config.reconnect_delay).await;
                continue;
            }
        };

        emit_state(&events, SessionState::Streaming).await;
        let (mut sink, mut source) = stream.split();
        let mut ping = tokio::time::interval(config.ping_interval);
        ping.tick().await; // the first tick fires immediately

        let outcome = loop {
            tokio::select! {
                frame = source.next() => match frame {
                    Some(Ok(Message::Text(payload))) => {
                        if let Some(snapshot) = ingest_fragment(&mut assembler, &payload) {
                            let _ = events.send(SessionEvent::Transcript(snapshot)).await;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => break StreamOutcome::Closed(frame),
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(error = %err, "realtime socket errored");
                        break StreamOutcome::Failed;
                    }
                    None => break StreamOutcome::Failed,
                },
                chunk = audio_rx.recv() => match chunk {
                    Some(bytes) => {
                        let frame = json!({ "audio_data": BASE64.encode(&bytes) }).to_string();
                        if sink.send(Message::Text(frame)).await.is_err() {
                            break StreamOutcome::Failed;
                        }
                    }
                    // Audio producer gone: same as an explicit terminate.
                    None => break StreamOutcome::Terminated,
                },
                _ = ping.tick() => {
                    let keepalive = json!({ "ping": true }).to_string();
                    if sink.send(Message::Text(keepalive)).await.is_err() {
                        break StreamOutcome::Failed;
                    }
                }
                _ = terminate_rx.recv() => break StreamOutcome::Terminated,
            }
        };

        match after_stream(&outcome, &mut policy)? {
            NextStep::Finish => {
                if matches!(outcome, StreamOutcome::Terminated) {
                    emit_state(&events, SessionState::Closing).await;
                    let goodbye = json!({ "terminate_session": true }).to_string();
                    let _ = sink.send(Message::Text(goodbye)).await;
                    let _ = sink.close().await;
                }
                emit_state(&events, SessionState::Idle).await;
                return Ok(assembler.render());
            }
            NextStep::Reconnect => {
                emit_state(&events, SessionState::Reconnecting).await;
                tokio::time::sleep(config.reconnect_delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    fn close_frame(code: CloseCode) -> Option<CloseFrame<'static>> {
        Some(CloseFrame {
            code,
            reason: Cow::Borrowed(""),
        })
    }

    #[test]
    fn terminate_finishes_without_spending_the_budget() {
        let mut policy = ReconnectPolicy::new(1);
        let step = after_stream(&StreamOutcome::Terminated, &mut policy).unwrap();
        assert_eq!(step, NextStep::Finish);
        assert_eq!(policy.attempts, 0);
    }

    #[test]
    fn normal_close_finishes_abnormal_close_reconnects() {
        let mut policy = ReconnectPolicy::new(2);

        let normal = StreamOutcome::Closed(close_frame(CloseCode::Normal));
        assert_eq!(after_stream(&normal, &mut policy).unwrap(), NextStep::Finish);

        let away = StreamOutcome::Closed(close_frame(CloseCode::Away));
        assert_eq!(after_stream(&away, &mut policy).unwrap(), NextStep::Reconnect);
        assert_eq!(policy.attempts, 1);

        // A close without any frame gives no code to trust either.
        let silent = StreamOutcome::Closed(None);
        assert_eq!(after_stream(&silent, &mut policy).unwrap(), NextStep::Reconnect);
    }

    #[test]
    fn exhausted_budget_is_terminal() {
        let mut policy = ReconnectPolicy::new(1);
        assert!(after_stream(&StreamOutcome::Failed, &mut policy).is_ok());
        let err = after_stream(&StreamOutcome::Failed, &mut policy).unwrap_err();
        assert!(matches!(err, SessionError::ReconnectLimit { attempts: 1 }));
    }

    #[test]
    fn successful_reopen_resets_the_budget() {
        let mut policy = ReconnectPolicy::new(1);
        assert!(after_stream(&StreamOutcome::Failed, &mut policy).is_ok());
        policy.connected();
        assert!(after_stream(&StreamOutcome::Failed, &mut policy).is_ok());
    }

    #[test]
    fn fragments_fold_into_an_ordered_transcript() {
        let mut assembler = TranscriptAssembler::new();

        let later = ingest_fragment(&mut assembler, r#"{"audio_start": 1600, "text": "world"}"#);
        assert_eq!(later.as_deref(), Some("world"));

        let earlier = ingest_fragment(&mut assembler, r#"{"audio_start": 0, "text": "hello"}"#);
        assert_eq!(earlier.as_deref(), Some("hello world"));
    }

    #[test]
    fn frames_without_an_offset_are_ignored() {
        let mut assembler = TranscriptAssembler::new();
        assert!(ingest_fragment(&mut assembler, r#"{"session_begins": true}"#).is_none());
        assert!(ingest_fragment(&mut assembler, "not json").is_none());
        assert!(assembler.is_empty());
    }
}
