//! Live transcription session against the realtime speech service.
//!
//! The session owns a single websocket: audio chunks go out as base64 JSON
//! frames, partial results come back tagged with a numeric start offset and
//! are reassembled in offset order. Connection loss with an abnormal close
//! code triggers bounded reconnection; explicit termination closes the
//! stream cleanly and yields the final transcript.

mod session;
mod transcript;

pub use session::{start, SessionError, SessionEvent, SessionHandle, SessionState};
pub use transcript::TranscriptAssembler;
