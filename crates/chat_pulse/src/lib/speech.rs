//! Serialized text-to-speech dispatch.
//!
//! A single worker thread drains an unbounded FIFO channel and performs one
//! blocking utterance at a time, so overlapping engine calls never collide
//! and submission order is preserved. Delivery is best-effort: a backlog
//! simply grows and is spoken on a delay.

use std::{fmt::Debug, thread, time::Duration};

use tokio::sync::mpsc;
use tts::Tts;

/// Abstraction over the synthesis engine so the dispatcher can be exercised
/// without audio hardware.
pub trait SpeechEngine: Send + 'static {
    type Error: Debug;

    /// Voice identifiers available on this engine.
    fn voices(&self) -> Vec<String>;

    /// Speak `text` with `voice`, blocking until the utterance completes.
    fn speak(&mut self, text: &str, voice: Option<&str>) -> Result<(), Self::Error>;
}

/// A queued dispatcher request. `Stop` is a distinct variant rather than an
/// empty-text sentinel, so real payloads can never be mistaken for it.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechRequest {
    Utterance {
        text: String,
        voice: Option<String>,
    },
    Stop,
}

/// Cheap cloneable handle for submitting utterances.
#[derive(Debug, Clone)]
pub struct SpeechHandle {
    tx: mpsc::UnboundedSender<SpeechRequest>,
}

impl SpeechHandle {
    /// Fire-and-forget enqueue; returns immediately. Submission order is the
    /// order spoken.
    pub fn enqueue(&self, text: impl Into<String>, voice: Option<String>) {
        let request = SpeechRequest::Utterance {
            text: text.into(),
            voice,
        };
        if self.tx.send(request).is_err() {
            tracing::warn!("speech worker is gone, dropping utterance");
        }
    }
}

/// Owns the worker thread; at most one utterance is ever in flight.
pub struct SpeechDispatcher {
    tx: mpsc::UnboundedSender<SpeechRequest>,
    worker: Option<thread::JoinHandle<()>>,
}

impl SpeechDispatcher {
    /// Spawns the single worker thread that serializes utterances on
    /// `engine`. Engine failures are logged per utterance and never stop the
    /// worker.
    pub fn spawn<E: SpeechEngine>(mut engine: E) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<SpeechRequest>();

        let worker = thread::Builder::new()
            .name("speech-worker".into())
            .spawn(move || {
                while let Some(request) = rx.blocking_recv() {
                    match request {
                        SpeechRequest::Stop => break,
                        SpeechRequest::Utterance { text, voice } => {
                            if let Err(e) = engine.speak(&text, voice.as_deref()) {
                                tracing::error!(error = ?e, "speech engine failed, skipping utterance");
                            }
                        }
                    }
                }
            })
            .expect("failed to spawn speech worker thread");

        SpeechDispatcher {
            tx,
            worker: Some(worker),
        }
    }

    pub fn handle(&self) -> SpeechHandle {
        SpeechHandle {
            tx: self.tx.clone(),
        }
    }

    /// Enqueues the stop sentinel and joins the worker. The backlog ahead of
    /// the sentinel is still spoken first.
    pub fn shutdown(mut self) {
        let _ = self.tx.send(SpeechRequest::Stop);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Production engine wrapping the platform TTS backend.
///
/// The voice list is captured once at startup; profiles reference voices by
/// id from that snapshot.
pub struct SystemTts {
    tts: Tts,
    voices: Vec<tts::Voice>,
}

impl SystemTts {
    pub fn new() -> Result<Self, tts::Error> {
        let tts = Tts::default()?;
        let voices = tts.voices().unwrap_or_default();
        tracing::info!(count = voices.len(), "speech engine initialized");
        Ok(SystemTts { tts, voices })
    }
}

impl SpeechEngine for SystemTts {
    type Error = tts::Error;

    fn voices(&self) -> Vec<String> {
        self.voices.iter().map(|v| v.id()).collect()
    }

    fn speak(&mut self, text: &str, voice: Option<&str>) -> Result<(), Self::Error> {
        if let Some(id) = voice {
            if let Some(v) = self.voices.iter().find(|v| v.id() == id) {
                self.tts.set_voice(v)?;
            }
        }

        self.tts.speak(text, false)?;
        // speak() returns before audio finishes on most backends; block until
        // the utterance is done so the queue stays strictly serial.
        thread::sleep(Duration::from_millis(100));
        while self.tts.is_speaking().unwrap_or(false) {
            thread::sleep(Duration::from_millis(100));
        }
        Ok(())
    }
}
