//! One-shot speech transcription source.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::debug;

use deepblue::error::{Error, Result};
use deepblue::sensors::{Availability, SensorEvent, SensorKind, SensorReading, SensorSource};

/// What a started speech session will produce.
#[derive(Debug, Clone)]
enum Script {
    /// A successful recognition.
    Transcript(String),
    /// A mid-session recognition failure.
    Failure(String),
}

/// A speech source that resolves each session with a scripted outcome.
///
/// Honors the bounded session contract: exactly one
/// [`SensorReading::Transcript`] or one [`SensorEvent::Fault`] per started
/// session, never both, never more. Platforms without speech recognition
/// are modeled with [`ScriptedSpeech::unsupported`].
#[derive(Debug)]
pub struct ScriptedSpeech {
    script: Option<Script>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ScriptedSpeech {
    /// Create a source whose sessions resolve with the given transcript.
    #[must_use]
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            script: Some(Script::Transcript(transcript.into())),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Create a source whose sessions resolve with a recognition fault.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Some(Script::Failure(message.into())),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Create a source for a platform without speech recognition.
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            script: None,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

impl SensorSource for ScriptedSpeech {
    fn name(&self) -> &'static str {
        "scripted-speech"
    }

    fn kind(&self) -> SensorKind {
        SensorKind::Speech
    }

    fn availability(&self) -> Availability {
        if self.script.is_some() {
            Availability::Available
        } else {
            Availability::unavailable("speech recognition not supported on this platform")
        }
    }

    fn start(&mut self, tx: mpsc::Sender<SensorEvent>) -> Result<()> {
        let Some(script) = self.script.clone() else {
            return Err(Error::sensor_start(
                self.name(),
                "speech recognition not supported on this platform",
            ));
        };
        if self.is_running() {
            return Err(Error::sensor_start(self.name(), "already running"));
        }

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        self.worker = Some(std::thread::spawn(move || {
            let event = match script {
                Script::Transcript(text) => SensorEvent::Reading(SensorReading::Transcript { text }),
                Script::Failure(message) => SensorEvent::Fault {
                    kind: SensorKind::Speech,
                    message,
                },
            };
            let _ = tx.send(event);
            running.store(false, Ordering::SeqCst);
        }));

        debug!("Speech session started");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            worker
                .join()
                .map_err(|_| Error::sensor_stop(self.name(), "worker thread panicked"))?;
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn drain(rx: &mpsc::Receiver<SensorEvent>) -> Vec<SensorEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.recv_timeout(Duration::from_secs(2)) {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_exactly_one_transcript_per_session() {
        let mut speech = ScriptedSpeech::new("midships");
        let (tx, rx) = mpsc::channel();

        speech.start(tx).unwrap();
        let events = drain(&rx);
        speech.stop().unwrap();

        assert_eq!(
            events,
            vec![SensorEvent::Reading(SensorReading::Transcript {
                text: "midships".to_string(),
            })]
        );
    }

    #[test]
    fn test_exactly_one_fault_per_session() {
        let mut speech = ScriptedSpeech::failing("microphone busy");
        let (tx, rx) = mpsc::channel();

        speech.start(tx).unwrap();
        let events = drain(&rx);
        speech.stop().unwrap();

        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            SensorEvent::Fault {
                kind: SensorKind::Speech,
                ..
            }
        ));
    }

    #[test]
    fn test_unsupported_platform() {
        let mut speech = ScriptedSpeech::unsupported();
        assert!(!speech.availability().is_available());

        let (tx, _rx) = mpsc::channel();
        let err = speech.start(tx).unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn test_sessions_can_repeat() {
        let mut speech = ScriptedSpeech::new("mayday mayday");

        for _ in 0..3 {
            let (tx, rx) = mpsc::channel();
            speech.start(tx).unwrap();
            assert_eq!(drain(&rx).len(), 1);
            speech.stop().unwrap();
        }
    }

    #[test]
    fn test_kind_and_name() {
        let speech = ScriptedSpeech::new("aye");
        assert_eq!(speech.kind(), SensorKind::Speech);
        assert_eq!(speech.name(), "scripted-speech");
    }
}
