//! Optional sensor capability layer.
//!
//! Shipboard sensor feeds (compass heading, position fix, speech
//! transcription) are best-effort capabilities: a platform may simply not
//! have one. This module models them as typed sources with an explicit
//! availability query and an explicit start/stop lifecycle, so consumers
//! branch on a typed answer instead of probing for an ambient feature.
//!
//! Absence of a capability is a soft failure throughout: an unavailable
//! source reports [`Availability::Unavailable`] and is skipped, it never
//! aborts the caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use crate::error::Result;

/// The kind of sensor behind a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Magnetic or gyro compass heading stream.
    Compass,
    /// Geographic position fix.
    Position,
    /// Speech-to-text transcription.
    Speech,
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compass => write!(f, "compass"),
            Self::Position => write!(f, "position"),
            Self::Speech => write!(f, "speech"),
        }
    }
}

/// Whether a sensor capability is usable on this platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// The capability can be started.
    Available,
    /// The capability is missing or blocked.
    Unavailable {
        /// Why the capability cannot be used.
        reason: String,
    },
}

impl Availability {
    /// Create an unavailable state with a reason.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Whether the capability can be started.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// A single sensor observation.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorReading {
    /// Compass heading in degrees, 0..360, clockwise from north.
    Heading {
        /// Heading in degrees.
        degrees: f64,
    },
    /// A geographic position fix.
    Position {
        /// Latitude in degrees.
        latitude: f64,
        /// Longitude in degrees.
        longitude: f64,
    },
    /// A recognized speech transcript.
    Transcript {
        /// The transcribed text.
        text: String,
    },
}

/// An event delivered from a running sensor source.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorEvent {
    /// A successful observation.
    Reading(SensorReading),
    /// The source failed mid-session.
    Fault {
        /// Which sensor faulted.
        kind: SensorKind,
        /// Description of the failure.
        message: String,
    },
}

/// A source of sensor events with an explicit lifecycle.
///
/// Implementors deliver events through the channel handed to [`start`] and
/// keep delivering until [`stop`] is called or the source finishes on its
/// own. One-shot sources (speech) deliver exactly one `Reading` or one
/// `Fault` per started session, then go idle.
///
/// [`start`]: SensorSource::start
/// [`stop`]: SensorSource::stop
pub trait SensorSource: Send {
    /// The name of this source (for logging/debugging).
    fn name(&self) -> &'static str;

    /// The kind of sensor this source reads.
    fn kind(&self) -> SensorKind;

    /// Whether this source can be started on this platform.
    fn availability(&self) -> Availability;

    /// Start the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is unavailable, already running, or
    /// fails to start.
    fn start(&mut self, tx: mpsc::Sender<SensorEvent>) -> Result<()>;

    /// Stop the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails to stop cleanly.
    fn stop(&mut self) -> Result<()>;

    /// Check if the source is currently running.
    fn is_running(&self) -> bool;
}

/// A lightweight, cloneable stop signal shared with a running source.
#[derive(Debug, Clone)]
pub struct SensorHandle {
    kind: SensorKind,
    stop_signal: Arc<AtomicBool>,
}

impl SensorHandle {
    /// Create a new handle for a sensor kind.
    #[must_use]
    pub fn new(kind: SensorKind) -> Self {
        Self {
            kind,
            stop_signal: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The sensor kind this handle controls.
    #[must_use]
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Signal the source to stop.
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Check if the stop signal has been sent.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stop_signal.load(Ordering::SeqCst)
    }

    /// Reset the stop signal so the source can be started again.
    pub fn reset(&self) {
        self.stop_signal.store(false, Ordering::SeqCst);
    }
}

/// A collection of sensor handles that can be stopped together.
#[derive(Debug, Default)]
pub struct SensorManager {
    handles: Vec<SensorHandle>,
}

impl SensorManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a handle.
    pub fn add(&mut self, handle: SensorHandle) {
        self.handles.push(handle);
    }

    /// Signal every tracked source to stop.
    pub fn stop_all(&self) {
        for handle in &self.handles {
            handle.stop();
        }
    }

    /// Number of tracked handles.
    #[must_use]
    pub fn count(&self) -> usize {
        self.handles.len()
    }

    /// Whether any tracked source has not been signaled to stop.
    #[must_use]
    pub fn any_running(&self) -> bool {
        self.handles.iter().any(|h| !h.should_stop())
    }
}
