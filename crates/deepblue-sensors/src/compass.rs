//! Scripted compass heading source.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use deepblue::error::{Error, Result};
use deepblue::sensors::{Availability, SensorEvent, SensorKind, SensorReading, SensorSource};

/// Default delay between scripted heading updates.
const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// A compass source that plays back a fixed heading sequence.
///
/// Each started session walks the script once from the beginning, emitting
/// one [`SensorReading::Heading`] per entry, and goes idle when the script
/// is exhausted or the source is stopped.
#[derive(Debug)]
pub struct ScriptedCompass {
    headings: Vec<f64>,
    interval: Duration,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ScriptedCompass {
    /// Create a compass that will play back the given headings.
    #[must_use]
    pub fn new(headings: Vec<f64>) -> Self {
        Self {
            headings,
            interval: DEFAULT_INTERVAL,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Set the delay between heading updates.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl SensorSource for ScriptedCompass {
    fn name(&self) -> &'static str {
        "scripted-compass"
    }

    fn kind(&self) -> SensorKind {
        SensorKind::Compass
    }

    fn availability(&self) -> Availability {
        if self.headings.is_empty() {
            Availability::unavailable("no heading script loaded")
        } else {
            Availability::Available
        }
    }

    fn start(&mut self, tx: mpsc::Sender<SensorEvent>) -> Result<()> {
        if let Availability::Unavailable { reason } = self.availability() {
            return Err(Error::sensor_start(self.name(), reason));
        }
        if self.is_running() {
            return Err(Error::sensor_start(self.name(), "already running"));
        }

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let headings = self.headings.clone();
        let interval = self.interval;

        self.worker = Some(std::thread::spawn(move || {
            for degrees in headings {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                if tx
                    .send(SensorEvent::Reading(SensorReading::Heading { degrees }))
                    .is_err()
                {
                    // Receiver gone; nothing left to deliver to.
                    break;
                }
                std::thread::sleep(interval);
            }
            running.store(false, Ordering::SeqCst);
        }));

        debug!("Scripted compass started");
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

    #[test]
    fn test_availability_requires_script() {
        let empty = ScriptedCompass::new(Vec::new());
        assert!(!empty.availability().is_available());

        let loaded = ScriptedCompass::new(vec![10.0]);
        assert!(loaded.availability().is_available());
    }

    #[test]
    fn test_plays_back_all_headings() {
        let mut compass = ScriptedCompass::new(vec![10.0, 20.0, 350.5])
            .with_interval(Duration::from_millis(1));
        let (tx, rx) = mpsc::channel();

        compass.start(tx).unwrap();

        let mut degrees = Vec::new();
        while let Ok(event) = rx.recv_timeout(Duration::from_secs(2)) {
            if let SensorEvent::Reading(SensorReading::Heading { degrees: d }) = event {
                degrees.push(d);
            }
        }
        compass.stop().unwrap();

        assert_eq!(degrees, vec![10.0, 20.0, 350.5]);
        assert!(!compass.is_running());
    }

    #[test]
    fn test_start_twice_fails() {
        let mut compass =
            ScriptedCompass::new(vec![0.0; 64]).with_interval(Duration::from_millis(10));
        let (tx, _rx) = mpsc::channel();

        compass.start(tx.clone()).unwrap();
        let err = compass.start(tx).unwrap_err();
        assert!(err.to_string().contains("already running"));

        compass.stop().unwrap();
    }

    #[test]
    fn test_start_unavailable_fails() {
        let mut compass = ScriptedCompass::new(Vec::new());
        let (tx, _rx) = mpsc::channel();

        let err = compass.start(tx).unwrap_err();
        assert!(err.to_string().contains("no heading script"));
    }

    #[test]
    fn test_stop_interrupts_playback() {
        let mut compass =
            ScriptedCompass::new(vec![0.0; 1000]).with_interval(Duration::from_millis(5));
        let (tx, rx) = mpsc::channel();

        compass.start(tx).unwrap();
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        compass.stop().unwrap();

        assert!(!compass.is_running());
        // The full script never made it out.
        let delivered = 1 + rx.try_iter().count();
        assert!(delivered < 1000);
    }

    #[test]
    fn test_stop_when_not_running_is_noop() {
        let mut compass = ScriptedCompass::new(vec![1.0]);
        assert!(compass.stop().is_ok());
    }

    #[test]
    fn test_kind_and_name() {
        let compass = ScriptedCompass::new(vec![1.0]);
        assert_eq!(compass.kind(), SensorKind::Compass);
        assert_eq!(compass.name(), "scripted-compass");
    }
}
