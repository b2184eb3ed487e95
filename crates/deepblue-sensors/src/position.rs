//! Single best-effort position fix source.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::debug;

use deepblue::error::{Error, Result};
use deepblue::sensors::{Availability, SensorEvent, SensorKind, SensorReading, SensorSource};

/// Fallback anchorage used when no fix is configured (Huangpu River mouth).
const DEFAULT_LATITUDE: f64 = 31.2304;
const DEFAULT_LONGITUDE: f64 = 121.4737;

/// A position source that delivers exactly one fix per started session.
///
/// Models a best-effort single coordinate fetch: one
/// [`SensorReading::Position`] and the session is over. A denied or absent
/// positioning capability is expressed through [`Availability`], not an
/// error at read time.
#[derive(Debug)]
pub struct SinglePositionFix {
    latitude: f64,
    longitude: f64,
    denied: Option<String>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SinglePositionFix {
    /// Create a source that will report the given coordinates.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            denied: None,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Create a source whose capability has been denied or is absent.
    #[must_use]
    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            denied: Some(reason.into()),
            ..Self::default()
        }
    }
}

impl Default for SinglePositionFix {
    fn default() -> Self {
        Self::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE)
    }
}

impl SensorSource for SinglePositionFix {
    fn name(&self) -> &'static str {
        "single-position-fix"
    }

    fn kind(&self) -> SensorKind {
        SensorKind::Position
    }

    fn availability(&self) -> Availability {
        match &self.denied {
            Some(reason) => Availability::unavailable(reason.clone()),
            None => Availability::Available,
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
        let (latitude, longitude) = (self.latitude, self.longitude);

        self.worker = Some(std::thread::spawn(move || {
            let _ = tx.send(SensorEvent::Reading(SensorReading::Position {
                latitude,
                longitude,
            }));
            running.store(false, Ordering::SeqCst);
        }));

        debug!(latitude, longitude, "Position fix dispatched");
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

    #[test]
    fn test_delivers_exactly_one_fix() {
        let mut source = SinglePositionFix::new(53.55, 9.99);
        let (tx, rx) = mpsc::channel();

        source.start(tx).unwrap();

        let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(
            event,
            SensorEvent::Reading(SensorReading::Position {
                latitude: 53.55,
                longitude: 9.99,
            })
        );

        // Session is over: channel closes with no second event.
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_err());
        source.stop().unwrap();
        assert!(!source.is_running());
    }

    #[test]
    fn test_default_fix() {
        let source = SinglePositionFix::default();
        assert!(source.availability().is_available());
        assert_eq!(source.kind(), SensorKind::Position);
    }

    #[test]
    fn test_denied_capability() {
        let source = SinglePositionFix::denied("position permission not granted");
        assert!(!source.availability().is_available());
    }

    #[test]
    fn test_start_denied_fails_softly() {
        let mut source = SinglePositionFix::denied("no receiver fitted");
        let (tx, rx) = mpsc::channel();

        let err = source.start(tx).unwrap_err();
        assert!(err.to_string().contains("no receiver fitted"));
        // Nothing was delivered.
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_can_restart_after_session() {
        let mut source = SinglePositionFix::new(1.0, 2.0);

        for _ in 0..2 {
            let (tx, rx) = mpsc::channel();
            source.start(tx).unwrap();
            assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
            source.stop().unwrap();
        }
    }
}
