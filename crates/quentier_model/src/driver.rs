//! Feeding storage events into models outside a GUI event loop.

use crate::backend::StorageEvent;
use crate::model::FavoritesModel;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::warn;

/// Something that consumes storage events and tracks its own requests.
pub trait EventSink {
    fn apply_event(&mut self, event: StorageEvent);

    /// Requests sent but not yet answered.
    fn pending_requests(&self) -> usize;

    fn is_idle(&self) -> bool {
        self.pending_requests() == 0
    }
}

impl EventSink for FavoritesModel {
    fn apply_event(&mut self, event: StorageEvent) {
        FavoritesModel::apply_event(self, event);
    }

    fn pending_requests(&self) -> usize {
        FavoritesModel::pending_requests(self)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("timed out with {pending} storage requests outstanding")]
    Timeout { pending: usize },

    #[error("storage worker stopped")]
    Disconnected,
}

/// Apply every event already queued, without waiting.
///
/// # Returns
/// The number of events applied.
pub fn drain_ready<S: EventSink>(evt_rx: &Receiver<StorageEvent>, sink: &mut S) -> usize {
    let mut applied = 0;
    while let Ok(event) = evt_rx.try_recv() {
        sink.apply_event(event);
        applied += 1;
    }
    applied
}

/// Apply events until `sink` has no outstanding request, then drain whatever
/// else is queued.
///
/// Follow-up requests a handler sends keep the loop going, so a paged listing
/// or a rename with its compensating fetch completes in one call.
///
/// # Returns
/// The number of events applied.
///
/// # Errors
/// Returns [`DriverError::Timeout`] if `timeout` elapses first, or
/// [`DriverError::Disconnected`] if the worker has stopped.
pub fn pump_until_idle<S: EventSink>(
    evt_rx: &Receiver<StorageEvent>,
    sink: &mut S,
    timeout: Duration,
) -> Result<usize, DriverError> {
    let deadline = Instant::now() + timeout;
    let mut applied = 0;
    while !sink.is_idle() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match evt_rx.recv_timeout(remaining) {
            Ok(event) => {
                sink.apply_event(event);
                applied += 1;
            }
            Err(RecvTimeoutError::Timeout) => {
                let pending = sink.pending_requests();
                warn!(pending, "storage requests still outstanding");
                return Err(DriverError::Timeout { pending });
            }
            Err(RecvTimeoutError::Disconnected) => return Err(DriverError::Disconnected),
        }
    }
    Ok(applied + drain_ready(evt_rx, sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RequestId;
    use crossbeam_channel::unbounded;
    use quentier_core::models::Tag;

    #[derive(Default)]
    struct Counter {
        outstanding: usize,
        seen: usize,
    }

    impl EventSink for Counter {
        fn apply_event(&mut self, _event: StorageEvent) {
            self.seen += 1;
            self.outstanding = self.outstanding.saturating_sub(1);
        }

        fn pending_requests(&self) -> usize {
            self.outstanding
        }
    }

    fn added() -> StorageEvent {
        StorageEvent::Added {
            request_id: RequestId::new(),
            entity: Tag::new("t".to_string()).into(),
        }
    }

    #[test]
    fn pump_stops_when_idle_and_drains_the_rest() {
        let (tx, rx) = unbounded();
        for _ in 0..3 {
            tx.send(added()).expect("send");
        }
        let mut sink = Counter {
            outstanding: 1,
            ..Counter::default()
        };
        let applied = pump_until_idle(&rx, &mut sink, Duration::from_secs(1)).expect("pump");
        assert_eq!(applied, 3);
        assert_eq!(sink.seen, 3);
    }

    #[test]
    fn pump_times_out_with_requests_outstanding() {
        let (_tx, rx) = unbounded::<StorageEvent>();
        let mut sink = Counter {
            outstanding: 2,
            ..Counter::default()
        };
        let err = pump_until_idle(&rx, &mut sink, Duration::from_millis(20)).expect_err("timeout");
        assert_eq!(err, DriverError::Timeout { pending: 2 });
    }

    #[test]
    fn pump_reports_a_stopped_worker() {
        let (tx, rx) = unbounded::<StorageEvent>();
        drop(tx);
        let mut sink = Counter {
            outstanding: 1,
            ..Counter::default()
        };
        assert_eq!(
            pump_until_idle(&rx, &mut sink, Duration::from_secs(1)),
            Err(DriverError::Disconnected)
        );
    }
}
