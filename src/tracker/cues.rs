use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    event::CueEvent,
    offset::{CueOffset, CueOffsets, CueThreshold},
    scheduler::Scheduler,
    source::PlaybackSource,
};

// -------------------------------------------------------------------------------------------------

/// Callback of a cue point, shared by all cues which got added in one go.
pub(crate) type CueHandler = Arc<dyn Fn(CueEvent) + Send + Sync>;

// -------------------------------------------------------------------------------------------------

/// Snapshot of a single cue point's state, as returned by [`CueTracker::cues`](crate::CueTracker::cues).
#[derive(Debug, Clone, PartialEq)]
pub struct CueStatus {
    /// The cue's offset, exactly as it got added.
    pub offset: CueOffset,
    /// True when the cue fired since it got added or the tracker got reset.
    pub triggered: bool,
    /// False when the tracker got disabled.
    pub enabled: bool,
}

// -------------------------------------------------------------------------------------------------

struct CueRecord {
    offset: CueOffset,
    threshold: CueThreshold,
    handler: CueHandler,
    triggered: bool,
    enabled: bool,
}

impl CueRecord {
    fn new(offset: CueOffset, handler: CueHandler) -> Self {
        let threshold = offset.threshold();
        Self {
            offset,
            threshold,
            handler,
            triggered: false,
            enabled: true,
        }
    }

    #[inline]
    fn can_trigger(&self) -> bool {
        self.enabled && !self.triggered
    }

    /// Mark the cue as triggered when the playback position reached its threshold.
    /// Returns the handler invocation which then should be scheduled.
    fn try_trigger(&mut self, current_time: f64, duration: f64) -> Option<(CueHandler, CueEvent)> {
        if self.threshold.is_reached(current_time, duration) {
            self.triggered = true;
            let event = CueEvent {
                offset: self.offset.clone(),
            };
            Some((Arc::clone(&self.handler), event))
        } else {
            None
        }
    }

    fn status(&self) -> CueStatus {
        CueStatus {
            offset: self.offset.clone(),
            triggered: self.triggered,
            enabled: self.enabled,
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Ordered list of cue records, shared by a tracker and its playback listener.
pub(crate) struct CueList {
    tracker_id: usize,
    records: Mutex<Vec<CueRecord>>,
}

impl CueList {
    pub fn new(tracker_id: usize) -> Self {
        Self {
            tracker_id,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, offsets: CueOffsets, handler: CueHandler) {
        let mut records = self.records();
        for offset in offsets {
            let record = CueRecord::new(offset, Arc::clone(&handler));
            if record.threshold.is_malformed() {
                log::debug!(
                    "Cue tracker #{}: offset '{}' is malformed and will never trigger",
                    self.tracker_id,
                    record.offset
                );
            }
            records.push(record);
        }
    }

    pub fn remove(&self, offsets: &CueOffsets) {
        self.records()
            .retain(|record| !offsets.contains(&record.offset));
    }

    pub fn clear(&self) {
        self.records().clear();
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn offsets(&self) -> Vec<CueOffset> {
        self.records()
            .iter()
            .map(|record| record.offset.clone())
            .collect()
    }

    pub fn statuses(&self) -> Vec<CueStatus> {
        self.records().iter().map(CueRecord::status).collect()
    }

    pub fn set_enabled(&self, enabled: bool) {
        for record in self.records().iter_mut() {
            record.enabled = enabled;
        }
    }

    pub fn reset(&self) {
        for record in self.records().iter_mut() {
            record.triggered = false;
        }
    }

    /// Trigger all enabled, not yet triggered cues whose threshold got reached by the source's
    /// current playback position, then schedule their handlers.
    pub fn evaluate(&self, source: &dyn PlaybackSource, scheduler: &dyn Scheduler) {
        let current_time = source.current_time();
        let duration = source.duration();

        // all cues get marked before any handler gets scheduled
        let triggered = self
            .records()
            .iter_mut()
            .filter(|record| record.can_trigger())
            .filter_map(|record| record.try_trigger(current_time, duration))
            .collect::<Vec<_>>();

        for (handler, event) in triggered {
            let offset = event.offset.clone();
            log::debug!(
                "Cue tracker #{}: triggering cue '{}' at {:.3}s",
                self.tracker_id,
                offset,
                current_time
            );
            if let Err(err) = scheduler.schedule(Box::new(move || handler(event))) {
                log::warn!(
                    "Cue tracker #{}: failed to schedule handler of cue '{}': {}",
                    self.tracker_id,
                    offset,
                    err
                );
            }
        }
    }

    fn records(&self) -> MutexGuard<'_, Vec<CueRecord>> {
        // records are never left half-modified, so a poisoned lock is still usable
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
