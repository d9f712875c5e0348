use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::element::SubscriptionToken;
use crate::error::ChartResult;
use crate::render::Canvas;
use crate::sync;

use super::engine::Chart;
use super::kind::ChartKind;

#[derive(Debug, Default)]
struct CoordinatorState {
    in_flight: bool,
    pending: bool,
    dirty: bool,
}

/// Collapses measure requests: while a pass runs, any number of requests
/// turn into exactly one trailing pass.
#[derive(Debug, Default)]
pub struct MeasureCoordinator {
    state: Mutex<CoordinatorState>,
    coalesced: AtomicU64,
}

impl MeasureCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a request. Never runs a pass.
    pub fn invalidate(&self) {
        let mut state = sync::lock(&self.state);
        state.dirty = true;
        if state.in_flight {
            if state.pending {
                self.coalesced.fetch_add(1, Ordering::Relaxed);
            }
            state.pending = true;
        }
    }

    /// Claims the next pass. Returns `false` when one is already running,
    /// in which case a trailing pass is scheduled instead.
    pub fn begin(&self) -> bool {
        let mut state = sync::lock(&self.state);
        if state.in_flight {
            if state.pending {
                self.coalesced.fetch_add(1, Ordering::Relaxed);
            }
            state.pending = true;
            return false;
        }
        state.in_flight = true;
        state.pending = false;
        state.dirty = false;
        true
    }

    /// Ends a pass. Returns `true` when exactly one trailing pass must run;
    /// the caller keeps ownership of the pass in that case.
    pub fn finish(&self) -> bool {
        let mut state = sync::lock(&self.state);
        if state.pending {
            state.pending = false;
            state.dirty = false;
            return true;
        }
        state.in_flight = false;
        false
    }

    /// Releases a pass that failed. The request stays outstanding.
    pub fn abort(&self) {
        let mut state = sync::lock(&self.state);
        state.in_flight = false;
        state.pending = false;
        state.dirty = true;
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        sync::lock(&self.state).dirty
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        sync::lock(&self.state).in_flight
    }

    /// Requests folded into an already scheduled trailing pass.
    #[must_use]
    pub fn coalesced_requests(&self) -> u64 {
        self.coalesced.load(Ordering::Relaxed)
    }

    fn take_dirty(&self) {
        sync::lock(&self.state).dirty = false;
    }
}

/// A claimed pass. Dropping it before `release` (an error or a panic inside
/// the pass) aborts the pass so the next request can claim a new one.
struct PassClaim<'a> {
    coordinator: &'a MeasureCoordinator,
    released: bool,
}

impl<'a> PassClaim<'a> {
    fn new(coordinator: &'a MeasureCoordinator) -> Self {
        Self {
            coordinator,
            released: false,
        }
    }

    /// Called once `finish` has handed the pass back.
    fn release(mut self) {
        self.released = true;
    }
}

impl Drop for PassClaim<'_> {
    fn drop(&mut self) {
        if !self.released {
            if std::thread::panicking() {
                warn!("measure pass panicked; releasing the coordinator");
            }
            self.coordinator.abort();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// This call ran `passes` measure calls (one plus trailing passes).
    Completed { passes: u32 },
    /// A pass was already running; the request was folded into it.
    Coalesced,
}

/// Thread-safe driver of a [`Chart`].
///
/// Subscribes to the chart's view so that any change marks the chart dirty.
pub struct ChartController<K: ChartKind, C: Canvas> {
    chart: Mutex<Chart<K, C>>,
    coordinator: Arc<MeasureCoordinator>,
    lock_on_measure: bool,
    subscription: SubscriptionToken,
}

impl<K: ChartKind, C: Canvas> ChartController<K, C> {
    #[must_use]
    pub fn new(chart: Chart<K, C>) -> Self {
        let coordinator = Arc::new(MeasureCoordinator::new());
        let listener_coordinator = Arc::clone(&coordinator);
        let subscription = chart
            .view()
            .subscribe(Arc::new(move |_| listener_coordinator.invalidate()));
        let lock_on_measure = chart.config().lock_on_measure;
        coordinator.invalidate();
        Self {
            chart: Mutex::new(chart),
            coordinator,
            lock_on_measure,
            subscription,
        }
    }

    #[must_use]
    pub fn coordinator(&self) -> &Arc<MeasureCoordinator> {
        &self.coordinator
    }

    /// Locks the chart for reading results or driving it directly.
    pub fn chart(&self) -> MutexGuard<'_, Chart<K, C>> {
        sync::lock(&self.chart)
    }

    pub fn invalidate(&self) {
        self.coordinator.invalidate();
    }

    /// Measures now, or folds the request into the running pass.
    ///
    /// With `lock_on_measure` every call waits for the chart and runs its own
    /// pass.
    pub fn update(&self) -> ChartResult<UpdateOutcome> {
        if self.lock_on_measure {
            let mut chart = sync::lock(&self.chart);
            self.coordinator.take_dirty();
            chart.measure()?;
            return Ok(UpdateOutcome::Completed { passes: 1 });
        }

        if !self.coordinator.begin() {
            debug!("measure request coalesced into running pass");
            return Ok(UpdateOutcome::Coalesced);
        }
        let claim = PassClaim::new(&self.coordinator);
        let mut chart = sync::lock(&self.chart);
        let mut passes = 0;
        loop {
            passes += 1;
            chart.measure()?;
            if !self.coordinator.finish() {
                break;
            }
        }
        claim.release();
        if passes > 2 {
            warn!(passes, "chart kept invalidating itself while measuring");
        }
        Ok(UpdateOutcome::Completed { passes })
    }

    /// Runs `update` only when a request is outstanding.
    pub fn update_if_invalidated(&self) -> ChartResult<Option<UpdateOutcome>> {
        if !self.coordinator.is_dirty() {
            return Ok(None);
        }
        self.update().map(Some)
    }
}

impl<K: ChartKind, C: Canvas> Drop for ChartController<K, C> {
    fn drop(&mut self) {
        let chart = sync::lock(&self.chart);
        chart.view().unsubscribe(self.subscription);
    }
}
