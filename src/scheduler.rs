//! Periodic refresh of the store from a snapshot source.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use log::{debug, error, info, warn};

use crate::{
    errors::{FetchError, SnapshotErr},
    feed::SnapshotSource,
    snapshot::Snapshot,
    store::Store,
};

/// Time between the starts of two refresh cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10 * 60);
/// Longest the loop sleeps before checking for due work or shutdown again.
pub const DEFAULT_POLL: Duration = Duration::from_secs(30);

/// Asks a running [`Scheduler`] loop to stop. Cheap to clone and send to other threads.
#[derive(Clone, Debug, Default)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Stop the loop before its next cycle. A cycle already running is finished first.
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Has shutdown been requested?
    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// What happened during one refresh cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The store now holds the new snapshot.
    Refreshed {
        /// Number of stations stored
        stations: usize,
        /// Number of measurements stored
        measurements: usize,
    },
    /// Nothing was retrieved, the store still holds the previous snapshot.
    FetchFailed(FetchError),
    /// The replace did not commit, the store still holds the previous snapshot.
    PersistFailed(SnapshotErr),
}

impl CycleOutcome {
    /// True if the store was updated.
    pub fn is_refreshed(&self) -> bool {
        matches!(self, CycleOutcome::Refreshed { .. })
    }
}

/// Runs refresh cycles on a fixed interval.
///
/// The first cycle is due as soon as the scheduler is created. Each following one is due
/// `interval` after the previous one started. Cycles run on the caller's thread and take the
/// store mutably, so two can never overlap.
#[derive(Debug)]
pub struct Scheduler {
    interval: Duration,
    poll: Duration,
    next_run: Instant,
    cycles: u64,
    shutdown: ShutdownHandle,
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::new(DEFAULT_INTERVAL, DEFAULT_POLL)
    }
}

impl Scheduler {
    /// Create a scheduler with its first cycle due now.
    pub fn new(interval: Duration, poll: Duration) -> Self {
        Scheduler {
            interval,
            poll,
            next_run: Instant::now(),
            cycles: 0,
            shutdown: ShutdownHandle::default(),
        }
    }

    /// A handle that stops [`run`](Scheduler::run).
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// When the next cycle is due.
    pub fn next_run(&self) -> Instant {
        self.next_run
    }

    /// Number of cycles started so far, successful or not.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Is a cycle due at `now`?
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_run
    }

    /// Run a cycle if one is due at `now`, and schedule the next one.
    pub fn run_pending<S>(
        &mut self,
        now: Instant,
        source: &mut S,
        store: &mut Store,
    ) -> Option<CycleOutcome>
    where
        S: SnapshotSource + ?Sized,
    {
        if !self.is_due(now) {
            return None;
        }

        self.next_run = now + self.interval;
        Some(self.run_cycle(source, store))
    }

    /// Fetch a snapshot and replace the store contents with it.
    ///
    /// Failures are logged and reported in the outcome, they never leave a partial snapshot.
    pub fn run_cycle<S>(&mut self, source: &mut S, store: &mut Store) -> CycleOutcome
    where
        S: SnapshotSource + ?Sized,
    {
        self.cycles += 1;
        let cycle = self.cycles;
        info!("Refresh cycle {} started.", cycle);

        let snapshot = match source
            .fetch_snapshot()
            .and_then(|payload| Snapshot::from_payload(&payload))
        {
            Ok(snapshot) => {
                if snapshot.is_empty() {
                    warn!(
                        "Refresh cycle {} got no stations, the store will be emptied.",
                        cycle
                    );
                }
                snapshot
            }
            Err(err) => {
                error!(
                    "Refresh cycle {} skipped, keeping previous snapshot: {}",
                    cycle, err
                );
                return CycleOutcome::FetchFailed(err);
            }
        };

        match store.replace(&snapshot) {
            Ok(()) => {
                info!("Refresh cycle {} finished.", cycle);
                CycleOutcome::Refreshed {
                    stations: snapshot.stations.len(),
                    measurements: snapshot.measurements.len(),
                }
            }
            Err(err) => {
                error!(
                    "Refresh cycle {} could not store snapshot, keeping previous one: {}",
                    cycle, err
                );
                CycleOutcome::PersistFailed(err)
            }
        }
    }

    /// Refresh forever, or until shutdown is requested.
    ///
    /// `on_refresh` is called with the store after every successful cycle. Shutdown is checked
    /// between cycles and at least once per poll interval.
    pub fn run<S, F>(&mut self, source: &mut S, store: &mut Store, mut on_refresh: F)
    where
        S: SnapshotSource + ?Sized,
        F: FnMut(&Store),
    {
        info!(
            "Refreshing every {:?}, checking every {:?}.",
            self.interval, self.poll
        );

        while !self.shutdown.is_shutdown() {
            if let Some(outcome) = self.run_pending(Instant::now(), source, store) {
                if outcome.is_refreshed() {
                    on_refresh(store);
                }
            }

            let wait = self
                .next_run
                .saturating_duration_since(Instant::now())
                .min(self.poll);
            if !wait.is_zero() && !self.shutdown.is_shutdown() {
                debug!("Sleeping {:?}.", wait);
                thread::sleep(wait);
            }
        }

        info!("Refresh loop stopped after {} cycles.", self.cycles);
    }
}
