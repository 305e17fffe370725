//! Scheduled weather poller.
//!
//! ```text
//! Idle ──run()──▶ Running ──shutdown──▶ ShuttingDown ──▶ Stopped
//!                   │  ▲
//!                   └──┘ timer tick: one poll cycle
//! ```
//!
//! One poll cycle runs immediately on entering `Running`, then one per
//! interval tick. While waiting, the driver selects over exactly two event
//! sources: the interval timer and the shutdown future. The select is biased
//! toward shutdown, and a cycle in progress is never interrupted; shutdown is
//! only observed between cycles.

use crate::error::PollError;
use crate::outputs::WeatherSink;
use crate::sources::WeatherSource;
use std::future::Future;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    ShuttingDown,
    Stopped,
}

/// Outcome of one pass over every configured location.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Locations whose rows were persisted, with the row count.
    pub saved: Vec<(String, usize)>,
    /// Locations skipped this cycle and why.
    pub failed: Vec<(String, PollError)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerReport {
    pub cycles: u64,
}

pub struct SchedulerDriver<S, P> {
    source: S,
    sink: P,
    locations: Vec<String>,
    interval: Duration,
    state: SchedulerState,
}

impl<S, P> SchedulerDriver<S, P>
where
    S: WeatherSource,
    P: WeatherSink,
{
    pub fn new(source: S, sink: P, locations: Vec<String>, interval: Duration) -> Self {
        Self {
            source,
            sink,
            locations,
            interval,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    fn transition(&mut self, next: SchedulerState) {
        debug!(from = ?self.state, to = ?next, "Scheduler state change");
        self.state = next;
    }

    /// Poll until `shutdown` resolves.
    ///
    /// `shutdown` is polled only while waiting for the next tick; if it is
    /// already complete when a cycle finishes, no further cycle starts.
    #[instrument(level = "info", skip_all, fields(interval = ?self.interval, locations = self.locations.len()))]
    pub async fn run<F>(&mut self, shutdown: F) -> SchedulerReport
    where
        F: Future<Output = ()>,
    {
        self.transition(SchedulerState::Running);
        info!("Weather poller started");

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately and stands for the eager cycle.
        ticker.tick().await;

        let mut cycles = 0u64;
        self.poll_cycle().await;
        cycles += 1;

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.poll_cycle().await;
                    cycles += 1;
                }
            }
        }

        self.transition(SchedulerState::ShuttingDown);
        drop(ticker);
        self.transition(SchedulerState::Stopped);
        info!(cycles, state = ?self.state(), "Weather poller stopped");

        SchedulerReport { cycles }
    }

    /// Fetch and persist every location once. A failing location is logged
    /// and skipped; it never aborts the rest of the cycle.
    pub async fn poll_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for location in &self.locations {
            match self.poll_location(location).await {
                Ok(rows) => {
                    info!(%location, rows, "Weather data saved");
                    report.saved.push((location.clone(), rows));
                }
                Err(e) => {
                    error!(%location, error = %e, "Weather poll failed");
                    report.failed.push((location.clone(), e));
                }
            }
        }

        debug!(
            saved = report.saved.len(),
            failed = report.failed.len(),
            "Poll cycle complete"
        );
        report
    }

    async fn poll_location(&self, location: &str) -> Result<usize, PollError> {
        let record = self.source.fetch(location).await?;
        let rows = self.sink.persist(&record).await?;
        Ok(rows)
    }
}
