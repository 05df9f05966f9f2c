//! Fetch cadence for one feed source.
//!
//! A cycle walks `Idle -> Fetching -> Decoding -> Normalizing -> Publishing`
//! and back to `Idle`, whatever its outcome. The reconciler sits behind an
//! async mutex that is only ever `try_lock`ed: holding it is what makes a
//! cycle in flight, and a trigger that finds it held is skipped. Manual
//! refreshes go through a [`Notify`], which stores at most one pending
//! permit, so a burst of requests during a cycle collapses into one follow-up
//! cycle.
//!
//! Two snapshots are published: every normalized vehicle of the last good
//! cycle ([`FeedPoller::vehicles`]) and the reconciled live set, which only
//! holds vehicles with a usable position ([`FeedPoller::snapshot`]).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, watch, Mutex, Notify};
use tokio::time::MissedTickBehavior;

use crate::api::FeedSource;
use crate::config::Config;
use crate::decoder::{self, FeedSchema};
use crate::error::{FetchError, PollError};
use crate::normalizer::VehicleNormalizer;
use crate::presenter::Presenter;
use crate::reconciler::{Snapshot, VehicleDiff, VehicleSetReconciler};

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PollState {
    Idle,
    Fetching,
    Decoding,
    Normalizing,
    Publishing,
}

/// Counts from one successful cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub live: usize,
}

impl CycleSummary {
    fn new(diff: &VehicleDiff, live: usize) -> Self {
        Self {
            added: diff.added.len(),
            updated: diff.updated.len(),
            removed: diff.removed.len(),
            live,
        }
    }
}

/// What subscribers hear after every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    Reconciled { cycle: u64, summary: CycleSummary },
    Failed { cycle: u64, error: PollError },
}

/// Result of asking for a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Reconciled(CycleSummary),
    Failed(PollError),
    /// Another cycle was in flight, nothing was fetched.
    Skipped,
}

/// Observable progress of the poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollStatus {
    pub state: PollState,
    pub cycles: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_success: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl Default for PollStatus {
    fn default() -> Self {
        Self {
            state: PollState::Idle,
            cycles: 0,
            last_success: None,
            last_error: None,
        }
    }
}

pub struct FeedPoller<S, P: Presenter> {
    source: S,
    schema: FeedSchema,
    normalizer: VehicleNormalizer,
    interval: Duration,
    fetch_timeout: Duration,
    reconciler: Mutex<VehicleSetReconciler<P>>,
    snapshot: watch::Receiver<Snapshot>,
    vehicles: watch::Sender<Snapshot>,
    status: watch::Sender<PollStatus>,
    events: broadcast::Sender<PollEvent>,
    refresh: Arc<Notify>,
    cycles: AtomicU64,
}

impl<S, P> FeedPoller<S, P>
where
    S: FeedSource,
    P: Presenter,
{
    pub fn new(source: S, presenter: P, config: &Config) -> Self {
        let reconciler = VehicleSetReconciler::new(presenter);
        let snapshot = reconciler.subscribe();
        let (vehicles, _) = watch::channel(Arc::new(Vec::new()));
        let (status, _) = watch::channel(PollStatus::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            source,
            schema: FeedSchema::default(),
            normalizer: VehicleNormalizer::new(config.rail_route_threshold),
            interval: config.poll_interval,
            fetch_timeout: config.fetch_timeout,
            reconciler: Mutex::new(reconciler),
            snapshot,
            vehicles,
            status,
            events,
            refresh: Arc::new(Notify::new()),
            cycles: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Vehicles in the live registry, empty until the first successful cycle.
    pub fn snapshot(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.clone()
    }

    /// Every normalized vehicle of the last successful cycle, placed or not.
    pub fn vehicles(&self) -> watch::Receiver<Snapshot> {
        self.vehicles.subscribe()
    }

    pub fn status(&self) -> watch::Receiver<PollStatus> {
        self.status.subscribe()
    }

    pub fn state(&self) -> PollState {
        self.status.borrow().state
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PollEvent> {
        self.events.subscribe()
    }

    /// Handle for requesting an out-of-schedule cycle from [`run`](Self::run).
    pub fn refresh_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.refresh)
    }

    pub fn request_refresh(&self) {
        self.refresh.notify_one();
    }

    /// Poll forever on the configured interval and on refresh requests.
    ///
    /// A tick that comes due while a cycle is still running is dropped, not
    /// queued.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            source = self.source.describe(),
            interval_secs = self.interval.as_secs_f64(),
            "Starting polling loop"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = self.refresh.notified() => {
                    tracing::debug!("Manual refresh requested");
                }
            }
            self.poll_once().await;
        }
    }

    /// Run one cycle unless one is already in flight.
    pub async fn poll_once(&self) -> PollOutcome {
        let Ok(mut reconciler) = self.reconciler.try_lock() else {
            tracing::debug!("Poll already in flight, skipping");
            return PollOutcome::Skipped;
        };

        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let result = self.cycle(&mut reconciler).await;

        match result {
            Ok(summary) => {
                tracing::info!(
                    cycle,
                    live = summary.live,
                    added = summary.added,
                    updated = summary.updated,
                    removed = summary.removed,
                    "Poll complete"
                );
                self.status.send_modify(|status| {
                    status.state = PollState::Idle;
                    status.cycles = cycle;
                    status.last_success = Some(Utc::now());
                    status.last_error = None;
                });
                let _ = self.events.send(PollEvent::Reconciled { cycle, summary });
                PollOutcome::Reconciled(summary)
            }
            Err(error) => {
                tracing::warn!(cycle, stage = error.stage(), %error, "Poll failed, will retry on next interval");
                self.status.send_modify(|status| {
                    status.state = PollState::Idle;
                    status.cycles = cycle;
                    status.last_error = Some(error.to_string());
                });
                let _ = self.events.send(PollEvent::Failed {
                    cycle,
                    error: error.clone(),
                });
                PollOutcome::Failed(error)
            }
        }
    }

    async fn cycle(&self, reconciler: &mut VehicleSetReconciler<P>) -> Result<CycleSummary, PollError> {
        self.enter(PollState::Fetching);
        let bytes = tokio::time::timeout(self.fetch_timeout, self.source.fetch())
            .await
            .map_err(|_| FetchError::Timeout(self.fetch_timeout))??;

        self.enter(PollState::Decoding);
        let feed = decoder::decode(&bytes, self.schema)?;

        self.enter(PollState::Normalizing);
        let records = self.normalizer.normalize(&feed.entities)?;

        self.enter(PollState::Publishing);
        let normalized = Arc::new(records.clone());
        let diff = reconciler.reconcile(records)?;
        self.vehicles.send_replace(normalized);

        Ok(CycleSummary::new(&diff, reconciler.registry().len()))
    }

    fn enter(&self, state: PollState) {
        tracing::trace!(?state, "Poll state");
        self.status.send_modify(|status| status.state = state);
    }
}
