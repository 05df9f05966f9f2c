//! Consumers of reconciliation actions.

use chrono::{DateTime, Utc};

use crate::models::VehicleRecord;

/// Receives incremental vehicle changes and owns one handle per live vehicle.
///
/// The handle is created on `on_added`, passed back on every update and
/// handed over on removal, mirroring a map marker's lifetime.
pub trait Presenter: Send {
    type Handle: Send;

    fn on_added(&mut self, record: &VehicleRecord) -> Self::Handle;

    fn on_updated(&mut self, handle: &mut Self::Handle, record: &VehicleRecord);

    fn on_removed(&mut self, id: &str, handle: Self::Handle);
}

/// Per-vehicle bookkeeping kept by [`LogPresenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sighting {
    pub first_seen: DateTime<Utc>,
    pub updates: u64,
}

/// Presenter that reports vehicle changes through `tracing`.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    type Handle = Sighting;

    fn on_added(&mut self, record: &VehicleRecord) -> Sighting {
        tracing::debug!(id = %record.id, vehicle = %record, "Vehicle appeared");
        tracing::trace!(id = %record.id, summary = %record.summary());
        Sighting {
            first_seen: Utc::now(),
            updates: 0,
        }
    }

    fn on_updated(&mut self, handle: &mut Sighting, record: &VehicleRecord) {
        handle.updates += 1;
        tracing::trace!(
            id = %record.id,
            updates = handle.updates,
            summary = %record.summary(),
            "Vehicle updated"
        );
    }

    fn on_removed(&mut self, id: &str, handle: Sighting) {
        let tracked_for = Utc::now() - handle.first_seen;
        tracing::debug!(
            id,
            updates = handle.updates,
            tracked_secs = tracked_for.num_seconds(),
            "Vehicle left the feed"
        );
    }
}

/// Presenter that does nothing, for callers that only read snapshots.
#[derive(Debug, Default)]
pub struct NoopPresenter;

impl Presenter for NoopPresenter {
    type Handle = ();

    fn on_added(&mut self, _record: &VehicleRecord) {}

    fn on_updated(&mut self, _handle: &mut (), _record: &VehicleRecord) {}

    fn on_removed(&mut self, _id: &str, _handle: ()) {}
}
