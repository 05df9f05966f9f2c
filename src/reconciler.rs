//! Keeps the live vehicle set in step with each new snapshot.
//!
//! Reconciliation is split in two: [`diff`] is a pure function of the
//! registry and the new records, and [`LiveRegistry::apply`] mutates the
//! registry and drives a [`Presenter`]. [`VehicleSetReconciler`] owns both
//! halves and publishes a full snapshot to readers after every apply, so a
//! reader sees either the old set or the new one.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::ReconcileError;
use crate::models::VehicleRecord;
use crate::presenter::Presenter;

/// Snapshot of the live set as handed to readers.
pub type Snapshot = Arc<Vec<VehicleRecord>>;

/// Actions that turn the previous live set into the new one.
///
/// Each list is sorted by vehicle id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VehicleDiff {
    pub added: Vec<VehicleRecord>,
    pub updated: Vec<VehicleRecord>,
    pub removed: Vec<String>,
}

impl VehicleDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug)]
pub struct RegistryEntry<H> {
    pub record: VehicleRecord,
    pub handle: H,
}

/// Vehicles currently shown, with the presenter's handle for each.
#[derive(Debug)]
pub struct LiveRegistry<H> {
    entries: HashMap<String, RegistryEntry<H>>,
}

impl<H> Default for LiveRegistry<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<H> LiveRegistry<H> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry<H>> {
        self.entries.get(id)
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Records in ascending id order.
    pub fn records(&self) -> Vec<VehicleRecord> {
        let mut records: Vec<VehicleRecord> =
            self.entries.values().map(|e| e.record.clone()).collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    /// Apply a diff computed against this registry.
    ///
    /// The diff is checked against the registry before anything changes, so
    /// on error the registry and the presenter are left untouched.
    pub fn apply<P>(&mut self, diff: &VehicleDiff, presenter: &mut P) -> Result<(), ReconcileError>
    where
        P: Presenter<Handle = H>,
    {
        if let Some(id) = diff.removed.iter().find(|id| !self.contains(id)) {
            return Err(ReconcileError::Invariant(format!("removing unknown vehicle {id}")));
        }
        if let Some(record) = diff.updated.iter().find(|r| !self.contains(&r.id)) {
            return Err(ReconcileError::Invariant(format!(
                "updating unknown vehicle {}",
                record.id
            )));
        }
        if let Some(record) = diff.added.iter().find(|r| self.contains(&r.id)) {
            return Err(ReconcileError::Invariant(format!(
                "adding known vehicle {}",
                record.id
            )));
        }

        for id in &diff.removed {
            if let Some(entry) = self.entries.remove(id) {
                presenter.on_removed(id, entry.handle);
            }
        }
        for record in &diff.updated {
            if let Some(entry) = self.entries.get_mut(&record.id) {
                presenter.on_updated(&mut entry.handle, record);
                entry.record = record.clone();
            }
        }
        for record in &diff.added {
            let handle = presenter.on_added(record);
            self.entries.insert(
                record.id.clone(),
                RegistryEntry {
                    record: record.clone(),
                    handle,
                },
            );
        }

        Ok(())
    }
}

/// Compute the actions that move `registry` to `records`.
///
/// Records without a usable position are treated as absent, so a tracked
/// vehicle that stops reporting its position is removed. Duplicate ids keep
/// the last record.
pub fn diff<H>(registry: &LiveRegistry<H>, records: Vec<VehicleRecord>) -> VehicleDiff {
    let total = records.len();
    let mut lookup: HashMap<String, VehicleRecord> = HashMap::with_capacity(total);
    let mut unplaced = 0usize;
    for record in records {
        if record.usable_position().is_none() {
            unplaced += 1;
            continue;
        }
        lookup.insert(record.id.clone(), record);
    }

    let duplicates = total - unplaced - lookup.len();
    if duplicates > 0 {
        tracing::warn!(duplicates, "Snapshot contained duplicate vehicle ids, keeping last");
    }
    if unplaced > 0 {
        tracing::debug!(unplaced, "Ignoring vehicles without a usable position");
    }

    let mut removed: Vec<String> = registry
        .entries
        .keys()
        .filter(|id| !lookup.contains_key(*id))
        .cloned()
        .collect();
    removed.sort_unstable();

    let (mut updated, mut added): (Vec<_>, Vec<_>) = lookup
        .into_values()
        .partition(|record| registry.contains(&record.id));
    updated.sort_by(|a, b| a.id.cmp(&b.id));
    added.sort_by(|a, b| a.id.cmp(&b.id));

    VehicleDiff {
        added,
        updated,
        removed,
    }
}

/// Owner of the live registry and its presenter.
pub struct VehicleSetReconciler<P: Presenter> {
    registry: LiveRegistry<P::Handle>,
    presenter: P,
    snapshot: watch::Sender<Snapshot>,
}

impl<P: Presenter> VehicleSetReconciler<P> {
    pub fn new(presenter: P) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            registry: LiveRegistry::default(),
            presenter,
            snapshot,
        }
    }

    /// Reader of the published live set. Empty until the first reconcile.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    pub fn registry(&self) -> &LiveRegistry<P::Handle> {
        &self.registry
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Diff the new records against the registry, apply, then publish.
    pub fn reconcile(&mut self, records: Vec<VehicleRecord>) -> Result<VehicleDiff, ReconcileError> {
        let diff = diff(&self.registry, records);
        self.registry.apply(&diff, &mut self.presenter)?;
        self.snapshot.send_replace(Arc::new(self.registry.records()));

        if diff.is_empty() {
            tracing::debug!("No placed vehicles in this snapshot or the last");
            return Ok(diff);
        }

        tracing::debug!(
            added = diff.added.len(),
            updated = diff.updated.len(),
            removed = diff.removed.len(),
            live = self.registry.len(),
            "Reconciled vehicle set"
        );
        Ok(diff)
    }
}
