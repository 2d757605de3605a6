//! Snapshot versioning and per-session state.
//!
//! The summary service replaces the whole [`StatsModel`] at once. Each
//! replacement gets a new version number, and anything derived from a
//! snapshot carries that number so that results computed from an older
//! snapshot can never overwrite results from a newer one.

use log::{info, warn};
use std::cell::OnceCell;
use std::sync::Arc;

use crate::config::*;
use crate::line::LegendState;

/// An immutable summary, tagged with the version it was published under.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub version: u64,
    pub model: Arc<StatsModel>,
}

/// Hands out snapshots with strictly increasing versions.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    latest: Option<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> SnapshotStore {
        SnapshotStore::default()
    }

    /// Replaces the current snapshot.
    pub fn publish(&mut self, model: StatsModel) -> Snapshot {
        let version = self.latest.as_ref().map(|s| s.version + 1).unwrap_or(1);
        for q in model.questions.iter().filter(|q| !q.is_consistent()) {
            warn!(
                "publish: question {:?} declares {} answers but its distribution adds up to {}",
                q.key,
                q.count,
                q.distribution.total()
            );
        }
        info!(
            "publish: snapshot {} with {} questions, {} breakdowns, {} cross-tabs",
            version,
            model.questions.len(),
            model.demographics.len(),
            model.crosstabs.len()
        );
        let snapshot = Snapshot {
            version,
            model: Arc::new(model),
        };
        self.latest = Some(snapshot.clone());
        snapshot
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    pub fn current_version(&self) -> u64 {
        self.latest.as_ref().map(|s| s.version).unwrap_or(0)
    }
}

/// A value derived from some snapshot. Older derivations are refused.
#[derive(Debug, Clone)]
pub struct Derived<T> {
    current: Option<(u64, T)>,
}

impl<T> Default for Derived<T> {
    fn default() -> Self {
        Derived { current: None }
    }
}

impl<T> Derived<T> {
    pub fn new() -> Derived<T> {
        Derived::default()
    }

    /// Stores `value` unless the stored value comes from a newer snapshot.
    /// Returns whether the value was accepted.
    pub fn offer(&mut self, version: u64, value: T) -> bool {
        match &self.current {
            Some((v, _)) if *v > version => {
                info!(
                    "Derived::offer: dropping result of snapshot {} (have {})",
                    version, v
                );
                false
            }
            _ => {
                self.current = Some((version, value));
                true
            }
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.current.as_ref().map(|(_, t)| t)
    }

    pub fn version(&self) -> Option<u64> {
        self.current.as_ref().map(|(v, _)| *v)
    }
}

/// State kept for one results view: the snapshots, the institute overrides
/// (loaded at most once) and the line chart legend.
#[derive(Debug, Default)]
pub struct ResultsSession {
    pub snapshots: SnapshotStore,
    pub legend: LegendState,
    overrides: OnceCell<Option<InstituteOverrideTable>>,
}

impl ResultsSession {
    pub fn new() -> ResultsSession {
        ResultsSession::default()
    }

    /// Returns the override table, calling `loader` the first time only.
    ///
    /// A loader returning `None` is remembered as "no overrides": the heuristic
    /// alone is used for the rest of the session.
    pub fn overrides_or_load<F>(&self, loader: F) -> Option<&InstituteOverrideTable>
    where
        F: FnOnce() -> Option<InstituteOverrideTable>,
    {
        self.overrides
            .get_or_init(|| {
                let table = loader();
                match &table {
                    Some(t) => info!("overrides: loaded {} institute overrides", t.len()),
                    None => info!("overrides: none available, using the heuristic only"),
                }
                table
            })
            .as_ref()
    }

    pub fn overrides(&self) -> Option<&InstituteOverrideTable> {
        self.overrides.get().and_then(|t| t.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn versions_increase() {
        let mut store = SnapshotStore::new();
        assert_eq!(store.current_version(), 0);
        let a = store.publish(StatsModel::default());
        let b = store.publish(StatsModel {
            total_responses: 3,
            ..StatsModel::default()
        });
        assert!(b.version > a.version);
        assert_eq!(store.latest().map(|s| s.model.total_responses), Some(3));
        // Old snapshots stay intact.
        assert_eq!(a.model.total_responses, 0);
    }

    #[test]
    fn stale_derivations_are_refused() {
        let mut d: Derived<&str> = Derived::new();
        assert!(d.offer(2, "two"));
        assert!(!d.offer(1, "one"));
        assert_eq!(d.get(), Some(&"two"));
        assert!(d.offer(2, "two again"));
        assert!(d.offer(5, "five"));
        assert_eq!(d.version(), Some(5));
    }

    #[test]
    fn overrides_are_loaded_once() {
        let session = ResultsSession::new();
        let calls = Cell::new(0);
        let load = || {
            calls.set(calls.get() + 1);
            Some(InstituteOverrideTable::from_pairs(&[("x", Category::Its)]))
        };
        assert_eq!(session.overrides_or_load(load).map(|t| t.len()), Some(1));
        assert_eq!(session.overrides_or_load(load).map(|t| t.len()), Some(1));
        assert_eq!(calls.get(), 1);
        assert!(session.overrides().is_some());
    }

    #[test]
    fn failed_load_falls_back_to_heuristic() {
        let session = ResultsSession::new();
        assert!(session.overrides_or_load(|| None).is_none());
        // A later successful loader is not consulted.
        let later = session.overrides_or_load(|| Some(InstituteOverrideTable::new()));
        assert!(later.is_none());
    }
}
