use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::core::gav::ProjectId;
use crate::graph::ops::{self, CycleError};
use crate::graph::DependencyGraph;

/// Accumulation point for submitted projects. All operations serialize on a
/// single lock; the guarded graph is only handed out as owned snapshots.
#[derive(Debug, Default)]
pub struct GraphStore {
    inner: Mutex<DependencyGraph>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the dependency list recorded for `project`; re-submitting an
    /// updated descriptor is the supported way to refresh it. Returns true
    /// when an existing entry was overwritten.
    pub fn upsert(&self, project: ProjectId, dependencies: Vec<ProjectId>) -> bool {
        self.lock().upsert(project, dependencies)
    }

    /// Computes the build order over a snapshot; the stored graph is left
    /// untouched whether the computation succeeds or stalls on a cycle.
    pub fn build_order(&self) -> Result<Vec<ProjectId>, CycleError> {
        let snapshot = self.snapshot();
        ops::build_order(&snapshot)
    }

    pub fn snapshot(&self) -> DependencyGraph {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().edges.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // The map is consistent between operations, so a poisoned lock only
    // means another thread panicked mid-read; recover the guard.
    fn lock(&self) -> MutexGuard<'_, DependencyGraph> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
