use super::condition::{set_condition, GroupClassification};
use super::params::{resolve_rolling_update, RollingUpdateParams};
use crate::controller::clock::Clock;
use crate::crd::model_serving::{ModelServing, ModelServingStatus};
use kube::api::Patch;
use kube::ResourceExt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("ModelServing has no status to write")]
    MissingStatus,

    #[error("Failed to serialize ModelServingStatus: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcome of one status refresh
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusRefresh {
    /// Anything in status changed; the caller should persist it
    pub changed: bool,
    /// The rollout-health condition changed
    pub condition_changed: bool,
    /// Resolved parameters for the rollout executor
    pub params: RollingUpdateParams,
}

/// Record group counts from a classification
///
/// `replicas` counts each group once even when it appears in several sets.
///
/// # Returns
/// true if any count changed
pub fn record_group_counts(status: &mut ModelServingStatus, groups: &GroupClassification) -> bool {
    let seen = groups
        .progressing
        .union(&groups.updated)
        .copied()
        .chain(groups.current.iter().copied())
        .collect::<std::collections::BTreeSet<_>>()
        .len();

    let replicas = count(seen);
    let current_replicas = count(groups.current.len());
    let updated_replicas = count(groups.updated.len());

    let changed = status.replicas != replicas
        || status.current_replicas != current_replicas
        || status.updated_replicas != updated_replicas;

    status.replicas = replicas;
    status.current_replicas = current_replicas;
    status.updated_replicas = updated_replicas;

    changed
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Refresh the status of a ModelServing from a group classification
///
/// Updates the rollout condition, group counts and observed generation, and
/// resolves the rollout parameters for this pass. The caller persists status
/// only when `changed` is set.
pub fn refresh_status(
    ms: &mut ModelServing,
    groups: &GroupClassification,
    clock: &dyn Clock,
) -> StatusRefresh {
    let params = resolve_rolling_update(ms);
    let condition_changed = set_condition(ms, groups, clock.now());

    let generation = ms.metadata.generation;
    let name = ms.name_any();
    let status = ms.status.get_or_insert_with(Default::default);

    let counts_changed = record_group_counts(status, groups);

    let generation_changed = generation.is_some() && status.observed_generation != generation;
    if generation_changed {
        status.observed_generation = generation;
    }

    let changed = condition_changed || counts_changed || generation_changed;

    debug!(
        model_serving = %name,
        changed,
        condition_changed,
        partition = params.partition,
        max_unavailable = params.max_unavailable,
        max_surge = params.max_surge,
        progressing = groups.progressing.len(),
        updated = groups.updated.len(),
        current = groups.current.len(),
        "Refreshed ModelServing status"
    );

    StatusRefresh {
        changed,
        condition_changed,
        params,
    }
}

/// Build the merge patch for the status subresource
pub fn status_patch(ms: &ModelServing) -> Result<Patch<serde_json::Value>, StatusError> {
    let status = ms.status.as_ref().ok_or(StatusError::MissingStatus)?;
    let status = serde_json::to_value(status)?;
    Ok(Patch::Merge(serde_json::json!({ "status": status })))
}
