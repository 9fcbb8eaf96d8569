use super::params::has_explicit_partition;
use crate::crd::model_serving::{ModelServing, ModelServingConditionType};
use chrono::{DateTime, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{Condition, Time};
use std::collections::BTreeSet;
use tracing::debug;

/// Reason reported once no group is mid-transition
pub const ALL_GROUPS_READY: &str = "AllGroupsReady";

/// Reason reported while groups above the partition are being updated
pub const PARTITIONED_ROLLOUT: &str = "PartitionedRollout";

/// Reason reported while every group is eligible for update
pub const ROLLING_UPDATE: &str = "RollingUpdate";

/// Message once every group is settled
pub const ALL_GROUPS_ARE_READY: &str = "All groups are ready";

/// Message prefix for the list of groups mid-transition
pub const SOME_GROUPS_ARE_PROGRESSING: &str = "Some groups are progressing";

/// Message prefix for the list of groups on the new revision
pub const SOME_GROUPS_ARE_UPDATED: &str = "Some groups are updated";

const MESSAGE_SEPARATOR: &str = "; ";

const CONDITION_TRUE: &str = "True";

/// Ordinals of serving groups
pub type GroupIndexSet = BTreeSet<usize>;

/// Snapshot of per-group rollout state for one reconciliation
///
/// The sets may overlap (a group can be both updated and still progressing).
/// Only the emptiness of `progressing` decides whether the workload is settled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupClassification {
    /// Groups actively transitioning
    pub progressing: GroupIndexSet,
    /// Groups on the new revision
    pub updated: GroupIndexSet,
    /// Groups still on the old revision
    pub current: GroupIndexSet,
}

impl GroupClassification {
    pub fn new(
        progressing: impl IntoIterator<Item = usize>,
        updated: impl IntoIterator<Item = usize>,
        current: impl IntoIterator<Item = usize>,
    ) -> Self {
        GroupClassification {
            progressing: progressing.into_iter().collect(),
            updated: updated.into_iter().collect(),
            current: current.into_iter().collect(),
        }
    }
}

/// Rollout health derived from a group classification
///
/// Variants are listed in priority order; the first that applies wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RolloutHealth {
    /// No group is progressing
    AllGroupsReady,
    /// Groups are progressing behind an explicit partition
    PartitionedProgress { progressing: GroupIndexSet },
    /// Groups are progressing with no partition gating
    UpdateInProgress {
        progressing: GroupIndexSet,
        updated: GroupIndexSet,
    },
}

impl RolloutHealth {
    pub fn evaluate(groups: &GroupClassification, partitioned: bool) -> Self {
        if groups.progressing.is_empty() {
            RolloutHealth::AllGroupsReady
        } else if partitioned {
            RolloutHealth::PartitionedProgress {
                progressing: groups.progressing.clone(),
            }
        } else {
            RolloutHealth::UpdateInProgress {
                progressing: groups.progressing.clone(),
                updated: groups.updated.clone(),
            }
        }
    }

    pub fn condition_type(&self) -> ModelServingConditionType {
        match self {
            RolloutHealth::AllGroupsReady => ModelServingConditionType::Available,
            RolloutHealth::PartitionedProgress { .. } => ModelServingConditionType::Progressing,
            RolloutHealth::UpdateInProgress { .. } => ModelServingConditionType::UpdateInProgress,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            RolloutHealth::AllGroupsReady => ALL_GROUPS_READY,
            RolloutHealth::PartitionedProgress { .. } => PARTITIONED_ROLLOUT,
            RolloutHealth::UpdateInProgress { .. } => ROLLING_UPDATE,
        }
    }

    /// Human-readable message listing the affected groups
    ///
    /// Partitioned rollouts leave the held-back groups out on purpose, so the
    /// updated fragment is only reported for full rolling updates.
    pub fn message(&self) -> String {
        let mut fragments = Vec::new();
        match self {
            RolloutHealth::AllGroupsReady => return ALL_GROUPS_ARE_READY.to_string(),
            RolloutHealth::PartitionedProgress { progressing } => {
                fragments.push(fragment(SOME_GROUPS_ARE_PROGRESSING, progressing));
            }
            RolloutHealth::UpdateInProgress {
                progressing,
                updated,
            } => {
                fragments.push(fragment(SOME_GROUPS_ARE_PROGRESSING, progressing));
                if !updated.is_empty() {
                    fragments.push(fragment(SOME_GROUPS_ARE_UPDATED, updated));
                }
            }
        }
        fragments.join(MESSAGE_SEPARATOR)
    }

    /// Build the status condition, stamped with `now` as transition time
    pub fn to_condition(&self, now: DateTime<Utc>) -> Condition {
        Condition {
            type_: self.condition_type().as_str().to_string(),
            status: CONDITION_TRUE.to_string(),
            reason: self.reason().to_string(),
            message: self.message(),
            last_transition_time: Time(now),
            observed_generation: None,
        }
    }
}

fn fragment(prefix: &str, groups: &GroupIndexSet) -> String {
    let list = groups
        .iter()
        .map(|g| g.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{prefix}: [{list}]")
}

/// True if any of type, status, reason or message differ
pub fn condition_differs(old: &Condition, new: &Condition) -> bool {
    old.type_ != new.type_
        || old.status != new.status
        || old.reason != new.reason
        || old.message != new.message
}

/// True if the change moves the condition to a new type or status
pub fn is_transition(old: &Condition, new: &Condition) -> bool {
    old.type_ != new.type_ || old.status != new.status
}

fn is_rollout_condition(condition: &Condition) -> bool {
    ModelServingConditionType::from_type(&condition.type_).is_some()
}

/// Refresh the rollout-health condition of a ModelServing
///
/// Replaces (or inserts) the single Available/Progressing/UpdateInProgress
/// condition and leaves unrelated conditions alone. `lastTransitionTime` only
/// moves when the type or status changes.
///
/// # Returns
/// true if the stored conditions changed and status must be written
pub fn set_condition(
    ms: &mut ModelServing,
    groups: &GroupClassification,
    now: DateTime<Utc>,
) -> bool {
    let health = RolloutHealth::evaluate(groups, has_explicit_partition(ms));
    let mut desired = health.to_condition(now);

    let status = ms.status.get_or_insert_with(Default::default);
    let conditions = &mut status.conditions;

    let Some(slot) = conditions.iter().position(is_rollout_condition) else {
        debug!(
            condition = %desired.type_,
            reason = %desired.reason,
            "Adding rollout condition"
        );
        conditions.push(desired);
        return true;
    };

    let duplicates = conditions.iter().filter(|c| is_rollout_condition(c)).count() > 1;
    let existing = &conditions[slot];

    if !duplicates && !condition_differs(existing, &desired) {
        return false;
    }

    if !is_transition(existing, &desired) {
        desired.last_transition_time = existing.last_transition_time.clone();
    }

    debug!(
        from = %existing.type_,
        to = %desired.type_,
        reason = %desired.reason,
        message = %desired.message,
        "Updating rollout condition"
    );

    conditions[slot] = desired;

    // Keep only the slot among rollout conditions
    let mut index = 0;
    conditions.retain(|c| {
        let keep = index == slot || !is_rollout_condition(c);
        index += 1;
        keep
    });

    true
}
