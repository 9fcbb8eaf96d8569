//! Status core for staged, group-partitioned rollouts of ModelServing workloads
//!
//! Two pure pieces sit under `controller::rollout`:
//! - `resolve_rolling_update` turns the declared strategy into concrete
//!   partition / maxUnavailable / maxSurge counts
//! - `set_condition` folds the group classification into one rollout-health
//!   condition and reports whether status needs to be written

pub mod controller;
pub mod crd;
