pub mod clock;
pub mod rollout;

pub use rollout::{
    refresh_status, resolve_rolling_update, set_condition, GroupClassification,
    RollingUpdateParams, StatusError, StatusRefresh,
};
