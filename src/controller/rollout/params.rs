use crate::crd::model_serving::ModelServing;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use tracing::warn;

/// Groups below this ordinal are held back when no partition is declared
pub const DEFAULT_PARTITION: i32 = 0;

/// Update one group at a time when maxUnavailable is not declared
pub const DEFAULT_MAX_UNAVAILABLE: i32 = 1;

/// Never surge when maxSurge is not declared
pub const DEFAULT_MAX_SURGE: i32 = 0;

/// Concrete rollout parameters handed to the rollout executor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RollingUpdateParams {
    pub partition: i32,
    pub max_unavailable: i32,
    pub max_surge: i32,
}

impl Default for RollingUpdateParams {
    fn default() -> Self {
        RollingUpdateParams {
            partition: DEFAULT_PARTITION,
            max_unavailable: DEFAULT_MAX_UNAVAILABLE,
            max_surge: DEFAULT_MAX_SURGE,
        }
    }
}

/// Rounding direction used when a percentage does not divide evenly
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    /// floor(percent * total / 100)
    Down,
    /// ceil(percent * total / 100)
    Up,
}

/// Either a literal group count or a percentage of the desired groups
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantity {
    Count(i32),
    Percent(i32),
}

impl Quantity {
    /// Interpret an int-or-string field
    ///
    /// Accepts integers, percentages like "25%" and bare numeric strings like "5".
    /// Returns None when the string is neither.
    pub fn parse(value: &IntOrString) -> Option<Quantity> {
        match value {
            IntOrString::Int(count) => Some(Quantity::Count(*count)),
            IntOrString::String(s) => {
                let s = s.trim();
                match s.strip_suffix('%') {
                    Some(percent) => percent.trim().parse().ok().map(Quantity::Percent),
                    None => s.parse().ok().map(Quantity::Count),
                }
            }
        }
    }

    /// Resolve against the total number of desired groups
    ///
    /// Integer math only; the result is never negative.
    pub fn scale(self, total: i32, rounding: Rounding) -> i32 {
        match self {
            Quantity::Count(count) => count.max(0),
            Quantity::Percent(percent) => {
                let product = i64::from(percent.max(0)) * i64::from(total.max(0));
                let scaled = match rounding {
                    Rounding::Down => product / 100,
                    Rounding::Up => (product + 99) / 100,
                };
                i32::try_from(scaled).unwrap_or(i32::MAX)
            }
        }
    }
}

/// Resolve an optional int-or-string field to an absolute group count
///
/// Absent fields fall back to `default`. Malformed strings resolve to 0,
/// matching how an unset surge behaves; validation is expected upstream.
pub fn scaled_value(
    value: Option<&IntOrString>,
    total: i32,
    rounding: Rounding,
    default: i32,
) -> i32 {
    let Some(value) = value else {
        return default;
    };

    match Quantity::parse(value) {
        Some(quantity) => quantity.scale(total, rounding),
        None => {
            warn!(value = ?value, "Unparsable int-or-percent value, resolving to 0");
            0
        }
    }
}

/// Resolve the declared rollout strategy into concrete parameters
///
/// Without a rolling update configuration this is `(0, 1, 0)`: one group
/// at a time, no surge. Percentages are resolved against `spec.replicas`,
/// rounding maxUnavailable down and maxSurge up.
pub fn resolve_rolling_update(ms: &ModelServing) -> RollingUpdateParams {
    let Some(config) = ms
        .spec
        .rollout_strategy
        .as_ref()
        .and_then(|strategy| strategy.rolling_update_configuration.as_ref())
    else {
        return RollingUpdateParams::default();
    };

    let total = ms.spec.replicas;

    RollingUpdateParams {
        partition: config.partition.unwrap_or(DEFAULT_PARTITION).max(0),
        max_unavailable: scaled_value(
            config.max_unavailable.as_ref(),
            total,
            Rounding::Down,
            DEFAULT_MAX_UNAVAILABLE,
        ),
        max_surge: scaled_value(
            config.max_surge.as_ref(),
            total,
            Rounding::Up,
            DEFAULT_MAX_SURGE,
        ),
    }
}

/// True when the workload deliberately holds groups back behind a partition
///
/// A partition of 0 holds nothing back and counts as undeclared.
pub fn has_explicit_partition(ms: &ModelServing) -> bool {
    ms.spec
        .rollout_strategy
        .as_ref()
        .and_then(|strategy| strategy.rolling_update_configuration.as_ref())
        .and_then(|config| config.partition)
        .is_some_and(|partition| partition > 0)
}
