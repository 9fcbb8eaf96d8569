use k8s_openapi::api::core::v1::PodTemplateSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Condition;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// ModelServing runs a model as a set of serving groups
///
/// Each group is an independently-updatable unit of replicas. Updates roll
/// across groups in ordinal order, optionally held back by a partition.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, JsonSchema)]
#[kube(
    group = "workload.serving.io",
    version = "v1alpha1",
    kind = "ModelServing",
    namespaced,
    status = "ModelServingStatus",
    printcolumn = r#"{"name":"Desired", "type":"integer", "jsonPath":".spec.replicas"}"#,
    printcolumn = r#"{"name":"Current", "type":"integer", "jsonPath":".status.currentReplicas"}"#,
    printcolumn = r#"{"name":"Updated", "type":"integer", "jsonPath":".status.updatedReplicas"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
pub struct ModelServingSpec {
    /// Number of desired serving groups
    #[serde(default = "default_replicas")]
    pub replicas: i32,

    /// Template describes one serving group
    #[serde(default)]
    pub template: ServingGroup,

    /// How groups are replaced when the template changes
    #[serde(rename = "rolloutStrategy", skip_serializing_if = "Option::is_none")]
    pub rollout_strategy: Option<RolloutStrategy>,
}

fn default_replicas() -> i32 {
    1
}

fn default_role_replicas() -> i32 {
    1
}

/// A serving group is made of one or more roles (e.g. prefill and decode)
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
pub struct ServingGroup {
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema)]
pub struct Role {
    pub name: String,

    /// Number of pods for this role within one group
    #[serde(default = "default_role_replicas")]
    pub replicas: i32,

    pub template: PodTemplateSpec,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
pub enum RolloutStrategyType {
    /// Replace serving groups in ordinal order
    #[default]
    ServingGroupRollingUpdate,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
pub struct RolloutStrategy {
    #[serde(rename = "type", default)]
    pub type_: RolloutStrategyType,

    #[serde(
        rename = "rollingUpdateConfiguration",
        skip_serializing_if = "Option::is_none"
    )]
    pub rolling_update_configuration: Option<RollingUpdateConfiguration>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
pub struct RollingUpdateConfiguration {
    /// Groups with an ordinal below the partition keep the old revision.
    /// Defaults to 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<i32>,

    /// Maximum number of groups that can be unavailable during the update.
    /// Value can be an absolute number (e.g., 1) or percentage (e.g., "25%").
    /// Defaults to 1.
    #[serde(rename = "maxUnavailable", skip_serializing_if = "Option::is_none")]
    pub max_unavailable: Option<IntOrString>,

    /// Maximum number of groups that can be created above the desired count.
    /// Value can be an absolute number (e.g., 1) or percentage (e.g., "25%").
    /// Defaults to 0.
    #[serde(rename = "maxSurge", skip_serializing_if = "Option::is_none")]
    pub max_surge: Option<IntOrString>,
}

/// Condition types reported in `status.conditions`
///
/// Only one of them is present at a time; together they describe rollout health.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelServingConditionType {
    /// Every group is settled, nothing is mid-transition
    Available,
    /// Groups at or above the partition are being updated
    Progressing,
    /// A full rolling update is under way
    UpdateInProgress,
}

impl ModelServingConditionType {
    pub const ALL: [ModelServingConditionType; 3] = [
        ModelServingConditionType::Available,
        ModelServingConditionType::Progressing,
        ModelServingConditionType::UpdateInProgress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelServingConditionType::Available => "Available",
            ModelServingConditionType::Progressing => "Progressing",
            ModelServingConditionType::UpdateInProgress => "UpdateInProgress",
        }
    }

    /// Parse a condition type string, returning None for unrelated conditions
    pub fn from_type(type_: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == type_)
    }
}

impl std::fmt::Display for ModelServingConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of the ModelServing
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct ModelServingStatus {
    /// Generation most recently observed by the controller
    #[serde(rename = "observedGeneration", skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Number of distinct serving groups seen in the last classification
    #[serde(default)]
    pub replicas: i32,

    /// Number of groups still on the old revision
    #[serde(rename = "currentReplicas", default)]
    pub current_replicas: i32,

    /// Number of groups already on the new revision
    #[serde(rename = "updatedReplicas", default)]
    pub updated_replicas: i32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

#[cfg(test)]
#[path = "model_serving_test.rs"]
mod tests;
