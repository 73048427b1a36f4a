use anyhow::Context;
use drillcore::capture_interface::landmark;
use drillcore::prelude::{EndpointLocking, StageConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub joint_ids: Vec<u32>,
    pub visibility_threshold: f32,
    pub endpoint_locking: EndpointLocking,
    pub band_radius: Option<usize>,
    pub max_cost_cells: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            joint_ids: landmark::default_alignment_joints(),
            visibility_threshold: 0.5,
            endpoint_locking: EndpointLocking::Locked,
            band_radius: None,
            max_cost_cells: 25_000_000,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Scoring triplets are the fixed left/right hip-knee-ankle pairs; the
    /// persisted report names its legs after them.
    pub fn to_stage_config(&self) -> StageConfig {
        StageConfig {
            joint_ids: self.joint_ids.clone(),
            angle_triplets: landmark::default_angle_triplets(),
            visibility_threshold: self.visibility_threshold,
            endpoint_locking: self.endpoint_locking,
            band_radius: self.band_radius,
            max_cost_cells: self.max_cost_cells,
        }
    }
}
