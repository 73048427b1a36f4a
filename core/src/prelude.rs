use crate::capture_interface::landmark::{self, AngleTriplet};
use serde::{Deserialize, Serialize};

/// Boundary handling for the warping path produced by the alignment stage.
///
/// `Locked` forces the path corner-to-corner, matching the reference
/// implementation's behavior. `FreeEnd` starts the backtrack at the cheapest
/// cell of the final row/column; the unmatched tail of the other recording is
/// left uncovered. The start is locked at (0, 0) in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EndpointLocking {
    #[default]
    Locked,
    FreeEnd,
}

/// Shared configuration for each analysis stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// Joint ids used for trajectory extraction, in column order.
    pub joint_ids: Vec<u32>,
    /// Triplets measured by the angle evaluator; index 0 is the left leg,
    /// index 1 the right leg in the persisted report.
    pub angle_triplets: Vec<AngleTriplet>,
    /// Keypoints at or below this visibility are treated as absent.
    pub visibility_threshold: f32,
    pub endpoint_locking: EndpointLocking,
    /// Optional Sakoe-Chiba band half-width for long recordings.
    pub band_radius: Option<usize>,
    /// Hard cap on DTW cost-matrix cells before the stage refuses to run.
    pub max_cost_cells: usize,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            joint_ids: landmark::default_alignment_joints(),
            angle_triplets: landmark::default_angle_triplets(),
            visibility_threshold: 0.5,
            endpoint_locking: EndpointLocking::Locked,
            band_radius: None,
            max_cost_cells: 25_000_000,
        }
    }
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Trait describing the analysis stages of the pipeline.
///
/// Stages exchange typed documents rather than one uniform payload, so the
/// input and output are associated types instead of shared structs.
pub trait AnalysisStage {
    type Input;
    type Output;

    fn initialize(&mut self, config: &StageConfig) -> StageResult<()>;
    fn execute(&mut self, input: Self::Input) -> StageResult<Self::Output>;
    fn cleanup(&mut self);
}
