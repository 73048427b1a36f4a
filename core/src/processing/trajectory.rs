use ndarray::Array2;

use crate::capture_interface::FrameRecord;
use crate::prelude::{AnalysisStage, StageConfig, StageError, StageResult};
use crate::telemetry::log::StageLogger;

/// Per-frame numeric vector sequence: rows = frames, columns = 3 x joints.
pub type Trajectory = Array2<f32>;

/// Stage turning frame records into a fixed-width trajectory.
///
/// Each configured joint contributes its (x, y, z) in column order; joints
/// absent from a frame contribute a zero triple. Visibility is not consulted
/// here, only later by the angle evaluator.
pub struct TrajectoryStage {
    config: Option<StageConfig>,
    logger: StageLogger,
}

impl TrajectoryStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: StageLogger::new("trajectory"),
        }
    }
}

impl Default for TrajectoryStage {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisStage for TrajectoryStage {
    type Input = Vec<FrameRecord>;
    type Output = Trajectory;

    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        if config.joint_ids.is_empty() {
            return Err(StageError::InvalidInput(
                "no joints selected for trajectory extraction".into(),
            ));
        }
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, frames: Self::Input) -> StageResult<Self::Output> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        if frames.is_empty() {
            return Err(StageError::InvalidInput("no frames supplied".into()));
        }

        let width = config.joint_ids.len() * 3;
        let mut data = Array2::zeros((frames.len(), width));
        for (row, frame) in frames.iter().enumerate() {
            for (slot, joint_id) in config.joint_ids.iter().enumerate() {
                if let Some(keypoint) = frame.player_keypoints.get(joint_id) {
                    let column = slot * 3;
                    data[[row, column]] = keypoint.x;
                    data[[row, column + 1]] = keypoint.y;
                    data[[row, column + 2]] = keypoint.z;
                }
            }
        }

        self.logger.record(&format!(
            "extracted {}x{} trajectory from {} frames",
            data.nrows(),
            data.ncols(),
            frames.len()
        ));

        Ok(data)
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}
