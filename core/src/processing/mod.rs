pub mod alignment;
pub mod angles;
pub mod scoring;
pub mod trajectory;

pub use alignment::{AlignedPair, AlignmentInput, AlignmentPath, AlignmentStage};
pub use angles::{AngleSample, AngleSet, JointAngleEvaluator};
pub use scoring::{BallInteraction, DrillReport, ScoringInput, ScoringStage};
pub use trajectory::{Trajectory, TrajectoryStage};
