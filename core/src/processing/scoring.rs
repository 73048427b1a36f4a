use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::capture_interface::{FrameRecord, ObjectClass};
use crate::math::stats::StatsHelper;
use crate::prelude::{AnalysisStage, StageConfig, StageError, StageResult};
use crate::processing::alignment::AlignmentPath;
use crate::processing::angles::{AngleSample, JointAngleEvaluator};
use crate::telemetry::log::StageLogger;

/// Mean absolute joint-angle differences, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormAccuracy {
    pub left_leg_angle_diff: f32,
    pub right_leg_angle_diff: f32,
    pub overall_angle_diff: f32,
}

/// How far the warping path departs from a 1:1 correspondence, plus the raw
/// DTW cost carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingConsistency {
    pub avg_frame_offset: f32,
    pub dtw_distance: f32,
}

/// Ball-engagement outcome across both recordings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallInteraction {
    BothPresent,
    BothAbsent,
    Mismatch,
}

impl BallInteraction {
    pub fn from_flags(baseline_saw_ball: bool, player_saw_ball: bool) -> Self {
        match (baseline_saw_ball, player_saw_ball) {
            (true, true) => Self::BothPresent,
            (false, false) => Self::BothAbsent,
            _ => Self::Mismatch,
        }
    }

    /// Legacy boolean: true when both recordings agree, present or absent.
    pub fn is_consistent(self) -> bool {
        !matches!(self, Self::Mismatch)
    }
}

/// Cone coverage and ball engagement relative to the baseline recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillCompletion {
    pub completed_cones: Vec<i64>,
    pub missing_cones: Vec<i64>,
    pub ball_interaction: bool,
    pub ball_outcome: BallInteraction,
}

/// Aggregated scoring report; derived once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillReport {
    pub form_accuracy: FormAccuracy,
    pub timing_consistency: TimingConsistency,
    pub drill_completion: DrillCompletion,
}

/// Input payload for the scoring stage.
pub struct ScoringInput {
    pub baseline: Vec<FrameRecord>,
    pub player: Vec<FrameRecord>,
    pub alignment: AlignmentPath,
}

/// Final stage combining angle deviations, timing offsets, and object
/// engagement into one report.
///
/// Aligned pairs where either side's triplet is unavailable are excluded
/// from the angle means instead of contributing a zero difference. An empty
/// alignment yields a zeroed report, keeping the schema stable downstream.
pub struct ScoringStage {
    evaluator: Option<JointAngleEvaluator>,
    logger: StageLogger,
}

impl ScoringStage {
    pub fn new() -> Self {
        Self {
            evaluator: None,
            logger: StageLogger::new("scoring"),
        }
    }

    fn cone_ids(frames: &[FrameRecord]) -> BTreeSet<i64> {
        frames
            .iter()
            .flat_map(|frame| frame.objects.iter())
            .filter(|object| object.class == ObjectClass::Cone)
            .map(|object| object.track_id)
            .collect()
    }

    fn saw_ball(frames: &[FrameRecord]) -> bool {
        frames
            .iter()
            .any(|frame| frame.has_object_class(ObjectClass::Ball))
    }
}

impl Default for ScoringStage {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisStage for ScoringStage {
    type Input = ScoringInput;
    type Output = DrillReport;

    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        if config.angle_triplets.is_empty() {
            return Err(StageError::InvalidInput(
                "no angle triplets configured for scoring".into(),
            ));
        }
        self.evaluator = Some(JointAngleEvaluator::from_config(config));
        Ok(())
    }

    fn execute(&mut self, input: Self::Input) -> StageResult<Self::Output> {
        let evaluator = self
            .evaluator
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let triplet_count = evaluator.triplet_count();
        let mut per_triplet_diffs: Vec<Vec<f32>> = vec![Vec::new(); triplet_count];
        let mut frame_offsets = Vec::with_capacity(input.alignment.aligned_frames.len());

        for pair in &input.alignment.aligned_frames {
            frame_offsets.push((pair.baseline_frame as f32 - pair.player_frame as f32).abs());

            let (Some(baseline_frame), Some(player_frame)) = (
                input.baseline.get(pair.baseline_frame),
                input.player.get(pair.player_frame),
            ) else {
                continue;
            };

            let baseline_angles = evaluator.evaluate(&baseline_frame.player_keypoints);
            let player_angles = evaluator.evaluate(&player_frame.player_keypoints);
            for index in 0..triplet_count {
                if let (AngleSample::Measured(baseline), AngleSample::Measured(player)) =
                    (baseline_angles[index], player_angles[index])
                {
                    per_triplet_diffs[index].push((baseline - player).abs());
                }
            }
        }

        let per_triplet_means: Vec<f32> = per_triplet_diffs
            .iter()
            .map(|diffs| StatsHelper::mean(diffs))
            .collect();
        let all_diffs: Vec<f32> = per_triplet_diffs.iter().flatten().copied().collect();

        let form_accuracy = FormAccuracy {
            left_leg_angle_diff: per_triplet_means.first().copied().unwrap_or(0.0),
            right_leg_angle_diff: per_triplet_means.get(1).copied().unwrap_or(0.0),
            overall_angle_diff: StatsHelper::mean(&all_diffs),
        };

        let timing_consistency = TimingConsistency {
            avg_frame_offset: StatsHelper::mean(&frame_offsets),
            dtw_distance: input.alignment.dtw_distance,
        };

        let baseline_cones = Self::cone_ids(&input.baseline);
        let player_cones = Self::cone_ids(&input.player);
        let completed_cones: Vec<i64> = baseline_cones.intersection(&player_cones).copied().collect();
        let missing_cones: Vec<i64> = baseline_cones.difference(&player_cones).copied().collect();
        let ball_outcome = BallInteraction::from_flags(
            Self::saw_ball(&input.baseline),
            Self::saw_ball(&input.player),
        );

        let drill_completion = DrillCompletion {
            completed_cones,
            missing_cones,
            ball_interaction: ball_outcome.is_consistent(),
            ball_outcome,
        };

        self.logger.record(&format!(
            "scored {} aligned pairs, overall diff {:.2} deg, {} cones missing",
            input.alignment.aligned_frames.len(),
            form_accuracy.overall_angle_diff,
            drill_completion.missing_cones.len()
        ));

        Ok(DrillReport {
            form_accuracy,
            timing_consistency,
            drill_completion,
        })
    }

    fn cleanup(&mut self) {
        self.evaluator = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture_interface::{BoundingBox, Keypoint, TrackedObject};
    use crate::processing::alignment::AlignedPair;

    fn keypoint(x: f32, y: f32) -> Keypoint {
        Keypoint::new(x, y, 0.0, 1.0)
    }

    /// Frame with both legs posed; `knee_forward` swings the left ankle out
    /// to bend the measured left-leg angle.
    fn posed_frame(frame: u32, knee_forward: f32) -> FrameRecord {
        let mut record = FrameRecord::new(frame);
        record.player_keypoints.insert(23, keypoint(0.45, 0.4));
        record.player_keypoints.insert(25, keypoint(0.45, 0.6));
        record
            .player_keypoints
            .insert(27, keypoint(0.45 + knee_forward, 0.8));
        record.player_keypoints.insert(24, keypoint(0.55, 0.4));
        record.player_keypoints.insert(26, keypoint(0.55, 0.6));
        record.player_keypoints.insert(28, keypoint(0.55, 0.8));
        record
    }

    fn cone(track_id: i64) -> TrackedObject {
        TrackedObject {
            track_id,
            class: ObjectClass::Cone,
            bbox: BoundingBox {
                x1: 0.0,
                y1: 0.0,
                x2: 1.0,
                y2: 1.0,
            },
        }
    }

    fn ball() -> TrackedObject {
        TrackedObject {
            track_id: 99,
            class: ObjectClass::Ball,
            bbox: BoundingBox {
                x1: 0.0,
                y1: 0.0,
                x2: 1.0,
                y2: 1.0,
            },
        }
    }

    fn identity_alignment(frames: usize, distance: f32) -> AlignmentPath {
        AlignmentPath {
            aligned_frames: (0..frames)
                .map(|index| AlignedPair {
                    baseline_frame: index,
                    player_frame: index,
                })
                .collect(),
            dtw_distance: distance,
        }
    }

    fn stage() -> ScoringStage {
        let mut stage = ScoringStage::new();
        stage.initialize(&StageConfig::default()).unwrap();
        stage
    }

    #[test]
    fn identical_performances_score_zero_angle_diff() {
        let frames = vec![posed_frame(0, 0.0), posed_frame(1, 0.0)];
        let mut stage = stage();
        let report = stage
            .execute(ScoringInput {
                baseline: frames.clone(),
                player: frames,
                alignment: identity_alignment(2, 0.0),
            })
            .unwrap();

        assert!(report.form_accuracy.overall_angle_diff.abs() < 1e-4);
        assert_eq!(report.timing_consistency.avg_frame_offset, 0.0);
    }

    #[test]
    fn bent_left_leg_raises_only_the_left_diff() {
        let baseline = vec![posed_frame(0, 0.0)];
        let player = vec![posed_frame(0, 0.1)];
        let mut stage = stage();
        let report = stage
            .execute(ScoringInput {
                baseline,
                player,
                alignment: identity_alignment(1, 0.0),
            })
            .unwrap();

        assert!(report.form_accuracy.left_leg_angle_diff > 1.0);
        assert!(report.form_accuracy.right_leg_angle_diff.abs() < 1e-4);
    }

    #[test]
    fn matching_cone_sets_leave_nothing_missing() {
        let mut baseline = posed_frame(0, 0.0);
        baseline.objects = vec![cone(1), cone(2), cone(3)];
        let mut player = posed_frame(0, 0.0);
        player.objects = vec![cone(1), cone(2), cone(3)];

        let mut stage = stage();
        let report = stage
            .execute(ScoringInput {
                baseline: vec![baseline],
                player: vec![player],
                alignment: identity_alignment(1, 0.0),
            })
            .unwrap();

        assert_eq!(report.drill_completion.completed_cones, vec![1, 2, 3]);
        assert!(report.drill_completion.missing_cones.is_empty());
    }

    #[test]
    fn baseline_only_cones_are_reported_missing() {
        let mut baseline = posed_frame(0, 0.0);
        baseline.objects = vec![cone(1), cone(2), cone(3)];
        let mut player = posed_frame(0, 0.0);
        player.objects = vec![cone(1), cone(2)];

        let mut stage = stage();
        let report = stage
            .execute(ScoringInput {
                baseline: vec![baseline],
                player: vec![player],
                alignment: identity_alignment(1, 0.0),
            })
            .unwrap();

        assert_eq!(report.drill_completion.completed_cones, vec![1, 2]);
        assert_eq!(report.drill_completion.missing_cones, vec![3]);
    }

    #[test]
    fn ball_outcomes_cover_all_three_cases() {
        let mut with_ball = posed_frame(0, 0.0);
        with_ball.objects = vec![ball()];
        let without_ball = posed_frame(0, 0.0);

        let mut stage = stage();

        let mismatch = stage
            .execute(ScoringInput {
                baseline: vec![with_ball.clone()],
                player: vec![without_ball.clone()],
                alignment: identity_alignment(1, 0.0),
            })
            .unwrap();
        assert_eq!(
            mismatch.drill_completion.ball_outcome,
            BallInteraction::Mismatch
        );
        assert!(!mismatch.drill_completion.ball_interaction);

        let both = stage
            .execute(ScoringInput {
                baseline: vec![with_ball.clone()],
                player: vec![with_ball],
                alignment: identity_alignment(1, 0.0),
            })
            .unwrap();
        assert_eq!(
            both.drill_completion.ball_outcome,
            BallInteraction::BothPresent
        );
        assert!(both.drill_completion.ball_interaction);

        let neither = stage
            .execute(ScoringInput {
                baseline: vec![without_ball.clone()],
                player: vec![without_ball],
                alignment: identity_alignment(1, 0.0),
            })
            .unwrap();
        assert_eq!(
            neither.drill_completion.ball_outcome,
            BallInteraction::BothAbsent
        );
        assert!(neither.drill_completion.ball_interaction);
    }

    #[test]
    fn empty_alignment_yields_a_zeroed_report() {
        let mut stage = stage();
        let report = stage
            .execute(ScoringInput {
                baseline: vec![posed_frame(0, 0.0)],
                player: Vec::new(),
                alignment: AlignmentPath {
                    aligned_frames: Vec::new(),
                    dtw_distance: 0.0,
                },
            })
            .unwrap();

        assert_eq!(report.form_accuracy.overall_angle_diff, 0.0);
        assert_eq!(report.timing_consistency.avg_frame_offset, 0.0);
    }

    #[test]
    fn unavailable_angles_are_excluded_from_the_mean() {
        // Second frame's left leg is low-confidence on the player side; the
        // left-leg mean must come from the first pair only.
        let baseline = vec![posed_frame(0, 0.0), posed_frame(1, 0.0)];
        let mut obscured = posed_frame(1, 0.1);
        if let Some(knee) = obscured.player_keypoints.get_mut(&25) {
            knee.visibility = 0.2;
        }
        let player = vec![posed_frame(0, 0.1), obscured];

        let mut stage = stage();
        let report = stage
            .execute(ScoringInput {
                baseline: baseline.clone(),
                player,
                alignment: identity_alignment(2, 0.0),
            })
            .unwrap();

        let mut reference_stage = ScoringStage::new();
        reference_stage.initialize(&StageConfig::default()).unwrap();
        let reference = reference_stage
            .execute(ScoringInput {
                baseline: vec![posed_frame(0, 0.0)],
                player: vec![posed_frame(0, 0.1)],
                alignment: identity_alignment(1, 0.0),
            })
            .unwrap();

        assert!(
            (report.form_accuracy.left_leg_angle_diff
                - reference.form_accuracy.left_leg_angle_diff)
                .abs()
                < 1e-4
        );
    }

    #[test]
    fn report_serializes_contract_field_names() {
        let mut stage = stage();
        let report = stage
            .execute(ScoringInput {
                baseline: vec![posed_frame(0, 0.0)],
                player: vec![posed_frame(0, 0.0)],
                alignment: identity_alignment(1, 12.5),
            })
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["form_accuracy"]["left_leg_angle_diff"].is_number());
        assert!(json["form_accuracy"]["right_leg_angle_diff"].is_number());
        assert!(json["form_accuracy"]["overall_angle_diff"].is_number());
        assert_eq!(json["timing_consistency"]["dtw_distance"], 12.5);
        assert!(json["timing_consistency"]["avg_frame_offset"].is_number());
        assert!(json["drill_completion"]["completed_cones"].is_array());
        assert!(json["drill_completion"]["missing_cones"].is_array());
        assert!(json["drill_completion"]["ball_interaction"].is_boolean());
        assert_eq!(json["drill_completion"]["ball_outcome"], "both_absent");
    }
}
