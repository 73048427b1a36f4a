use crate::feedback::rules::FeedbackGenerator;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use drillcore::capture_interface::FrameRecord;
use drillcore::prelude::AnalysisStage;
use drillcore::processing::alignment::{AlignmentInput, AlignmentPath, AlignmentStage};
use drillcore::processing::scoring::{DrillReport, ScoringInput, ScoringStage};
use drillcore::processing::trajectory::TrajectoryStage;
use drillcore::telemetry::MetricsRecorder;
use log::info;

#[derive(Debug)]
pub struct AnalysisResult {
    pub alignment: AlignmentPath,
    pub report: DrillReport,
    pub feedback: Vec<String>,
}

/// Drives one baseline/player pair through extraction, alignment, and
/// scoring, then renders feedback.
pub struct Runner {
    config: WorkflowConfig,
    feedback: FeedbackGenerator,
    metrics: MetricsRecorder,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            feedback: FeedbackGenerator::new(),
            metrics: MetricsRecorder::new(),
        }
    }

    fn checked<T>(&self, result: anyhow::Result<T>) -> anyhow::Result<T> {
        match &result {
            Ok(_) => self.metrics.record_stage(),
            Err(_) => self.metrics.record_failure(),
        }
        result
    }

    pub fn execute(
        &self,
        baseline: &[FrameRecord],
        player: &[FrameRecord],
    ) -> anyhow::Result<AnalysisResult> {
        let stage_config = self.config.to_stage_config();

        let mut trajectory_stage = TrajectoryStage::new();
        trajectory_stage
            .initialize(&stage_config)
            .context("initializing trajectory stage")?;
        let baseline_trajectory = self.checked(
            trajectory_stage
                .execute(baseline.to_vec())
                .context("extracting baseline trajectory"),
        )?;
        let player_trajectory = self.checked(
            trajectory_stage
                .execute(player.to_vec())
                .context("extracting player trajectory"),
        )?;
        trajectory_stage.cleanup();

        let mut alignment_stage = AlignmentStage::new();
        alignment_stage
            .initialize(&stage_config)
            .context("initializing alignment stage")?;
        let alignment = self.checked(
            alignment_stage
                .execute(AlignmentInput {
                    baseline: baseline_trajectory,
                    player: player_trajectory,
                })
                .context("aligning trajectories"),
        )?;
        alignment_stage.cleanup();

        let mut scoring_stage = ScoringStage::new();
        scoring_stage
            .initialize(&stage_config)
            .context("initializing scoring stage")?;
        let report = self.checked(
            scoring_stage
                .execute(ScoringInput {
                    baseline: baseline.to_vec(),
                    player: player.to_vec(),
                    alignment: alignment.clone(),
                })
                .context("scoring drill"),
        )?;
        scoring_stage.cleanup();

        let feedback = self.feedback.generate(&report);
        let (stages_run, failures) = self.metrics.snapshot();
        info!(
            "pipeline complete: {} stage passes, {} failures, {} aligned pairs",
            stages_run,
            failures,
            alignment.aligned_frames.len()
        );

        Ok(AnalysisResult {
            alignment,
            report,
            feedback,
        })
    }
}
