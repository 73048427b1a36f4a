use drillcore::processing::scoring::{BallInteraction, DrillReport};

/// Threshold rules mapping a drill report to coaching messages.
///
/// Stateless and deterministic; the thresholds are degrees for form,
/// frames for the offset, and raw warp cost for the distance.
pub struct FeedbackGenerator {
    pub leg_diff_threshold: f32,
    pub good_form_threshold: f32,
    pub poor_form_threshold: f32,
    pub frame_offset_threshold: f32,
    pub dtw_distance_threshold: f32,
}

impl Default for FeedbackGenerator {
    fn default() -> Self {
        Self {
            leg_diff_threshold: 15.0,
            good_form_threshold: 15.0,
            poor_form_threshold: 25.0,
            frame_offset_threshold: 15.0,
            dtw_distance_threshold: 50.0,
        }
    }
}

impl FeedbackGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&self, report: &DrillReport) -> Vec<String> {
        let mut feedback = Vec::new();
        let form = &report.form_accuracy;
        let timing = &report.timing_consistency;
        let completion = &report.drill_completion;

        if form.left_leg_angle_diff > self.leg_diff_threshold {
            feedback.push(
                "Improve left leg form: bend your knee more during turns or sprints to match \
                 the coach's posture."
                    .to_string(),
            );
        }
        if form.right_leg_angle_diff > self.leg_diff_threshold {
            feedback.push(
                "Improve right leg form: align your ankle and knee closer to the coach's \
                 during footwork."
                    .to_string(),
            );
        }
        if form.overall_angle_diff < self.good_form_threshold {
            feedback
                .push("Good overall form! Your posture closely matches the coach's.".to_string());
        } else if form.overall_angle_diff > self.poor_form_threshold {
            feedback.push(
                "Significant form differences detected. Focus on aligning your body posture \
                 with the coach's."
                    .to_string(),
            );
        }

        if timing.avg_frame_offset > self.frame_offset_threshold {
            feedback.push(format!(
                "Timing issue: your actions are off by ~{} frames. Try to match the coach's \
                 pace, especially during transitions.",
                timing.avg_frame_offset as i64
            ));
        }
        if timing.dtw_distance > self.dtw_distance_threshold {
            feedback.push(
                "Large timing differences detected. Practice maintaining consistent speed \
                 throughout the drill."
                    .to_string(),
            );
        }

        if completion.missing_cones.is_empty() {
            feedback.push(
                "Great job! You interacted with all cones as in the coach's drill.".to_string(),
            );
        } else {
            feedback.push(format!(
                "Missed cones: {:?}. Ensure you navigate all cones as shown.",
                completion.missing_cones
            ));
        }

        feedback.push(match completion.ball_outcome {
            BallInteraction::BothPresent => {
                "Good ball control: you successfully interacted with the ball.".to_string()
            }
            BallInteraction::BothAbsent => {
                "No ball was part of this drill; nothing to match.".to_string()
            }
            BallInteraction::Mismatch => {
                "Ball engagement did not match the coach's drill. Ensure you engage with the \
                 ball as shown."
                    .to_string()
            }
        });

        feedback
    }
}
