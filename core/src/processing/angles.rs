use std::collections::BTreeMap;

use crate::capture_interface::landmark::AngleTriplet;
use crate::capture_interface::Keypoint;
use crate::math::geometry::GeometryHelper;
use crate::prelude::StageConfig;

/// Angle measurement for one triplet in one frame.
///
/// `Unavailable` marks triplets with missing or low-confidence joints; it is
/// excluded from aggregation rather than folded into the mean as a zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleSample {
    Measured(f32),
    Unavailable,
}

impl AngleSample {
    /// Degrees at the persisted-contract level: `Unavailable` collapses to
    /// the legacy 0.0 sentinel.
    pub fn degrees(self) -> f32 {
        match self {
            Self::Measured(degrees) => degrees,
            Self::Unavailable => 0.0,
        }
    }

    pub fn is_measured(self) -> bool {
        matches!(self, Self::Measured(_))
    }
}

/// Angles for all configured triplets of one frame, in triplet order.
pub type AngleSet = Vec<AngleSample>;

/// Per-frame evaluator of the configured joint-angle triplets.
///
/// Angles use x and y only; depth from the pose estimator is too noisy to
/// contribute here. All three joints must be present and clear the
/// visibility threshold, otherwise the triplet is `Unavailable`.
pub struct JointAngleEvaluator {
    triplets: Vec<AngleTriplet>,
    visibility_threshold: f32,
}

impl JointAngleEvaluator {
    pub fn new(triplets: Vec<AngleTriplet>, visibility_threshold: f32) -> Self {
        Self {
            triplets,
            visibility_threshold,
        }
    }

    pub fn from_config(config: &StageConfig) -> Self {
        Self::new(config.angle_triplets.clone(), config.visibility_threshold)
    }

    pub fn triplet_count(&self) -> usize {
        self.triplets.len()
    }

    pub fn evaluate(&self, keypoints: &BTreeMap<u32, Keypoint>) -> AngleSet {
        self.triplets
            .iter()
            .map(|triplet| self.evaluate_triplet(keypoints, triplet))
            .collect()
    }

    fn evaluate_triplet(
        &self,
        keypoints: &BTreeMap<u32, Keypoint>,
        triplet: &AngleTriplet,
    ) -> AngleSample {
        let first = keypoints.get(&triplet.first);
        let vertex = keypoints.get(&triplet.vertex);
        let last = keypoints.get(&triplet.last);
        match (first, vertex, last) {
            (Some(first), Some(vertex), Some(last))
                if first.is_visible(self.visibility_threshold)
                    && vertex.is_visible(self.visibility_threshold)
                    && last.is_visible(self.visibility_threshold) =>
            {
                AngleSample::Measured(GeometryHelper::angle_degrees(
                    (first.x, first.y),
                    (vertex.x, vertex.y),
                    (last.x, last.y),
                ))
            }
            _ => AngleSample::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg_triplet() -> AngleTriplet {
        AngleTriplet::new(23, 25, 27)
    }

    fn keypoints(visibility: f32) -> BTreeMap<u32, Keypoint> {
        let mut map = BTreeMap::new();
        map.insert(23, Keypoint::new(0.5, 0.4, 0.0, visibility));
        map.insert(25, Keypoint::new(0.5, 0.6, 0.0, visibility));
        map.insert(27, Keypoint::new(0.5, 0.8, 0.0, visibility));
        map
    }

    #[test]
    fn straight_leg_measures_near_straight() {
        let evaluator = JointAngleEvaluator::new(vec![leg_triplet()], 0.5);
        let angles = evaluator.evaluate(&keypoints(1.0));
        match angles[0] {
            AngleSample::Measured(degrees) => assert!((degrees - 180.0).abs() < 1e-3),
            AngleSample::Unavailable => panic!("expected a measured angle"),
        }
    }

    #[test]
    fn low_visibility_joints_are_unavailable() {
        let evaluator = JointAngleEvaluator::new(vec![leg_triplet()], 0.5);
        let angles = evaluator.evaluate(&keypoints(0.5));
        assert_eq!(angles[0], AngleSample::Unavailable);
        assert_eq!(angles[0].degrees(), 0.0);
    }

    #[test]
    fn missing_joint_is_unavailable() {
        let evaluator = JointAngleEvaluator::new(vec![leg_triplet()], 0.5);
        let mut map = keypoints(1.0);
        map.remove(&27);
        let angles = evaluator.evaluate(&map);
        assert_eq!(angles[0], AngleSample::Unavailable);
    }

    #[test]
    fn depth_does_not_affect_the_angle() {
        let evaluator = JointAngleEvaluator::new(vec![leg_triplet()], 0.5);
        let mut shifted = keypoints(1.0);
        for keypoint in shifted.values_mut() {
            keypoint.z = 0.9;
        }
        let baseline = evaluator.evaluate(&keypoints(1.0));
        let with_depth = evaluator.evaluate(&shifted);
        assert_eq!(baseline[0].degrees(), with_depth[0].degrees());
    }

    #[test]
    fn coincident_endpoints_measure_zero_degrees() {
        let evaluator = JointAngleEvaluator::new(vec![AngleTriplet::new(23, 25, 23)], 0.5);
        let angles = evaluator.evaluate(&keypoints(1.0));
        match angles[0] {
            AngleSample::Measured(degrees) => assert!(degrees.abs() < 1e-4),
            AngleSample::Unavailable => panic!("expected a measured angle"),
        }
    }
}
