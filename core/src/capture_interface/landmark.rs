use serde::{Deserialize, Serialize};

/// Canonical 33-landmark pose topology used by the capture collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    pub const COUNT: usize = 33;

    pub const fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEyeInner),
            2 => Some(Self::LeftEye),
            3 => Some(Self::LeftEyeOuter),
            4 => Some(Self::RightEyeInner),
            5 => Some(Self::RightEye),
            6 => Some(Self::RightEyeOuter),
            7 => Some(Self::LeftEar),
            8 => Some(Self::RightEar),
            9 => Some(Self::MouthLeft),
            10 => Some(Self::MouthRight),
            11 => Some(Self::LeftShoulder),
            12 => Some(Self::RightShoulder),
            13 => Some(Self::LeftElbow),
            14 => Some(Self::RightElbow),
            15 => Some(Self::LeftWrist),
            16 => Some(Self::RightWrist),
            17 => Some(Self::LeftPinky),
            18 => Some(Self::RightPinky),
            19 => Some(Self::LeftIndex),
            20 => Some(Self::RightIndex),
            21 => Some(Self::LeftThumb),
            22 => Some(Self::RightThumb),
            23 => Some(Self::LeftHip),
            24 => Some(Self::RightHip),
            25 => Some(Self::LeftKnee),
            26 => Some(Self::RightKnee),
            27 => Some(Self::LeftAnkle),
            28 => Some(Self::RightAnkle),
            29 => Some(Self::LeftHeel),
            30 => Some(Self::RightHeel),
            31 => Some(Self::LeftFootIndex),
            32 => Some(Self::RightFootIndex),
            _ => None,
        }
    }
}

/// Three joint ids defining one measured body angle, vertex in the middle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleTriplet {
    pub first: u32,
    pub vertex: u32,
    pub last: u32,
}

impl AngleTriplet {
    pub const fn new(first: u32, vertex: u32, last: u32) -> Self {
        Self {
            first,
            vertex,
            last,
        }
    }
}

/// Lower-body joints driving the alignment trajectory: both hips, knees,
/// and ankles, in that order (order fixes the trajectory column layout).
pub fn default_alignment_joints() -> Vec<u32> {
    vec![
        PoseLandmark::LeftHip.index(),
        PoseLandmark::RightHip.index(),
        PoseLandmark::LeftKnee.index(),
        PoseLandmark::RightKnee.index(),
        PoseLandmark::LeftAnkle.index(),
        PoseLandmark::RightAnkle.index(),
    ]
}

/// Scored triplets: left hip-knee-ankle, then right hip-knee-ankle.
pub fn default_angle_triplets() -> Vec<AngleTriplet> {
    vec![
        AngleTriplet::new(
            PoseLandmark::LeftHip.index(),
            PoseLandmark::LeftKnee.index(),
            PoseLandmark::LeftAnkle.index(),
        ),
        AngleTriplet::new(
            PoseLandmark::RightHip.index(),
            PoseLandmark::RightKnee.index(),
            PoseLandmark::RightAnkle.index(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landmark_indices_round_trip() {
        for index in 0..PoseLandmark::COUNT as u32 {
            let landmark = PoseLandmark::from_index(index).unwrap();
            assert_eq!(landmark.index(), index);
        }
        assert_eq!(PoseLandmark::from_index(33), None);
    }

    #[test]
    fn default_joints_are_the_lower_body() {
        assert_eq!(default_alignment_joints(), vec![23, 24, 25, 26, 27, 28]);
    }

    #[test]
    fn default_triplets_pivot_on_the_knees() {
        let triplets = default_angle_triplets();
        assert_eq!(triplets[0].vertex, PoseLandmark::LeftKnee.index());
        assert_eq!(triplets[1].vertex, PoseLandmark::RightKnee.index());
    }
}
