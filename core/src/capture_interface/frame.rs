use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Single body-landmark estimate for one frame.
///
/// Coordinates are normalized image coordinates (z is relative depth from
/// the pose estimator); `visibility` is the estimator's confidence in 0..1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub visibility: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility,
        }
    }

    /// Whether the estimate clears the confidence threshold.
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility > threshold
    }
}

/// Object classes the external detector/tracker emits.
///
/// Classes this pipeline does not score deserialize as `Unknown` instead of
/// failing the whole capture document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectClass {
    Cone,
    Ball,
    Unknown,
}

impl<'de> Deserialize<'de> for ObjectClass {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "cone" => Self::Cone,
            "ball" => Self::Ball,
            _ => Self::Unknown,
        })
    }
}

/// Axis-aligned detection box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// One tracked detection; `track_id` is stable across frames while tracked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    pub track_id: i64,
    pub class: ObjectClass,
    pub bbox: BoundingBox,
}

/// Per-frame pose + object record produced by the capture collaborator.
///
/// Records are frame-ordered and read-only after capture. The JSON field
/// names are the persisted interchange contract; keypoints are keyed by the
/// canonical landmark index (0-32) rendered as a string key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: u32,
    pub player_keypoints: BTreeMap<u32, Keypoint>,
    pub objects: Vec<TrackedObject>,
}

impl FrameRecord {
    pub fn new(frame: u32) -> Self {
        Self {
            frame,
            player_keypoints: BTreeMap::new(),
            objects: Vec::new(),
        }
    }

    pub fn keypoint(&self, joint_id: u32) -> Option<&Keypoint> {
        self.player_keypoints.get(&joint_id)
    }

    /// Whether any tracked object of the given class appears in this frame.
    pub fn has_object_class(&self, class: ObjectClass) -> bool {
        self.objects.iter().any(|object| object.class == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_record_parses_capture_contract() {
        let document = r#"[
            {
                "frame": 0,
                "player_keypoints": {
                    "23": {"x": 0.4, "y": 0.5, "z": -0.1, "visibility": 0.98}
                },
                "objects": [
                    {
                        "track_id": 7,
                        "class": "cone",
                        "bbox": {"x1": 10.0, "y1": 20.0, "x2": 30.0, "y2": 40.0}
                    },
                    {
                        "track_id": 99,
                        "class": "ball",
                        "bbox": {"x1": 1.0, "y1": 2.0, "x2": 3.0, "y2": 4.0}
                    }
                ]
            }
        ]"#;

        let frames: Vec<FrameRecord> = serde_json::from_str(document).unwrap();
        assert_eq!(frames.len(), 1);
        let record = &frames[0];
        assert_eq!(record.frame, 0);
        assert_eq!(record.keypoint(23).unwrap().x, 0.4);
        assert!(record.has_object_class(ObjectClass::Cone));
        assert!(record.has_object_class(ObjectClass::Ball));
        assert_eq!(record.objects[0].track_id, 7);
    }

    #[test]
    fn unknown_object_classes_do_not_fail_parsing() {
        let json = r#"{"track_id": 1, "class": "goalpost",
                       "bbox": {"x1": 0.0, "y1": 0.0, "x2": 1.0, "y2": 1.0}}"#;
        let object: TrackedObject = serde_json::from_str(json).unwrap();
        assert_eq!(object.class, ObjectClass::Unknown);
    }

    #[test]
    fn keypoint_map_round_trips_with_string_keys() {
        let mut record = FrameRecord::new(3);
        record
            .player_keypoints
            .insert(25, Keypoint::new(0.1, 0.2, 0.0, 1.0));

        let serialized = serde_json::to_string(&record).unwrap();
        assert!(serialized.contains("\"25\""));
        let parsed: FrameRecord = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn visibility_threshold_is_exclusive() {
        let keypoint = Keypoint::new(0.0, 0.0, 0.0, 0.5);
        assert!(!keypoint.is_visible(0.5));
        assert!(keypoint.is_visible(0.4));
    }
}
