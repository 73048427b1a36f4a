pub mod frame;
pub mod landmark;

pub use frame::{BoundingBox, FrameRecord, Keypoint, ObjectClass, TrackedObject};
pub use landmark::{AngleTriplet, PoseLandmark};
