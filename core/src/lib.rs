//! Core pipeline for comparing a learner's drill performance against a
//! coach's baseline recording.
//!
//! The modules mirror the capture -> align -> score flow of the legacy
//! analysis scripts while providing typed stages, explicit configuration,
//! and well-defined interchange documents.

pub mod capture_interface;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{AnalysisStage, StageConfig, StageError, StageResult};
