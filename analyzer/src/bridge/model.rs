use crate::workflow::runner::AnalysisResult;
use drillcore::processing::scoring::DrillReport;
use serde::{Deserialize, Serialize};

/// Latest analysis published over the HTTP bridge.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisModel {
    pub aligned_pairs: usize,
    pub dtw_distance: f32,
    pub report: Option<DrillReport>,
    pub feedback: Vec<String>,
}

impl AnalysisModel {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            aligned_pairs: result.alignment.aligned_frames.len(),
            dtw_distance: result.alignment.dtw_distance,
            report: Some(result.report.clone()),
            feedback: result.feedback.clone(),
        }
    }
}
