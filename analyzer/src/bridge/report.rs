use crate::bridge::model::AnalysisModel;
use crate::workflow::runner::Runner;
use anyhow::Result;
use drillcore::capture_interface::FrameRecord;
use serde::Deserialize;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

fn bridge_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9100))
}

#[derive(Debug)]
struct BridgeError;

impl warp::reject::Reject for BridgeError {}

/// Capture pair submitted for on-demand analysis.
#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    baseline: Vec<FrameRecord>,
    player: Vec<FrameRecord>,
}

/// Bridge that hosts the report HTTP endpoint and analyzes incoming
/// capture documents.
pub struct ReportBridge {
    state: Arc<RwLock<AnalysisModel>>,
}

impl ReportBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        let state = Arc::new(RwLock::new(AnalysisModel::default()));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("report")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<AnalysisModel>>| warp::reply::json(&*state.read().unwrap()));

        let analyze_route = warp::path("analyze")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |request: AnalyzeRequest,
                 state: Arc<RwLock<AnalysisModel>>,
                 runner: Arc<Runner>| async move {
                    match runner.execute(&request.baseline, &request.player) {
                        Ok(result) => {
                            let model = AnalysisModel::from_result(&result);
                            let mut guard = state.write().unwrap();
                            *guard = model;
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "aligned_pairs": result.alignment.aligned_frames.len(),
                                    "overall_angle_diff":
                                        result.report.form_accuracy.overall_angle_diff
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("analyze error: {}", err);
                            Err(warp::reject::custom(BridgeError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(analyze_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(bridge_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish(&self, model: &AnalysisModel) -> Result<()> {
        let mut guard = self.state.write().unwrap();
        *guard = model.clone();
        println!(
            "[bridge] aligned pairs: {}, dtw distance: {:.2}",
            guard.aligned_pairs, guard.dtw_distance
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[bridge] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> AnalysisModel {
        self.state.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::drill::{build_drill_pair, GeneratorConfig};
    use crate::workflow::config::WorkflowConfig;
    use std::sync::Arc;

    #[test]
    fn report_bridge_updates_state() {
        let runner = Arc::new(Runner::new(WorkflowConfig::default()));
        let bridge = ReportBridge::new(runner.clone());
        let generator_config = GeneratorConfig {
            frames: 20,
            ..GeneratorConfig::default()
        };
        let (baseline, player) = build_drill_pair(&generator_config).unwrap();
        let result = runner.execute(&baseline, &player).unwrap();
        bridge.publish(&AnalysisModel::from_result(&result)).unwrap();
        assert_eq!(
            bridge.snapshot().aligned_pairs,
            result.alignment.aligned_frames.len()
        );
        assert!(bridge.snapshot().report.is_some());
    }
}
