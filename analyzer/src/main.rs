use anyhow::Context;
use bridge::model::AnalysisModel;
use bridge::report::ReportBridge;
use clap::Parser;
use drillcore::capture_interface::FrameRecord;
use generator::drill::{build_drill_pair, GeneratorConfig};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod bridge;
mod feedback;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Drill analysis workflow driver")]
struct Args {
    /// Baseline (coach) capture document
    #[arg(long)]
    baseline: Option<PathBuf>,
    /// Player capture document
    #[arg(long)]
    player: Option<PathBuf>,
    /// Analyze a generated synthetic drill pair instead of capture files
    #[arg(long, default_value_t = false)]
    synthetic: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value = "alignment_data.json")]
    alignment_out: PathBuf,
    #[arg(long, default_value = "movement_analysis.json")]
    report_out: PathBuf,
    #[arg(long, default_value = "feedback_text.json")]
    feedback_out: PathBuf,
    /// Keep the HTTP report bridge alive for incoming capture documents
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn load_capture(path: &Path) -> anyhow::Result<Vec<FrameRecord>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading capture document {}", path.display()))?;
    let frames: Vec<FrameRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing capture document {}", path.display()))?;
    Ok(frames)
}

fn write_document<T: serde::Serialize>(path: &Path, document: &T) -> anyhow::Result<()> {
    let contents = serde_json::to_string_pretty(document)?;
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::default()
    };

    let runner = Arc::new(Runner::new(workflow_config));
    let bridge = ReportBridge::new(runner.clone());

    let capture_pair = if args.synthetic {
        Some(build_drill_pair(&GeneratorConfig::default())?)
    } else if let (Some(baseline), Some(player)) = (args.baseline.as_ref(), args.player.as_ref()) {
        Some((load_capture(baseline)?, load_capture(player)?))
    } else if !args.serve {
        anyhow::bail!("provide --baseline and --player, or --synthetic, or --serve");
    } else {
        None
    };

    if let Some((baseline, player)) = capture_pair {
        let result = runner.execute(&baseline, &player)?;

        println!(
            "Offline run -> {} aligned pairs, overall angle diff {:.2} deg, dtw distance {:.2}",
            result.alignment.aligned_frames.len(),
            result.report.form_accuracy.overall_angle_diff,
            result.alignment.dtw_distance
        );

        write_document(&args.alignment_out, &result.alignment)?;
        write_document(&args.report_out, &result.report)?;
        write_document(&args.feedback_out, &json!({ "feedback": result.feedback }))?;

        for line in &result.feedback {
            println!("  - {}", line);
        }

        bridge.publish(&AnalysisModel::from_result(&result))?;
        bridge.publish_status("Offline analysis results ready.");
    }

    if args.serve {
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
