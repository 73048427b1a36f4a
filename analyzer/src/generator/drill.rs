use anyhow::ensure;
use drillcore::capture_interface::{
    BoundingBox, FrameRecord, Keypoint, ObjectClass, PoseLandmark, TrackedObject,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Configuration for generating a synthetic drill capture pair.
///
/// Stands in for the external capture collaborator during offline runs and
/// tests; a generator is built per run from this config, never shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub frames: usize,
    /// Frames per leg-swing cycle.
    pub swing_period: f32,
    pub noise: f32,
    pub seed: u64,
    /// Player starts this many frames late relative to the baseline.
    pub phase_shift: usize,
    /// Probability that a joint drops to low visibility in a frame.
    pub dropout: f32,
    pub cone_ids: Vec<i64>,
    pub with_ball: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            frames: 120,
            swing_period: 30.0,
            noise: 0.01,
            seed: 0,
            phase_shift: 0,
            dropout: 0.0,
            cone_ids: vec![1, 2, 3],
            with_ball: true,
        }
    }
}

fn jittered(value: f32, noise: f32, rng: &mut StdRng) -> f32 {
    if noise > 0.0 {
        value + rng.gen_range(-noise..noise)
    } else {
        value
    }
}

fn swing_keypoint(
    x: f32,
    y: f32,
    config: &GeneratorConfig,
    rng: &mut StdRng,
) -> Keypoint {
    let visibility = if config.dropout > 0.0 && rng.gen::<f32>() < config.dropout {
        0.2
    } else {
        1.0
    };
    Keypoint::new(
        jittered(x, config.noise, rng),
        jittered(y, config.noise, rng),
        jittered(0.0, config.noise, rng),
        visibility,
    )
}

fn build_capture(
    config: &GeneratorConfig,
    phase_shift: usize,
    seed: u64,
) -> anyhow::Result<Vec<FrameRecord>> {
    ensure!(config.frames > 0, "generator needs at least one frame");
    ensure!(
        config.swing_period > 0.0,
        "swing period must be positive"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let cone_segment = (config.frames / config.cone_ids.len().max(1)).max(1);
    let mut frames = Vec::with_capacity(config.frames);

    for frame_index in 0..config.frames {
        let phase = (frame_index + phase_shift) as f32 / config.swing_period * 2.0 * PI;
        let swing = phase.sin();

        let mut record = FrameRecord::new(frame_index as u32);
        let keypoints = [
            (PoseLandmark::LeftHip, 0.45, 0.50),
            (PoseLandmark::RightHip, 0.55, 0.50),
            (PoseLandmark::LeftKnee, 0.45 + 0.05 * swing, 0.65),
            (PoseLandmark::RightKnee, 0.55 - 0.05 * swing, 0.65),
            (PoseLandmark::LeftAnkle, 0.45 + 0.10 * swing, 0.80),
            (PoseLandmark::RightAnkle, 0.55 - 0.10 * swing, 0.80),
        ];
        for (landmark, x, y) in keypoints {
            record
                .player_keypoints
                .insert(landmark.index(), swing_keypoint(x, y, config, &mut rng));
        }

        if !config.cone_ids.is_empty() {
            let cone_slot = (frame_index / cone_segment).min(config.cone_ids.len() - 1);
            let track_id = config.cone_ids[cone_slot];
            record.objects.push(TrackedObject {
                track_id,
                class: ObjectClass::Cone,
                bbox: BoundingBox {
                    x1: 100.0 + 50.0 * cone_slot as f32,
                    y1: 400.0,
                    x2: 140.0 + 50.0 * cone_slot as f32,
                    y2: 460.0,
                },
            });
        }

        if config.with_ball && frame_index % 4 == 0 {
            record.objects.push(TrackedObject {
                track_id: 99,
                class: ObjectClass::Ball,
                bbox: BoundingBox {
                    x1: 300.0,
                    y1: 500.0,
                    x2: 330.0,
                    y2: 530.0,
                },
            });
        }

        frames.push(record);
    }

    Ok(frames)
}

/// Builds a (baseline, player) capture pair; the player lags the baseline by
/// the configured phase shift and gets independent jitter.
pub fn build_drill_pair(
    config: &GeneratorConfig,
) -> anyhow::Result<(Vec<FrameRecord>, Vec<FrameRecord>)> {
    let baseline = build_capture(config, 0, config.seed)?;
    let player = build_capture(config, config.phase_shift, config.seed.wrapping_add(1))?;
    Ok((baseline, player))
}
