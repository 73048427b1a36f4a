use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::prelude::{AnalysisStage, EndpointLocking, StageConfig, StageError, StageResult};
use crate::processing::trajectory::Trajectory;
use crate::telemetry::log::StageLogger;

/// Pointwise distance over two trajectory rows.
pub type PointMetric = fn(ArrayView1<'_, f32>, ArrayView1<'_, f32>) -> f32;

/// Default metric: Euclidean distance over the concatenated joint vector.
pub fn euclidean(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// One step of the warping path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedPair {
    pub baseline_frame: usize,
    pub player_frame: usize,
}

/// Monotonic frame correspondence plus the cumulative warping cost.
///
/// Serializes directly as the persisted alignment document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentPath {
    pub aligned_frames: Vec<AlignedPair>,
    pub dtw_distance: f32,
}

/// Input payload for the alignment stage.
pub struct AlignmentInput {
    pub baseline: Trajectory,
    pub player: Trajectory,
}

/// Dynamic-time-warping stage over two equal-width trajectories.
///
/// Builds the classic cumulative-cost matrix, cell (i, j) = metric(A[i], B[j])
/// + min of the three predecessors, first row/column seeded by cumulative
/// sums along the border. Backtracks along argmin predecessors (diagonal
/// preferred on ties). Endpoint handling follows the configured
/// `EndpointLocking`; the reported distance is the cumulative cost at the
/// path terminus.
pub struct AlignmentStage {
    config: Option<StageConfig>,
    metric: PointMetric,
    logger: StageLogger,
}

impl AlignmentStage {
    pub fn new() -> Self {
        Self::with_metric(euclidean)
    }

    pub fn with_metric(metric: PointMetric) -> Self {
        Self {
            config: None,
            metric,
            logger: StageLogger::new("alignment"),
        }
    }

    /// Sakoe-Chiba band membership, with the band center scaled to the
    /// length ratio so unequal-length trajectories stay connected.
    fn within_band(i: usize, j: usize, rows: usize, cols: usize, radius: Option<usize>) -> bool {
        let Some(radius) = radius else {
            return true;
        };
        let center = if rows > 1 {
            i as f32 * (cols.saturating_sub(1)) as f32 / (rows - 1) as f32
        } else {
            0.0
        };
        (j as f32 - center).abs() <= radius as f32
    }
}

impl Default for AlignmentStage {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisStage for AlignmentStage {
    type Input = AlignmentInput;
    type Output = AlignmentPath;

    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: Self::Input) -> StageResult<Self::Output> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let rows = input.baseline.nrows();
        let cols = input.player.nrows();
        if rows == 0 || cols == 0 {
            return Err(StageError::InvalidInput(
                "cannot align an empty trajectory".into(),
            ));
        }
        if input.baseline.ncols() != input.player.ncols() {
            return Err(StageError::InvalidInput(format!(
                "trajectory widths differ: baseline {} vs player {}",
                input.baseline.ncols(),
                input.player.ncols()
            )));
        }
        let cells = rows
            .checked_mul(cols)
            .ok_or_else(|| StageError::CapacityExceeded("cost matrix size overflow".into()))?;
        if cells > config.max_cost_cells {
            return Err(StageError::CapacityExceeded(format!(
                "cost matrix needs {} cells, cap is {}",
                cells, config.max_cost_cells
            )));
        }

        let mut cost = Array2::from_elem((rows, cols), f32::INFINITY);
        for i in 0..rows {
            for j in 0..cols {
                if !Self::within_band(i, j, rows, cols, config.band_radius) {
                    continue;
                }
                let distance = (self.metric)(input.baseline.row(i), input.player.row(j));
                let best = if i == 0 && j == 0 {
                    0.0
                } else {
                    let mut best = f32::INFINITY;
                    if i > 0 {
                        best = best.min(cost[[i - 1, j]]);
                    }
                    if j > 0 {
                        best = best.min(cost[[i, j - 1]]);
                    }
                    if i > 0 && j > 0 {
                        best = best.min(cost[[i - 1, j - 1]]);
                    }
                    best
                };
                cost[[i, j]] = distance + best;
            }
        }

        let (mut i, mut j) = match config.endpoint_locking {
            EndpointLocking::Locked => (rows - 1, cols - 1),
            EndpointLocking::FreeEnd => {
                let mut end = (rows - 1, cols - 1);
                let mut best = cost[end];
                for j in 0..cols {
                    if cost[[rows - 1, j]] < best {
                        best = cost[[rows - 1, j]];
                        end = (rows - 1, j);
                    }
                }
                for i in 0..rows {
                    if cost[[i, cols - 1]] < best {
                        best = cost[[i, cols - 1]];
                        end = (i, cols - 1);
                    }
                }
                end
            }
        };

        let dtw_distance = cost[[i, j]];
        if !dtw_distance.is_finite() {
            return Err(StageError::InvalidInput(
                "band radius too narrow to connect the trajectories".into(),
            ));
        }

        let mut aligned_frames = vec![AlignedPair {
            baseline_frame: i,
            player_frame: j,
        }];
        while i > 0 || j > 0 {
            let mut next = (i, j);
            let mut best = f32::INFINITY;
            if i > 0 && j > 0 && cost[[i - 1, j - 1]] <= best {
                best = cost[[i - 1, j - 1]];
                next = (i - 1, j - 1);
            }
            if i > 0 && cost[[i - 1, j]] < best {
                best = cost[[i - 1, j]];
                next = (i - 1, j);
            }
            if j > 0 && cost[[i, j - 1]] < best {
                next = (i, j - 1);
            }
            i = next.0;
            j = next.1;
            aligned_frames.push(AlignedPair {
                baseline_frame: i,
                player_frame: j,
            });
        }
        aligned_frames.reverse();

        self.logger.record(&format!(
            "aligned {}x{} frames, path length {}, distance {:.4}",
            rows,
            cols,
            aligned_frames.len(),
            dtw_distance
        ));

        Ok(AlignmentPath {
            aligned_frames,
            dtw_distance,
        })
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}
