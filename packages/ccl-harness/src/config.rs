use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

/// The property-test matrix this harness sweeps: every `(vertex_count,
/// density, process_count)` combination is run once and checked against
/// the sequential reference solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixConfig {
    pub vertex_counts: Vec<i32>,
    /// average-degree multipliers; edge count for a case is
    /// `(density * vertex_count).round()`.
    pub densities: Vec<f64>,
    pub process_counts: Vec<usize>,
    pub seed: u64,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        MatrixConfig {
            vertex_counts: vec![100, 1_000, 10_000],
            densities: vec![1.5, 3.0, 10.0],
            process_counts: vec![1, 2, 4, 8],
            seed: 0x5eed_1234,
        }
    }
}

impl MatrixConfig {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
