//! The property-test matrix: every `(vertex_count, density,
//! process_count)` combination gets its own random graph, run once through
//! the engine and once through the sequential reference, and compared.

use ccl_core::{logger::Logger, reader::InMemoryEdgeList};
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    config::MatrixConfig,
    random::generate_graph,
    reference::{same_partition, sequential_components},
};

#[derive(Debug, Clone, Serialize)]
pub struct MatrixCase {
    pub vertex_count: i32,
    pub density: f64,
    pub process_count: usize,
    pub passed: bool,
    pub error: Option<String>,
}

/// Runs every case in `config`'s matrix and returns one result per case, in
/// an unspecified order (cases run concurrently via rayon).
pub fn run_matrix(config: &MatrixConfig, logger: &Logger) -> Vec<MatrixCase> {
    let cases: Vec<(i32, f64, usize)> = config
        .vertex_counts
        .iter()
        .flat_map(|&v| {
            config.densities.iter().flat_map(move |&d| {
                config.process_counts.iter().map(move |&p| (v, d, p))
            })
        })
        .collect();

    logger.info(&format!("running {} matrix cases", cases.len()));

    cases
        .into_par_iter()
        .map(|(vertex_count, density, process_count)| {
            run_one_case(config.seed, vertex_count, density, process_count)
        })
        .collect()
}

fn run_one_case(seed: u64, vertex_count: i32, density: f64, process_count: usize) -> MatrixCase {
    if process_count == 0 || !process_count.is_power_of_two() || (vertex_count as i64) < process_count as i64 {
        return MatrixCase {
            vertex_count,
            density,
            process_count,
            passed: true,
            error: Some("skipped: process_count does not satisfy V >= P, P = 2^n".to_string()),
        };
    }

    let case_seed = seed ^ (vertex_count as u64) ^ ((density.to_bits()) << 1) ^ (process_count as u64);
    let edge_count = (density * vertex_count as f64).round().max(0.0) as usize;
    let rows = generate_graph(case_seed, vertex_count, edge_count);

    let expected = sequential_components(&rows);
    let reader = InMemoryEdgeList::new(rows);

    match ccl_core::run(&reader, process_count, None) {
        Ok(result) => {
            let actual: Vec<_> = result.per_rank_labels.into_iter().flatten().collect();
            let passed = same_partition(&expected, &actual);
            MatrixCase {
                vertex_count,
                density,
                process_count,
                passed,
                error: if passed { None } else { Some("partition mismatch against reference solver".to_string()) },
            }
        }
        Err(e) => MatrixCase {
            vertex_count,
            density,
            process_count,
            passed: false,
            error: Some(e.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_small_matrix_agrees_with_the_reference_solver() {
        let config = MatrixConfig {
            vertex_counts: vec![16],
            densities: vec![2.0],
            process_counts: vec![1, 2, 4],
            seed: 99,
        };
        let logger = ccl_core::logger::Logger::new(ccl_core::logger::LogLevel::Error, "test".into(), None);
        let results = run_matrix(&config, &logger);
        assert_eq!(results.len(), 3);
        for case in &results {
            assert!(case.passed, "case {case:?} failed: {:?}", case.error);
        }
    }
}
