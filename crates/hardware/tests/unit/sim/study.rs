//! Blocking-Factor Study Tests.

use std::fs;

use cachesim_core::config::{CacheConfig, ReplacementPolicy};
use cachesim_core::sim::{BlockingStudy, MatmulTrace, SimError, Simulator, write_study};
use pretty_assertions::assert_eq;

fn small_config() -> CacheConfig {
    CacheConfig {
        seed: Some(3),
        ..CacheConfig::from_capacity(1024, 16, 2).unwrap()
    }
}

fn small_study() -> BlockingStudy {
    BlockingStudy {
        policies: vec![ReplacementPolicy::Fifo, ReplacementPolicy::Lru],
        blocking_factors: vec![1, 2, 4],
        matrix_sizes: vec![4, 8],
    }
}

// ══════════════════════════════════════════════════════════
// 1. Series
// ══════════════════════════════════════════════════════════

#[test]
fn one_series_per_policy_and_blocking_factor() {
    let series = small_study().run(&small_config()).unwrap();
    let keys: Vec<_> = series.iter().map(|s| (s.policy, s.blocking_factor)).collect();
    assert_eq!(
        keys,
        vec![
            (ReplacementPolicy::Fifo, 1),
            (ReplacementPolicy::Fifo, 2),
            (ReplacementPolicy::Fifo, 4),
            (ReplacementPolicy::Lru, 1),
            (ReplacementPolicy::Lru, 2),
            (ReplacementPolicy::Lru, 4),
        ]
    );
    for s in &series {
        let sizes: Vec<usize> = s.points.iter().map(|&(size, _)| size).collect();
        assert_eq!(sizes, vec![4, 8]);
        assert!(
            s.points
                .iter()
                .all(|&(_, rate)| rate.is_some_and(|r| (0.0..=1.0).contains(&r)))
        );
    }
}

/// Each point is a fresh write-no-allocate run of the matching trace.
#[test]
fn points_match_a_direct_write_no_allocate_run() {
    let series = small_study().run(&small_config()).unwrap();
    let lru_bf2 = series
        .iter()
        .find(|s| s.policy == ReplacementPolicy::Lru && s.blocking_factor == 2)
        .unwrap();

    let config = CacheConfig {
        policy: ReplacementPolicy::Lru,
        write_no_allocate: true,
        ..small_config()
    };
    let trace = MatmulTrace::new(8, 2).unwrap().to_trace();
    let mut sim = Simulator::for_trace(&config, &trace).unwrap();
    let expected = sim.run(&trace).unwrap().hit_rate();
    assert_eq!(lru_bf2.points[1], (8, expected));
}

#[test]
fn blocking_factor_must_divide_every_size() {
    let study = BlockingStudy {
        blocking_factors: vec![4],
        matrix_sizes: vec![8, 6],
        ..small_study()
    };
    assert!(matches!(
        study.run(&small_config()),
        Err(SimError::InvalidWorkload(_))
    ));
}

// ══════════════════════════════════════════════════════════
// 2. Result files
// ══════════════════════════════════════════════════════════

#[test]
fn writes_one_results_file_per_series() {
    let dir = tempfile::tempdir().unwrap();
    let series = small_study().run(&small_config()).unwrap();
    let paths = write_study(dir.path(), &series).unwrap();
    assert_eq!(paths.len(), 6);
    assert_eq!(paths[0], dir.path().join("results-FIFOCache-1.txt"));
    assert_eq!(paths[5], dir.path().join("results-LRUCache-4.txt"));

    for (path, s) in paths.iter().zip(&series) {
        let text = fs::read_to_string(path).unwrap();
        let expected: Vec<String> = s
            .points
            .iter()
            .map(|&(size, rate)| format!("{size},{}", rate.unwrap()))
            .collect();
        assert_eq!(text, expected.join("\n"));
    }
}
