//! Trace Replay Tests.

use cachesim_core::common::AccessOutcome;
use cachesim_core::config::{CacheConfig, ReplacementPolicy};
use cachesim_core::sim::{MatmulTrace, Simulator, Trace};
use pretty_assertions::assert_eq;

use crate::common::harness::init_tracing;

fn config(policy: ReplacementPolicy) -> CacheConfig {
    CacheConfig {
        sets: 16,
        ways: 3,
        block_size: 1,
        policy,
        seed: Some(1),
        ..CacheConfig::default()
    }
}

/// The sample address of the trace fixes the address width.
#[test]
fn address_width_comes_from_the_trace() {
    init_tracing();
    let trace = Trace::from_reader("W 0xa2b\nR 0xa2b\n".as_bytes()).unwrap();
    let mut sim = Simulator::for_trace(&config(ReplacementPolicy::Fifo), &trace).unwrap();
    assert_eq!(sim.cache.geometry().address_bits(), 12);
    assert_eq!(sim.cache.geometry().tag_bits(), 8);

    let stats = sim.run(&trace).unwrap();
    assert_eq!(stats.access_count, 2);
    assert_eq!(stats.hit_count(), 1);
}

/// A trace opening on a small address still runs under the default geometry.
#[test]
fn small_first_address_widens_instead_of_failing() {
    let trace = Trace::from_reader("R 0x0\nR 0x10\nR 0xb7737f64\nR 0x0\n".as_bytes()).unwrap();
    let mut sim = Simulator::for_trace(&CacheConfig::default(), &trace).unwrap();
    let geometry = sim.cache.geometry();
    assert_eq!(
        geometry.address_bits(),
        geometry.block_offset_bits() + geometry.set_index_bits()
    );
    let stats = sim.run(&trace).unwrap();
    assert_eq!(stats.access_count, 4);
    assert_eq!(stats.cold_miss_count, 2);
    assert_eq!(stats.hit_count(), 2);

    let decimal = Trace::from_reader("R 16\nW 16\n".as_bytes()).unwrap();
    let mut sim = Simulator::for_trace(&CacheConfig::default(), &decimal).unwrap();
    assert_eq!(sim.run(&decimal).unwrap().access_count, 2);
}

#[test]
fn empty_trace_keeps_configured_width() {
    let trace = Trace::default();
    let mut sim = Simulator::for_trace(&config(ReplacementPolicy::Lru), &trace).unwrap();
    assert_eq!(sim.cache.geometry().address_bits(), 32);
    let stats = sim.run(&trace).unwrap();
    assert_eq!(stats.hit_rate(), None);
}

#[test]
fn step_reports_each_outcome() {
    let trace = Trace::from_reader("R 0x1\nR 0x1\nR 0x11\nR 0x21\nR 0x31\nR 0x1\n".as_bytes())
        .unwrap();
    let mut sim = Simulator::new(&config(ReplacementPolicy::Fifo)).unwrap();
    let outcomes: Vec<_> = trace.entries().iter().map(|e| sim.step(e).unwrap()).collect();
    assert_eq!(
        outcomes,
        vec![
            AccessOutcome::ColdMiss,
            AccessOutcome::Hit,
            AccessOutcome::ColdMiss,
            AccessOutcome::ColdMiss,
            AccessOutcome::ColdMiss,
            AccessOutcome::ConflictMiss,
        ]
    );
}

/// A whole blocked product replays through the cache without fatal errors.
#[test]
fn matmul_workload_runs_to_completion() {
    init_tracing();
    let workload = MatmulTrace::new(16, 4).unwrap();
    let trace = workload.to_trace();
    let base = CacheConfig::from_capacity(4096, 16, 4).unwrap();
    for policy in ReplacementPolicy::ALL {
        let config = CacheConfig {
            policy,
            write_no_allocate: true,
            seed: Some(3),
            ..base.clone()
        };
        let mut sim = Simulator::for_trace(&config, &trace).unwrap();
        let stats = sim.run(&trace).unwrap();
        assert_eq!(stats.access_count as usize, workload.len());
        assert!(stats.hit_rate().unwrap() > 0.5, "{policy}: {stats:?}");
    }
}

#[test]
fn wraps_and_returns_an_existing_cache() {
    let cache = crate::common::harness::CacheBuilder::new().build();
    let trace = Trace::from_reader("R 0x0\nR 0x4\nR 0x0\n".as_bytes()).unwrap();
    let mut sim = Simulator::from_cache(cache);
    let _ = sim.run(&trace).unwrap();
    let cache = sim.into_cache();
    assert_eq!(cache.stats().access_count, 3);
    assert_eq!(cache.stats().hit_count(), 1);
}
