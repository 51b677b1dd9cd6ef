//! Cache Simulator Tests.
//!
//! Verifies routing of addresses to sets, statistics aggregation, the
//! residency dump and construction errors of the full `Cache`.

use cachesim_core::cache::Cache;
use cachesim_core::cache::policies::LruPolicy;
use cachesim_core::common::{AccessOutcome, CacheError, Tag};
use cachesim_core::config::{CacheConfig, ReplacementPolicy};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{CacheBuilder, r, replay, w};
use crate::common::mocks::policy::ScriptedPolicy;

fn fifo_16x3() -> CacheBuilder {
    CacheBuilder::new()
        .sets(16)
        .ways(3)
        .block_size(1)
        .address_bits(12)
        .policy(ReplacementPolicy::Fifo)
}

/// Seven writes to seven different sets: all cold, nothing evicted.
#[test]
fn fifo_writes_to_distinct_sets_are_all_cold() {
    let mut cache = fifo_16x3().build();
    let trace = [0xa2b, 0xa3c, 0xa2d, 0xa2e, 0xa4f, 0xa40, 0xa51].map(w);
    let outcomes = replay(&mut cache, &trace);
    assert!(outcomes.iter().all(|&o| o == AccessOutcome::ColdMiss));

    let stats = cache.stats();
    assert_eq!(stats.access_count, 7);
    assert_eq!(stats.cold_miss_count, 7);
    assert_eq!(stats.conflict_miss_count, 0);
    assert_eq!(stats.eviction_count, 0);
    assert_eq!(stats.hit_rate(), Some(0.0));

    // 0xa2b -> block 0xa2b -> set 0xb, tag 0xa2.
    assert!(cache.set(0xb).unwrap().contains(Tag(0xa2)));
    assert!(cache.set(0x0).unwrap().contains(Tag(0xa4)));
}

#[test]
fn dump_shows_one_line_per_set() {
    let mut cache = fifo_16x3().build();
    let _ = replay(&mut cache, &[w(0xa2b), r(0xb2b), r(0xa40)]);
    let dump = cache.to_string();
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines.len(), 16);
    // 4 index bits -> 1 hex digit; 8 tag bits -> 2 hex digits plus marker.
    assert_eq!(lines[0xb], "b :  a2*  b2  ");
    assert_eq!(lines[0x0], "0 :  a4  ");
    assert_eq!(lines[0x5], "5 : ");
}

#[test]
fn fresh_cache_reports_undefined_hit_rate() {
    let cache = CacheBuilder::new().build();
    let stats = cache.stats();
    assert_eq!(stats.access_count, 0);
    assert_eq!(stats.hit_rate(), None);
    assert!(cache.report().to_string().ends_with("Hit Rate : undefined"));
}

/// Blocks larger than one byte: neighbouring bytes share a block.
#[test]
fn bytes_in_one_block_hit() {
    let mut cache = CacheBuilder::new().sets(4).ways(1).block_size(16).build();
    let outcomes = replay(&mut cache, &[r(0x100), r(0x10f), w(0x108), r(0x110)]);
    assert_eq!(
        outcomes,
        vec![
            AccessOutcome::ColdMiss,
            AccessOutcome::Hit,
            AccessOutcome::Hit,
            AccessOutcome::ColdMiss,
        ]
    );
    assert!(cache.contains(0x100_u64));
    assert!(cache.contains(0x110_u64));
}

/// Conflicting addresses map to the same set and evict each other.
#[test]
fn same_set_addresses_conflict() {
    let mut cache = CacheBuilder::new().sets(4).ways(1).build();
    let outcomes = replay(&mut cache, &[r(0x0), r(0x4), r(0x0), r(0x4)]);
    assert_eq!(
        outcomes,
        vec![
            AccessOutcome::ColdMiss,
            AccessOutcome::ColdMiss,
            AccessOutcome::ConflictMiss,
            AccessOutcome::ConflictMiss,
        ]
    );
    assert_eq!(cache.set(0).unwrap().eviction_count(), 3);
    assert_eq!(cache.set(1).unwrap().access_count(), 0);
}

#[test]
fn textual_addresses_route_like_numbers() {
    let mut cache = fifo_16x3().build();
    let _ = cache
        .access_str(cachesim_core::common::AccessType::Read, "0xa2b")
        .unwrap();
    assert!(cache.contains(0xa2b_u64));
    assert!(matches!(
        cache.access_str(cachesim_core::common::AccessType::Read, "zz"),
        Err(CacheError::InvalidAddress(_))
    ));
}

#[test]
fn seeded_random_caches_agree() {
    let builder = CacheBuilder::new()
        .sets(2)
        .ways(2)
        .policy(ReplacementPolicy::Random)
        .seed(99);
    let trace: Vec<_> = (0..200u64).map(|i| r((i * 7919) % 64)).collect();
    let mut a = builder.build();
    let mut b = builder.build();
    assert_eq!(replay(&mut a, &trace), replay(&mut b, &trace));
    assert_eq!(a.stats(), b.stats());
}

#[rstest]
#[case(ReplacementPolicy::Random, "Cache")]
#[case(ReplacementPolicy::Fifo, "FIFOCache")]
#[case(ReplacementPolicy::Lru, "LRUCache")]
#[case(ReplacementPolicy::Lfu, "LFUCache")]
fn specs_name_the_cache_model(#[case] policy: ReplacementPolicy, #[case] name: &str) {
    let cache = CacheBuilder::new().policy(policy).write_no_allocate().build();
    let specs = cache.specs();
    assert_eq!(specs.name, name);
    assert_eq!(specs.policy, policy.name());
    assert_eq!(specs.sets, 4);
    assert_eq!(specs.ways, 2);
    assert!(specs.write_no_allocate);
}

/// Caches assembled from explicit policies take their name from them.
#[test]
fn custom_policies_name_the_cache_model() {
    let lru = CacheBuilder::new().build_with(|_| Box::new(LruPolicy::new()));
    assert_eq!(lru.specs().name, "LRUCache");
    assert_eq!(lru.specs().policy, "lru");

    let scripted = CacheBuilder::new().build_with(|_| Box::new(ScriptedPolicy::default()));
    assert_eq!(scripted.specs().name, "Cache");
    assert_eq!(scripted.specs().policy, "scripted");
}

#[test]
fn invalid_config_is_rejected() {
    let config = CacheConfig {
        sets: 6,
        ..CacheConfig::default()
    };
    assert!(matches!(
        Cache::new(&config),
        Err(CacheError::InvalidGeometry(_))
    ));
}

#[test]
fn custom_policy_factory_builds_one_policy_per_set() {
    let mut indices = Vec::new();
    let cache = CacheBuilder::new().sets(8).build_with(|i| {
        indices.push(i);
        Box::new(cachesim_core::cache::policies::LruPolicy::new())
    });
    assert_eq!(indices, (0..8).collect::<Vec<_>>());
    assert_eq!(cache.sets().len(), 8);
    assert_eq!(cache.specs().policy, "lru");
}
