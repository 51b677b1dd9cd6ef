//! Blocked Matrix-Multiply Trace Tests.

use std::collections::HashSet;

use cachesim_core::common::{AccessType, Address};
use cachesim_core::sim::matmul::{DEFAULT_BASE, ELEMENT_SIZE};
use cachesim_core::sim::{MatmulTrace, SimError, TraceEntry};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(4, 0)]
#[case(10, 4)]
#[case(16, 32)]
fn invalid_blocking_is_rejected(#[case] size: usize, #[case] blocks: usize) {
    assert!(matches!(MatmulTrace::new(size, blocks), Err(SimError::InvalidWorkload(_))));
}

/// 2 × 2 unblocked: for C[0][0] the reads are A[0][0], B[0][0], A[0][1], B[1][0].
#[test]
fn unblocked_two_by_two_order() {
    let workload = MatmulTrace::new(2, 1).unwrap().with_bases(0x1000, 0x2000, 0x3000);
    let head: Vec<TraceEntry> = workload.iter().take(6).collect();
    let read = |a| TraceEntry::new(AccessType::Read, Address(a));
    assert_eq!(
        head,
        vec![
            read(0x1000),
            read(0x2000),
            read(0x1000 + ELEMENT_SIZE),
            read(0x2000 + 2 * ELEMENT_SIZE),
            read(0x3000),
            TraceEntry::new(AccessType::Write, Address(0x3000)),
        ]
    );
}

#[rstest]
#[case(4, 1)]
#[case(4, 2)]
#[case(4, 4)]
fn every_element_of_c_is_written_per_k_block(#[case] size: usize, #[case] blocks: usize) {
    let workload = MatmulTrace::new(size, blocks).unwrap();
    let writes: Vec<u64> = workload
        .iter()
        .filter(|e| e.op == AccessType::Write)
        .map(|e| e.addr.val())
        .collect();
    assert_eq!(writes.len(), size * size * blocks);
    let distinct: HashSet<u64> = writes.iter().copied().collect();
    assert_eq!(distinct.len(), size * size);
}

/// Blocking changes the order, never the multiset of reads of A and B.
#[test]
fn blocking_preserves_total_reads() {
    let plain = MatmulTrace::new(8, 1).unwrap();
    let blocked = MatmulTrace::new(8, 4).unwrap();
    let reads = |w: &MatmulTrace| {
        let mut v: Vec<u64> = w
            .iter()
            .filter(|e| e.op == AccessType::Read && e.addr.val() < DEFAULT_BASE + 2 * 4096)
            .map(|e| e.addr.val())
            .collect();
        v.sort_unstable();
        v
    };
    assert_eq!(reads(&plain), reads(&blocked));
}
