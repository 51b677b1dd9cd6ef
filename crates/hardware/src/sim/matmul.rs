//! Blocked Matrix-Multiply Trace Generator.
//!
//! Produces the data-memory trace of `C += A × B` for square `n × n` matrices
//! of 4-byte elements, computed block by block. Each row is divided into
//! `num_blocks` square sub-blocks of `n / num_blocks` elements; the loop nest
//! walks block triples `(i, j, k)` and, inside each, every `(row, col)` pair
//! of the output block:
//!
//! - one read of `A[row][k']` and one read of `B[k'][col]` per inner step;
//! - after the inner loop, a read then a write of `C[row][col]`.
//!
//! Arrays are row-major and live at distinct, page-aligned base addresses.

use std::io::{self, Write};

use super::SimError;
use super::trace::{Trace, TraceEntry};
use crate::common::{AccessType, Address};

/// Size in bytes of one matrix element.
pub const ELEMENT_SIZE: u64 = 4;

/// Default base address of `A`; `B` and `C` follow at page-aligned offsets.
pub const DEFAULT_BASE: u64 = 0x1000_0000;

const PAGE_SIZE: u64 = 4096;

/// Parameters of a blocked matrix product trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatmulTrace {
    size: usize,
    num_blocks: usize,
    base_a: u64,
    base_b: u64,
    base_c: u64,
}

impl MatmulTrace {
    /// Describes the product of two `size × size` matrices split into
    /// `num_blocks` blocks per row.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidWorkload`] if `num_blocks` is zero or does
    /// not divide `size`.
    pub fn new(size: usize, num_blocks: usize) -> Result<Self, SimError> {
        if num_blocks == 0 {
            return Err(SimError::InvalidWorkload(
                "number of blocks must be at least 1".into(),
            ));
        }
        if size % num_blocks != 0 {
            return Err(SimError::InvalidWorkload(format!(
                "matrix size {size} is not a multiple of {num_blocks} blocks"
            )));
        }
        let stride = (size as u64 * size as u64 * ELEMENT_SIZE).div_ceil(PAGE_SIZE).max(1) * PAGE_SIZE;
        Ok(Self {
            size,
            num_blocks,
            base_a: DEFAULT_BASE,
            base_b: DEFAULT_BASE + stride,
            base_c: DEFAULT_BASE + 2 * stride,
        })
    }

    /// Overrides the base addresses of `A`, `B` and `C`.
    #[must_use]
    pub const fn with_bases(mut self, a: u64, b: u64, c: u64) -> Self {
        self.base_a = a;
        self.base_b = b;
        self.base_c = c;
        self
    }

    /// Matrix dimension.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Blocks per row.
    pub const fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    /// Elements per block side.
    pub const fn block_len(&self) -> usize {
        self.size / self.num_blocks
    }

    /// Number of accesses the trace contains.
    pub const fn len(&self) -> usize {
        let bl = self.block_len();
        self.num_blocks.pow(3) * bl * bl * (2 * bl + 2)
    }

    /// Returns `true` for the degenerate `0 × 0` product.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    const fn element(&self, base: u64, row: usize, col: usize) -> Address {
        Address(base + (row * self.size + col) as u64 * ELEMENT_SIZE)
    }

    /// Accesses in program order.
    pub fn iter(&self) -> impl Iterator<Item = TraceEntry> + '_ {
        let nb = self.num_blocks;
        let bl = self.block_len();
        let read = |addr: Address| TraceEntry::new(AccessType::Read, addr);
        (0..nb).flat_map(move |i| {
            (0..nb).flat_map(move |j| {
                (0..nb).flat_map(move |k| {
                    (0..bl).flat_map(move |sub_i| {
                        (0..bl).flat_map(move |sub_j| {
                            let row = i * bl + sub_i;
                            let col = j * bl + sub_j;
                            let c = self.element(self.base_c, row, col);
                            (0..bl)
                                .flat_map(move |sub_k| {
                                    let inner = k * bl + sub_k;
                                    [
                                        read(self.element(self.base_a, row, inner)),
                                        read(self.element(self.base_b, inner, col)),
                                    ]
                                })
                                .chain([read(c), TraceEntry::new(AccessType::Write, c)])
                        })
                    })
                })
            })
        })
    }

    /// Collects the accesses into a replayable [`Trace`].
    pub fn to_trace(&self) -> Trace {
        Trace::from_entries(self.iter().collect())
    }

    /// Writes the trace as `R`/`W` lines.
    ///
    /// # Errors
    ///
    /// Returns the first write error.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        for entry in self.iter() {
            writeln!(out, "{} {}", entry.op, entry.addr)?;
        }
        out.flush()
    }
}
