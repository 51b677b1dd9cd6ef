/// Blocked matrix-multiply trace generation tests.
pub mod matmul;

/// Trace replay tests.
pub mod simulator;

/// Blocking-factor study tests.
pub mod study;
