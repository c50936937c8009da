//! Shared test utilities for the QA masking workspace.
//!
//! This crate provides common testing infrastructure including:
//! - QA code generators (Landsat field encoder, reproducible random grids)
//! - Hand-checked scenario fixtures
//! - Mask assertion macros
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_mask_eq, fixtures};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for comparing a mask's cells against expected values.
///
/// On failure, reports the first differing cell as (col, row) as well as
/// both buffers.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_mask_eq;
///
/// assert_mask_eq!(mask, [1, 0, 0, 0]);
/// ```
#[macro_export]
macro_rules! assert_mask_eq {
    ($mask:expr, $expected:expr) => {{
        let mask = &$mask;
        let expected: &[u8] = &$expected;
        let actual = mask.data();
        if actual != expected {
            let first = actual
                .iter()
                .zip(expected.iter())
                .position(|(a, e)| a != e)
                .unwrap_or(actual.len().min(expected.len()));
            let line = mask.order().line_len(mask.width(), mask.height()).max(1);
            panic!(
                "assertion failed: masks differ at cell {} (line {}, offset {})\n  actual: `{:?}`,\nexpected: `{:?}`",
                first,
                first / line,
                first % line,
                actual,
                expected
            );
        }
    }};
}
