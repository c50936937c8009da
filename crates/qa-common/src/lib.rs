//! Common types shared by the QA masking crates.
//!
//! A QA band packs several independent per-pixel flags into disjoint bit
//! ranges of an unsigned integer. This crate holds the pieces every layer
//! needs to talk about such bands: the code grid, the bit field descriptor,
//! the comparison operator, the resulting mask grid and the error type.

pub mod bitfield;
pub mod error;
pub mod grid;
pub mod operator;

pub use bitfield::{BitField, CODE_BITS};
pub use error::{QaMaskError, Result};
pub use grid::{CellOrder, MaskGrid, QaGrid};
pub use operator::CompareOp;
