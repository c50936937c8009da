//! Bitfield Mask Engine and Sensor Profiles for satellite QA bands
//!
//! Landsat 8 and MODIS land products ship a quality-assessment band whose
//! integer codes pack several independent per-pixel flags (cloud, cirrus,
//! water, snow, ...) into disjoint bit ranges. This crate turns such a band
//! into 0/1 masks:
//!
//! - **Engine**: extract one bit field from every cell and compare it
//!   against a target value with `=`, `>`, `>=`, `<` or `<=`
//! - **Profiles**: per-sensor tables naming each field's position and length
//! - **Composite masks**: AND several exact-match conditions in one pass
//!
//! # Architecture
//!
//! ```text
//! QaGrid (borrowed, never mutated)
//!      │
//!      ▼
//! QaMasker { grid, SensorProfile, MaskerConfig }
//!      │
//!      ├─► condition_mask(name, value, op)
//!      │         │
//!      │         └─► profile lookup ─► engine::compute_field_mask
//!      │
//!      └─► multi_condition_mask([Condition])
//!                │
//!                ├─► Aggregate:    fold fields ─► one scan
//!                │
//!                └─► PerCondition: one scan per term ─► AND
//!                          │
//!                          ▼
//!                   MaskGrid (fresh, owned by caller)
//! ```
//!
//! # Example
//!
//! ```
//! use qa_masker::{CompareOp, LandsatConfidence, LandsatMasker, QaGrid};
//!
//! let grid = QaGrid::new(2, 2, vec![0xC010, 0x0000, 0x4000, 0x3010]).unwrap();
//! let mask = LandsatMasker::new(&grid)
//!     .cloud_mask(LandsatConfidence::High, CompareOp::Eq)
//!     .unwrap();
//! assert_eq!(mask.data(), &[1, 0, 0, 0]);
//! ```

pub mod condition;
pub mod confidence;
pub mod config;
pub mod engine;
pub mod masker;
pub mod profile;

// Re-export commonly used types at crate root
pub use condition::Condition;
pub use confidence::{LandsatConfidence, ModisQuality};
pub use config::{MaskerConfig, MultiStrategy};
pub use engine::{compute_field_mask, compute_mask, compute_mask_with};
pub use masker::{LandsatMasker, ModisMasker, QaMasker};
pub use profile::{ProfileDefinition, Sensor, SensorProfile, SensorProfileBuilder, ValueDomain};
pub use qa_common::{BitField, CellOrder, CompareOp, MaskGrid, QaGrid, QaMaskError, Result};
