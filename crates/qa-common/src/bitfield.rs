//! Bit field descriptors for packed 32-bit QA codes.

use crate::error::{QaMaskError, Result};
use serde::{Deserialize, Serialize};

/// Width of a QA code in bits.
pub const CODE_BITS: u32 = 32;

/// A contiguous run of bits inside a 32-bit QA code.
///
/// Masks are kept in a 64-bit domain so that a target value larger than
/// the field can be shifted into position without being truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBitField", into = "RawBitField")]
pub struct BitField {
    position: u32,
    length: u32,
}

impl BitField {
    /// Create a validated bit field.
    ///
    /// A field spanning the whole 32-bit word is rejected: it is the code
    /// itself, not a sub-field of it.
    pub fn new(position: u32, length: u32) -> Result<Self> {
        if length == 0 || length >= CODE_BITS || position.saturating_add(length) > CODE_BITS {
            return Err(QaMaskError::invalid_field(position, length));
        }
        Ok(Self { position, length })
    }

    /// Const constructor for fixed sensor tables.
    ///
    /// Panics on an invalid field, which fails compilation when used to
    /// initialise a `const`.
    pub const fn fixed(position: u32, length: u32) -> Self {
        assert!(
            length > 0 && length < CODE_BITS && position <= CODE_BITS - length,
            "invalid bit field"
        );
        Self { position, length }
    }

    /// Offset of the lowest bit.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Number of bits.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Largest value the field can hold, `2^length - 1`.
    pub fn max_value(&self) -> u32 {
        ((1u64 << self.length) - 1) as u32
    }

    /// The field's bits set, everything else clear.
    pub fn bit_mask(&self) -> u64 {
        ((1u64 << self.length) - 1) << self.position
    }

    /// `value` shifted into the field's position, without masking.
    pub fn value_mask(&self, value: u32) -> u64 {
        u64::from(value) << self.position
    }

    /// Whether `value` fits the field without spilling into other bits.
    pub fn fits(&self, value: u32) -> bool {
        value <= self.max_value()
    }

    /// Extract the field value from a code, shifted down to bit 0.
    pub fn extract(&self, code: u32) -> u32 {
        ((u64::from(code) & self.bit_mask()) >> self.position) as u32
    }

    /// Whether two fields share at least one bit.
    pub fn overlaps(&self, other: &BitField) -> bool {
        self.bit_mask() & other.bit_mask() != 0
    }
}

impl std::fmt::Display for BitField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "bits {}..={}",
            self.position,
            self.position + self.length - 1
        )
    }
}

#[derive(Serialize, Deserialize)]
struct RawBitField {
    position: u32,
    length: u32,
}

impl TryFrom<RawBitField> for BitField {
    type Error = QaMaskError;

    fn try_from(raw: RawBitField) -> Result<Self> {
        BitField::new(raw.position, raw.length)
    }
}

impl From<BitField> for RawBitField {
    fn from(field: BitField) -> Self {
        Self {
            position: field.position,
            length: field.length,
        }
    }
}
