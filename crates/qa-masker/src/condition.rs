//! Composite conditions: several named fields that must all match.

use crate::profile::SensorProfile;
use qa_common::{BitField, QaMaskError, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One term of a composite query: a named condition and the exact value
/// its field must hold.
///
/// Serialized as `{ "type": ..., "confidence": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "confidence")]
    pub value: u32,
}

impl Condition {
    pub fn new(kind: impl Into<String>, value: impl Into<u32>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Parse `name=value` where value is numeric or a symbolic name from
    /// the profile's value domain (e.g. `cloud=high`).
    pub fn parse(profile: &SensorProfile, s: &str) -> Result<Self> {
        let (kind, value) = s
            .split_once('=')
            .ok_or_else(|| QaMaskError::MalformedCondition(s.to_string()))?;
        let kind = kind.trim();
        let value = profile.resolve_value(kind, value)?;
        Ok(Self::new(kind, value))
    }
}

/// Look up every condition in the profile.
///
/// Fails on an empty list or on the first unknown name, before any scan.
pub(crate) fn resolve(
    profile: &SensorProfile,
    conditions: &[Condition],
) -> Result<Vec<(BitField, u32)>> {
    if conditions.is_empty() {
        return Err(QaMaskError::EmptyConditionList);
    }
    conditions
        .iter()
        .map(|c| profile.field(&c.kind).map(|field| (field, c.value)))
        .collect()
}

/// Folded form of a composite query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Aggregate {
    /// A cell matches iff `(code & bit_mask) == value_mask`.
    Scan { bit_mask: u64, value_mask: u64 },
    /// No code can satisfy every term.
    Unsatisfiable,
}

/// OR all terms into one bit mask / value mask pair.
///
/// A term whose value spills outside its field can never match by
/// equality, and two terms that demand different bits in a shared range
/// can never both match; either makes the whole query unsatisfiable. This
/// keeps the folded scan identical to AND-ing one mask per term.
pub(crate) fn aggregate(terms: &[(BitField, u32)]) -> Aggregate {
    let mut bit_mask = 0u64;
    let mut value_mask = 0u64;

    for (field, value) in terms {
        if !field.fits(*value) {
            trace!(%field, value, "Term value does not fit its field");
            return Aggregate::Unsatisfiable;
        }
        let bits = field.bit_mask();
        let values = field.value_mask(*value);
        if (value_mask ^ values) & bit_mask & bits != 0 {
            trace!(%field, value, "Term conflicts with an earlier term");
            return Aggregate::Unsatisfiable;
        }
        bit_mask |= bits;
        value_mask |= values;
    }

    Aggregate::Scan {
        bit_mask,
        value_mask,
    }
}
