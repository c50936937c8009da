//! Comparison operators applied to extracted bit fields.

use crate::error::QaMaskError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Relationship required between an extracted field and the target value.
///
/// Both sides are compared while still positioned at the field's offset,
/// i.e. `(code & bit_mask) <op> (value << position)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    #[default]
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    /// Evaluate the operator.
    #[inline]
    pub fn eval(self, extracted: u64, target: u64) -> bool {
        match self {
            Self::Eq => extracted == target,
            Self::Gt => extracted > target,
            Self::Ge => extracted >= target,
            Self::Lt => extracted < target,
            Self::Le => extracted <= target,
        }
    }

    /// Symbolic form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

impl FromStr for CompareOp {
    type Err = QaMaskError;

    /// Accepts symbols (`=`, `==`, `>`, `>=`, `<`, `<=`) and word forms
    /// (`eq`, `gt`, `ge`, `lt`, `le`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "=" | "==" | "eq" => Ok(Self::Eq),
            ">" | "gt" => Ok(Self::Gt),
            ">=" | "ge" | "gte" => Ok(Self::Ge),
            "<" | "lt" => Ok(Self::Lt),
            "<=" | "le" | "lte" => Ok(Self::Le),
            _ => Err(QaMaskError::InvalidOperator(s.to_string())),
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_equality() {
        assert_eq!(CompareOp::default(), CompareOp::Eq);
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!("=".parse::<CompareOp>().unwrap(), CompareOp::Eq);
        assert_eq!(">".parse::<CompareOp>().unwrap(), CompareOp::Gt);
        assert_eq!(">=".parse::<CompareOp>().unwrap(), CompareOp::Ge);
        assert_eq!("<".parse::<CompareOp>().unwrap(), CompareOp::Lt);
        assert_eq!("<=".parse::<CompareOp>().unwrap(), CompareOp::Le);
    }

    #[test]
    fn test_parse_words() {
        assert_eq!("EQ".parse::<CompareOp>().unwrap(), CompareOp::Eq);
        assert_eq!("ge".parse::<CompareOp>().unwrap(), CompareOp::Ge);
        assert_eq!(" lt ".parse::<CompareOp>().unwrap(), CompareOp::Lt);
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(
            "!=".parse::<CompareOp>(),
            Err(QaMaskError::InvalidOperator("!=".to_string()))
        );
    }

    #[test]
    fn test_eval() {
        assert!(CompareOp::Eq.eval(2, 2));
        assert!(!CompareOp::Eq.eval(2, 1));
        assert!(CompareOp::Gt.eval(2, 1));
        assert!(CompareOp::Lt.eval(2, 3));
        assert!(CompareOp::Ge.eval(2, 2));
        assert!(CompareOp::Le.eval(2, 2));
        assert!(!CompareOp::Le.eval(3, 2));
    }

    #[test]
    fn test_display_roundtrip() {
        for op in [CompareOp::Eq, CompareOp::Gt, CompareOp::Ge, CompareOp::Lt, CompareOp::Le] {
            assert_eq!(op.to_string().parse::<CompareOp>().unwrap(), op);
        }
    }
}
