//! Value domains stored in sensor QA fields.

use qa_common::QaMaskError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Confidence that a condition exists at a Landsat 8 pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandsatConfidence {
    /// The algorithm did not determine the status of this condition.
    Undefined = 0,
    /// Low to no confidence (0-33 percent).
    Low = 1,
    /// Medium confidence (34-66 percent).
    Medium = 2,
    /// High confidence (67-100 percent).
    High = 3,
}

impl LandsatConfidence {
    pub const ALL: [LandsatConfidence; 4] = [Self::Undefined, Self::Low, Self::Medium, Self::High];

    pub fn value(self) -> u32 {
        self as u32
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl From<LandsatConfidence> for u32 {
    fn from(c: LandsatConfidence) -> u32 {
        c.value()
    }
}

impl FromStr for LandsatConfidence {
    type Err = QaMaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QaMaskError::invalid_value("landsat confidence", s))
    }
}

/// Overall quality of a MODIS land-product pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModisQuality {
    /// Produced at ideal quality.
    High = 0,
    /// Produced at less than ideal quality.
    Medium = 1,
    /// Not produced due to reasons other than cloud.
    Low = 2,
    /// Not produced due to cloud.
    LowCloud = 3,
}

impl ModisQuality {
    pub const ALL: [ModisQuality; 4] = [Self::High, Self::Medium, Self::Low, Self::LowCloud];

    pub fn value(self) -> u32 {
        self as u32
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::LowCloud => "low_cloud",
        }
    }
}

impl From<ModisQuality> for u32 {
    fn from(q: ModisQuality) -> u32 {
        q.value()
    }
}

impl FromStr for ModisQuality {
    type Err = QaMaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|q| q.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QaMaskError::invalid_value("modis quality", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landsat_values() {
        assert_eq!(LandsatConfidence::Undefined.value(), 0);
        assert_eq!(LandsatConfidence::Low.value(), 1);
        assert_eq!(LandsatConfidence::Medium.value(), 2);
        assert_eq!(LandsatConfidence::High.value(), 3);
    }

    #[test]
    fn test_modis_values() {
        assert_eq!(ModisQuality::High.value(), 0);
        assert_eq!(ModisQuality::Medium.value(), 1);
        assert_eq!(ModisQuality::Low.value(), 2);
        assert_eq!(ModisQuality::LowCloud.value(), 3);
    }

    #[test]
    fn test_parse() {
        assert_eq!("HIGH".parse::<LandsatConfidence>().unwrap(), LandsatConfidence::High);
        assert_eq!("low_cloud".parse::<ModisQuality>().unwrap(), ModisQuality::LowCloud);
        assert!("certain".parse::<LandsatConfidence>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ModisQuality::LowCloud).unwrap();
        assert_eq!(json, "\"low_cloud\"");
        let c: LandsatConfidence = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(c, LandsatConfidence::Medium);
    }
}
