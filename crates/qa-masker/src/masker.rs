//! Profile-bound maskers.
//!
//! [`QaMasker`] binds a borrowed QA grid to a sensor profile. The Landsat and
//! MODIS types are thin named wrappers over it; the only difference between
//! sensors is which bit table is active.

use crate::condition::{self, Aggregate, Condition};
use crate::config::{MaskerConfig, MultiStrategy};
use crate::confidence::{LandsatConfidence, ModisQuality};
use crate::engine;
use crate::profile::SensorProfile;
use qa_common::{CompareOp, MaskGrid, QaGrid, Result};
use std::borrow::Cow;
use tracing::{debug, warn};

/// Computes masks over one QA grid using one sensor profile.
#[derive(Debug, Clone)]
pub struct QaMasker<'a> {
    grid: &'a QaGrid,
    profile: Cow<'a, SensorProfile>,
    config: MaskerConfig,
}

impl<'a> QaMasker<'a> {
    /// Bind a grid to a profile with the default configuration.
    pub fn new(grid: &'a QaGrid, profile: impl Into<Cow<'a, SensorProfile>>) -> Self {
        Self {
            grid,
            profile: profile.into(),
            config: MaskerConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: MaskerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn grid(&self) -> &QaGrid {
        self.grid
    }

    pub fn profile(&self) -> &SensorProfile {
        &self.profile
    }

    pub fn config(&self) -> &MaskerConfig {
        &self.config
    }

    /// Mask of cells whose `condition` field compares to `value` under `op`.
    ///
    /// Fails with `UnknownCondition` if the profile has no such condition.
    pub fn condition_mask(&self, condition: &str, value: u32, op: CompareOp) -> Result<MaskGrid> {
        let field = self.profile.field(condition)?;
        Ok(engine::compute_field_mask(
            self.grid,
            field,
            value,
            op,
            &self.config,
        ))
    }

    /// Mask of cells matching every condition exactly.
    ///
    /// Terms are compared by equality only. Fails with
    /// `EmptyConditionList` or `UnknownCondition` before scanning.
    pub fn multi_condition_mask(&self, conditions: &[Condition]) -> Result<MaskGrid> {
        let terms = condition::resolve(&self.profile, conditions)?;

        debug!(
            profile = %self.profile.name(),
            terms = terms.len(),
            strategy = %self.config.multi_strategy,
            "Computing composite mask"
        );

        match self.config.multi_strategy {
            MultiStrategy::Aggregate => match condition::aggregate(&terms) {
                Aggregate::Scan {
                    bit_mask,
                    value_mask,
                } => Ok(engine::scan(
                    self.grid,
                    bit_mask,
                    value_mask,
                    CompareOp::Eq,
                    &self.config,
                )),
                Aggregate::Unsatisfiable => {
                    warn!(?conditions, "Composite conditions can never match");
                    Ok(MaskGrid::filled_like(self.grid, 0))
                }
            },
            MultiStrategy::PerCondition => {
                let mut combined = MaskGrid::filled_like(self.grid, 1);
                for (field, value) in terms {
                    let mask =
                        engine::compute_field_mask(self.grid, field, value, CompareOp::Eq, &self.config);
                    combined.and_assign(&mask)?;
                }
                Ok(combined)
            }
        }
    }
}

/// Masker for the Landsat 8 QA band.
#[derive(Debug, Clone)]
pub struct LandsatMasker<'a> {
    inner: QaMasker<'a>,
}

impl<'a> LandsatMasker<'a> {
    pub fn new(grid: &'a QaGrid) -> Self {
        Self {
            inner: QaMasker::new(grid, SensorProfile::landsat8()),
        }
    }

    pub fn with_config(mut self, config: MaskerConfig) -> Self {
        self.inner = self.inner.with_config(config);
        self
    }

    /// Pixels whose fill bit is set (`fill == 1`).
    pub fn fill_mask(&self) -> Result<MaskGrid> {
        self.inner.condition_mask("fill", 1, CompareOp::Eq)
    }

    pub fn cloud_mask(&self, confidence: LandsatConfidence, op: CompareOp) -> Result<MaskGrid> {
        self.inner.condition_mask("cloud", confidence.value(), op)
    }

    pub fn cirrus_mask(&self, confidence: LandsatConfidence, op: CompareOp) -> Result<MaskGrid> {
        self.inner.condition_mask("cirrus", confidence.value(), op)
    }

    pub fn snow_mask(&self, confidence: LandsatConfidence, op: CompareOp) -> Result<MaskGrid> {
        self.inner.condition_mask("snow", confidence.value(), op)
    }

    pub fn water_mask(&self, confidence: LandsatConfidence, op: CompareOp) -> Result<MaskGrid> {
        self.inner.condition_mask("water", confidence.value(), op)
    }

    pub fn vegetation_mask(
        &self,
        confidence: LandsatConfidence,
        op: CompareOp,
    ) -> Result<MaskGrid> {
        self.inner.condition_mask("vegetation", confidence.value(), op)
    }

    pub fn condition_mask(&self, condition: &str, value: u32, op: CompareOp) -> Result<MaskGrid> {
        self.inner.condition_mask(condition, value, op)
    }

    pub fn multi_condition_mask(&self, conditions: &[Condition]) -> Result<MaskGrid> {
        self.inner.multi_condition_mask(conditions)
    }
}

/// Masker for MODIS land-product QA layers.
#[derive(Debug, Clone)]
pub struct ModisMasker<'a> {
    inner: QaMasker<'a>,
}

impl<'a> ModisMasker<'a> {
    pub fn new(grid: &'a QaGrid) -> Self {
        Self {
            inner: QaMasker::new(grid, SensorProfile::modis()),
        }
    }

    pub fn with_config(mut self, config: MaskerConfig) -> Self {
        self.inner = self.inner.with_config(config);
        self
    }

    pub fn quality_mask(&self, quality: ModisQuality, op: CompareOp) -> Result<MaskGrid> {
        self.inner.condition_mask("quality", quality.value(), op)
    }

    pub fn condition_mask(&self, condition: &str, value: u32, op: CompareOp) -> Result<MaskGrid> {
        self.inner.condition_mask(condition, value, op)
    }

    pub fn multi_condition_mask(&self, conditions: &[Condition]) -> Result<MaskGrid> {
        self.inner.multi_condition_mask(conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qa_common::QaMaskError;

    fn landsat_grid() -> QaGrid {
        QaGrid::new(2, 2, vec![0xC010, 0x0000, 0x4000, 0x3010]).unwrap()
    }

    #[test]
    fn test_cloud_high() {
        let grid = landsat_grid();
        let mask = LandsatMasker::new(&grid)
            .cloud_mask(LandsatConfidence::High, CompareOp::Eq)
            .unwrap();
        assert_eq!(mask.data(), &[1, 0, 0, 0]);
    }

    #[test]
    fn test_cloud_at_least_low() {
        let grid = landsat_grid();
        let mask = LandsatMasker::new(&grid)
            .cloud_mask(LandsatConfidence::Low, CompareOp::Ge)
            .unwrap();
        assert_eq!(mask.data(), &[1, 0, 1, 0]);
    }

    #[test]
    fn test_named_accessors_use_profile_bits() {
        // cirrus=3, snow=2, vegetation=1, water=3, fill=1
        let code = (3 << 12) | (2 << 10) | (1 << 8) | (3 << 4) | 1;
        let grid = QaGrid::new(1, 1, vec![code]).unwrap();
        let masker = LandsatMasker::new(&grid);

        let hit = |m: Result<MaskGrid>| m.unwrap().data()[0];
        assert_eq!(hit(masker.cirrus_mask(LandsatConfidence::High, CompareOp::Eq)), 1);
        assert_eq!(hit(masker.snow_mask(LandsatConfidence::Medium, CompareOp::Eq)), 1);
        assert_eq!(hit(masker.vegetation_mask(LandsatConfidence::Low, CompareOp::Eq)), 1);
        assert_eq!(hit(masker.water_mask(LandsatConfidence::High, CompareOp::Eq)), 1);
        assert_eq!(hit(masker.cloud_mask(LandsatConfidence::Undefined, CompareOp::Eq)), 1);
        assert_eq!(hit(masker.fill_mask()), 1);
        assert_eq!(hit(masker.snow_mask(LandsatConfidence::High, CompareOp::Eq)), 0);
    }

    #[test]
    fn test_modis_quality() {
        let grid = QaGrid::new(4, 1, vec![0, 1, 2, 3]).unwrap();
        let masker = ModisMasker::new(&grid);
        assert_eq!(
            masker.condition_mask("quality", 1, CompareOp::Eq).unwrap().data(),
            &[0, 1, 0, 0]
        );
        assert_eq!(
            masker.quality_mask(ModisQuality::Low, CompareOp::Ge).unwrap().data(),
            &[0, 0, 1, 1]
        );
    }

    #[test]
    fn test_unknown_condition() {
        let grid = landsat_grid();
        let err = LandsatMasker::new(&grid)
            .condition_mask("nonexistent", 1, CompareOp::Eq)
            .unwrap_err();
        assert!(matches!(err, QaMaskError::UnknownCondition { .. }));
    }

    #[test]
    fn test_multi_empty() {
        let grid = landsat_grid();
        assert_eq!(
            LandsatMasker::new(&grid).multi_condition_mask(&[]),
            Err(QaMaskError::EmptyConditionList)
        );
    }

    #[test]
    fn test_multi_unknown_fails_fast() {
        let grid = landsat_grid();
        let conditions = [Condition::new("cloud", 3u32), Condition::new("smoke", 1u32)];
        for strategy in [MultiStrategy::Aggregate, MultiStrategy::PerCondition] {
            let config = MaskerConfig {
                multi_strategy: strategy,
                ..MaskerConfig::default()
            };
            let err = LandsatMasker::new(&grid)
                .with_config(config)
                .multi_condition_mask(&conditions)
                .unwrap_err();
            assert_eq!(err, QaMaskError::unknown_condition("smoke", "landsat8"));
        }
    }

    #[test]
    fn test_multi_cloud_and_water() {
        // Only 0xC010 has cloud=3 and water=1; 0xC000 matches cloud only
        let grid = QaGrid::new(3, 1, vec![0xC010, 0xC000, 0x0010]).unwrap();
        let conditions = [Condition::new("cloud", 3u32), Condition::new("water", 1u32)];
        for strategy in [MultiStrategy::Aggregate, MultiStrategy::PerCondition] {
            let config = MaskerConfig {
                multi_strategy: strategy,
                ..MaskerConfig::default()
            };
            let mask = LandsatMasker::new(&grid)
                .with_config(config)
                .multi_condition_mask(&conditions)
                .unwrap();
            assert_eq!(mask.data(), &[1, 0, 0], "{}", strategy);
        }
    }

    #[test]
    fn test_multi_conflicting_terms_match_nothing() {
        let grid = QaGrid::new(2, 1, vec![0xC000, 0x4000]).unwrap();
        let conditions = [Condition::new("cloud", 3u32), Condition::new("cloud", 1u32)];
        let mask = LandsatMasker::new(&grid)
            .multi_condition_mask(&conditions)
            .unwrap();
        assert_eq!(mask.count_set(), 0);
    }

    #[test]
    fn test_custom_profile_borrowed() {
        let profile = SensorProfile::builder("custom")
            .field("flag", qa_common::BitField::new(31, 1).unwrap())
            .build()
            .unwrap();
        let grid = QaGrid::new(2, 1, vec![0x8000_0000, 0x7FFF_FFFF]).unwrap();
        let masker = QaMasker::new(&grid, &profile);
        assert_eq!(
            masker.condition_mask("flag", 1, CompareOp::Eq).unwrap().data(),
            &[1, 0]
        );
        assert_eq!(masker.profile().name(), "custom");
    }
}
