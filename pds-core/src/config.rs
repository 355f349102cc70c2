use std::f32::consts::SQRT_2;

use crate::{
    error::SampleError,
    grid::{AccelerationGrid, MAX_CELLS},
    types::Domain,
};

/// How close a candidate may come to an already accepted point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AcceptanceRule {
    /// Bridson's rule: search a 5×5 block of cells and reject anything
    /// closer than the minimum distance `R`. Candidates are drawn from the
    /// annulus `[R, 2R)`.
    #[default]
    Canonical,
    /// Narrower rule: search a 3×3 block of cells and reject anything closer
    /// than one cell width (`R/√2`). Candidates are drawn from the annulus
    /// `[R/√2, 2R/√2)`. Packs denser than [`AcceptanceRule::Canonical`].
    Reference,
}

impl AcceptanceRule {
    /// Neighbourhood half-size in cells (1 → 3×3, 2 → 5×5).
    #[inline]
    pub fn cell_radius(self) -> i32 {
        match self {
            AcceptanceRule::Canonical => 2,
            AcceptanceRule::Reference => 1,
        }
    }

    /// Smallest allowed distance between two accepted points.
    #[inline]
    pub fn threshold(self, min_distance: f32) -> f32 {
        match self {
            AcceptanceRule::Canonical => min_distance,
            AcceptanceRule::Reference => min_distance / SQRT_2,
        }
    }
}

/// Parameters of one sampling run.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplerConfig {
    /// Domain width `W`.
    pub width: f32,
    /// Domain height `H`.
    pub height: f32,
    /// Minimum distance `R`; also fixes the grid cell size `R/√2`.
    pub min_distance: f32,
    /// Candidates tried around each active point (`K`).
    pub attempts: u32,
    /// Random seed. `None` draws one from system entropy.
    pub seed: Option<u64>,
    pub rule: AcceptanceRule,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            min_distance: 10.0,
            attempts: 30,
            seed: None,
            rule: AcceptanceRule::default(),
        }
    }
}

impl SamplerConfig {
    pub fn new(width: f32, height: f32, min_distance: f32, attempts: u32) -> Self {
        Self {
            width,
            height,
            min_distance,
            attempts,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_rule(mut self, rule: AcceptanceRule) -> Self {
        self.rule = rule;
        self
    }

    /// Checks every scalar and the resulting grid size, returning the first
    /// violation.
    pub fn validate(&self) -> Result<(), SampleError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("min_distance", self.min_distance)?;
        if self.attempts < 1 {
            return Err(SampleError::invalid("attempts", "must be at least 1"));
        }
        if AccelerationGrid::dims_for(self.domain(), self.cell_width()).is_none() {
            return Err(SampleError::invalid(
                "min_distance",
                format!(
                    "{} is too small for a {} x {} domain (grid over {MAX_CELLS} cells)",
                    self.min_distance, self.width, self.height
                ),
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn domain(&self) -> Domain {
        Domain::new(self.width, self.height)
    }

    /// Grid cell edge length, `R/√2`.
    #[inline]
    pub fn cell_width(&self) -> f32 {
        self.min_distance / SQRT_2
    }

    /// Spacing guaranteed between any two accepted points under `self.rule`.
    #[inline]
    pub fn threshold(&self) -> f32 {
        self.rule.threshold(self.min_distance)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SampleError> {
    if !value.is_finite() {
        return Err(SampleError::invalid(field, format!("must be finite, got {value}")));
    }
    if value <= 0.0 {
        return Err(SampleError::invalid(field, format!("must be positive, got {value}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_classic_setup() {
        let cfg = SamplerConfig::default();
        assert_eq!(cfg.width, 1000.0);
        assert_eq!(cfg.height, 1000.0);
        assert_eq!(cfg.min_distance, 10.0);
        assert_eq!(cfg.attempts, 30);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.rule, AcceptanceRule::Canonical);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_reports_offending_field() {
        let cases = [
            (SamplerConfig::new(0.0, 10.0, 1.0, 1), "width"),
            (SamplerConfig::new(10.0, -1.0, 1.0, 1), "height"),
            (SamplerConfig::new(10.0, 10.0, 0.0, 1), "min_distance"),
            (SamplerConfig::new(10.0, 10.0, f32::NAN, 1), "min_distance"),
            (SamplerConfig::new(f32::INFINITY, 10.0, 1.0, 1), "width"),
            (SamplerConfig::new(10.0, 10.0, 1.0, 0), "attempts"),
        ];

        for (cfg, expected) in cases {
            match cfg.validate() {
                Err(SampleError::InvalidConfiguration { field, .. }) => {
                    assert_eq!(field, expected, "config {cfg:?}")
                }
                Ok(()) => panic!("config {cfg:?} should be rejected"),
            }
        }
    }

    #[test]
    fn validate_rejects_oversized_grid() {
        let cases = [
            SamplerConfig::new(1e20, 1e20, 1.0, 1),
            SamplerConfig::new(1e6, 1e6, 1e-3, 30),
            SamplerConfig::new(10.0, 10.0, f32::MIN_POSITIVE, 30),
        ];

        for cfg in cases {
            match cfg.validate() {
                Err(SampleError::InvalidConfiguration { field, .. }) => {
                    assert_eq!(field, "min_distance", "config {cfg:?}")
                }
                Ok(()) => panic!("config {cfg:?} should be rejected"),
            }
        }

        // Large but allocatable.
        assert!(SamplerConfig::new(10_000.0, 10_000.0, 10.0, 30).validate().is_ok());
    }

    #[test]
    fn rule_thresholds() {
        let r = 10.0;
        assert_eq!(AcceptanceRule::Canonical.threshold(r), 10.0);
        assert!((AcceptanceRule::Reference.threshold(r) - 7.071_068).abs() < 1e-5);
        assert_eq!(AcceptanceRule::Canonical.cell_radius(), 2);
        assert_eq!(AcceptanceRule::Reference.cell_radius(), 1);
    }

    #[test]
    fn builders_set_fields() {
        let cfg = SamplerConfig::new(50.0, 20.0, 2.0, 5)
            .with_seed(9)
            .with_rule(AcceptanceRule::Reference);

        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.rule, AcceptanceRule::Reference);
        assert_eq!(cfg.domain(), Domain::new(50.0, 20.0));
        assert!((cfg.cell_width() - 2.0 / SQRT_2).abs() < 1e-6);
        assert_eq!(cfg.threshold(), cfg.cell_width());
    }
}
