use tracing::debug;

use crate::core::params::SizeThresholds;
use crate::types::ResolutionTier;

/// Pick the resolution tier for a first-frame size.
///
/// Checked from the most extreme bound downward; the first match wins.
pub fn select_tier(width: u32, height: u32, thresholds: &SizeThresholds) -> ResolutionTier {
    let tier = if thresholds.extreme.exceeded_by(width, height) {
        ResolutionTier::Extreme
    } else if thresholds.very_large.exceeded_by(width, height) {
        ResolutionTier::VeryLarge
    } else if thresholds.large.exceeded_by(width, height) {
        ResolutionTier::Large
    } else if thresholds.small.undercut_by(width, height) {
        ResolutionTier::Small
    } else {
        ResolutionTier::Default
    };
    debug!("Selected tier {} for {}x{}", tier, width, height);
    tier
}

/// Linear scale a tier applies: the page written at the tier DPI is read back at
/// `render_dpi`, so a higher tier DPI yields a smaller raster.
pub fn tier_scale_factor(tier: ResolutionTier, thresholds: &SizeThresholds, render_dpi: f64) -> f64 {
    render_dpi / thresholds.resolution(tier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::DEFAULT_RENDER_DPI;

    fn t() -> SizeThresholds {
        SizeThresholds::default()
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(select_tier(10000, 8000, &t()), ResolutionTier::Extreme);
        assert_eq!(select_tier(100, 9000, &t()), ResolutionTier::Extreme);
        assert_eq!(select_tier(5000, 100, &t()), ResolutionTier::VeryLarge);
        assert_eq!(select_tier(2000, 2500, &t()), ResolutionTier::Large);
        // Wide but short: exceeds the standard bound before the lower bound is considered
        assert_eq!(select_tier(1500, 100, &t()), ResolutionTier::Large);
        assert_eq!(select_tier(300, 400, &t()), ResolutionTier::Small);
        assert_eq!(select_tier(1000, 1200, &t()), ResolutionTier::Default);
    }

    #[test]
    fn test_bounds_are_exclusive() {
        assert_eq!(select_tier(8000, 8000, &t()), ResolutionTier::VeryLarge);
        assert_eq!(select_tier(4000, 4000, &t()), ResolutionTier::Large);
        assert_eq!(select_tier(1400, 2000, &t()), ResolutionTier::Default);
        assert_eq!(select_tier(500, 600, &t()), ResolutionTier::Default);
        assert_eq!(select_tier(499, 600, &t()), ResolutionTier::Small);
    }

    #[test]
    fn test_scale_factor_inverse_to_resolution() {
        let th = t();
        let f = |tier| tier_scale_factor(tier, &th, DEFAULT_RENDER_DPI);
        assert_eq!(f(ResolutionTier::Default), 4.0);
        assert_eq!(f(ResolutionTier::Small), 2.0);
        assert_eq!(f(ResolutionTier::VeryLarge), 0.4);
        assert!(f(ResolutionTier::Extreme) < f(ResolutionTier::VeryLarge));
        assert!(f(ResolutionTier::Large) < 1.0);
    }
}
