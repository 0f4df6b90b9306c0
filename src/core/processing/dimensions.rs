use tracing::{info, warn};

use crate::core::params::SizeThresholds;

fn to_pixels(v: f64) -> u32 {
    (v.round() as u32).max(1)
}

/// Growth into the min box is capped by the max box, so an edge already on
/// the max bound stays there.
fn envelope_fit(w: f64, h: f64, thresholds: &SizeThresholds) -> (f64, f64) {
    let (min_w, min_h) = (thresholds.small.width as f64, thresholds.small.height as f64);
    let (max_w, max_h) = (thresholds.large.width as f64, thresholds.large.height as f64);

    let grow = if w < min_w || h < min_h {
        (min_w / w).max(min_h / h)
    } else {
        1.0
    };
    let scale = grow.min(max_w / w).min(max_h / h);
    (w * scale, h * scale)
}

/// Fit dimensions into the `[small, large]` envelope preserving aspect ratio.
pub fn fit_to_envelope(width: u32, height: u32, thresholds: &SizeThresholds) -> (u32, u32) {
    let (w, h) = envelope_fit(width as f64, height as f64, thresholds);
    (to_pixels(w), to_pixels(h))
}

/// Target size for the tier path: scale by `factor`, then optionally clamp into
/// the envelope. Rounding happens once, after both steps.
pub fn tier_target_dimensions(
    width: u32,
    height: u32,
    factor: f64,
    thresholds: &SizeThresholds,
    clamp_to_envelope: bool,
) -> (u32, u32) {
    let (w, h) = (width as f64 * factor, height as f64 * factor);
    let (w, h) = if clamp_to_envelope {
        envelope_fit(w, h, thresholds)
    } else {
        (w, h)
    };
    (to_pixels(w), to_pixels(h))
}

/// Geometric fit used by the direct strategy.
///
/// Oversized images are fitted to the more-constraining axis of the standard
/// bound. Undersized images grow along the more-deficient axis of the lower
/// bound, which can carry the other axis past the standard bound. Edges are
/// truncated, not rounded.
pub fn direct_fit_dimensions(width: u32, height: u32, thresholds: &SizeThresholds) -> (u32, u32) {
    let (w, h) = (width as f64, height as f64);
    let aspect = w / h;
    let max = thresholds.large;
    let min = thresholds.small;

    if max.exceeded_by(width, height) {
        info!("Resizing large image: {}x{}", width, height);
        if w / max.width as f64 > h / max.height as f64 {
            (max.width, ((max.width as f64 / aspect) as u32).max(1))
        } else {
            (((max.height as f64 * aspect) as u32).max(1), max.height)
        }
    } else if min.undercut_by(width, height) {
        info!("Upscaling small image: {}x{}", width, height);
        let (new_w, new_h) = if w / (min.width as f64) < h / (min.height as f64) {
            (min.width, ((min.width as f64 / aspect) as u32).max(1))
        } else {
            (((min.height as f64 * aspect) as u32).max(1), min.height)
        };
        if max.exceeded_by(new_w, new_h) {
            warn!(
                "Upscaled size {}x{} exceeds the standard bound {}x{}",
                new_w, new_h, max.width, max.height
            );
        }
        (new_w, new_h)
    } else {
        (width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> SizeThresholds {
        SizeThresholds::default()
    }

    fn aspect_within_one_px(src: (u32, u32), out: (u32, u32)) -> bool {
        let expected_h = out.0 as f64 * src.1 as f64 / src.0 as f64;
        let expected_w = out.1 as f64 * src.0 as f64 / src.1 as f64;
        (out.1 as f64 - expected_h).abs() <= 1.0 || (out.0 as f64 - expected_w).abs() <= 1.0
    }

    #[test]
    fn test_tier_target_keeps_one_pixel() {
        assert_eq!(tier_target_dimensions(1000, 500, 0.4, &t(), false), (400, 200));
        assert_eq!(tier_target_dimensions(2, 2, 0.1, &t(), false), (1, 1));
    }

    #[test]
    fn test_envelope_shrinks_into_max_box() {
        let (w, h) = fit_to_envelope(4000, 4800, &t());
        assert_eq!((w, h), (1400, 1680));
    }

    #[test]
    fn test_envelope_grows_into_min_box() {
        assert_eq!(fit_to_envelope(20, 20, &t()), (600, 600));
        assert_eq!(fit_to_envelope(800, 900, &t()), (800, 900));
    }

    #[test]
    fn test_envelope_max_box_wins_for_extreme_aspect() {
        let (w, h) = fit_to_envelope(40, 2000, &t());
        assert_eq!(h, 2000);
        assert!(w < 500);
        assert!((w as i64 - 40).abs() <= 1);
    }

    #[test]
    fn test_tier_target_without_clamp() {
        assert_eq!(tier_target_dimensions(1000, 1200, 4.0, &t(), false), (4000, 4800));
    }

    #[test]
    fn test_tier_target_with_clamp() {
        let (w, h) = tier_target_dimensions(10000, 8000, 200.0 / 700.0, &t(), true);
        assert!((w as i64 - 1400).abs() <= 1);
        assert!((h as i64 - 1120).abs() <= 1);
    }

    #[test]
    fn test_small_tier_grows_unless_pinned_at_max_bound() {
        // Small tier (2x) with clamping: the max box caps growth
        assert_eq!(tier_target_dimensions(1400, 100, 2.0, &t(), true), (1400, 100));
        assert_eq!(tier_target_dimensions(400, 2000, 2.0, &t(), true), (400, 2000));
        assert_eq!(tier_target_dimensions(1399, 100, 2.0, &t(), true).0, 1400);
        assert_eq!(tier_target_dimensions(400, 1999, 2.0, &t(), true).1, 2000);

        for &(w, h) in &[(300, 400), (1, 1), (499, 2000), (1400, 599), (100, 1500), (1000, 50)] {
            let (ow, oh) = tier_target_dimensions(w, h, 2.0, &t(), true);
            assert!(ow <= 1400 && oh <= 2000, "{}x{} -> {}x{}", w, h, ow, oh);
            let pinned = w == 1400 || h == 2000;
            if pinned {
                assert_eq!(ow.max(oh), w.max(h));
            } else {
                assert!(ow.max(oh) > w.max(h), "{}x{} -> {}x{}", w, h, ow, oh);
            }
        }
    }

    #[test]
    fn test_direct_downscale_fits_constraining_axis() {
        assert_eq!(direct_fit_dimensions(10000, 8000, &t()), (1400, 1120));
        let (w, h) = direct_fit_dimensions(1000, 4000, &t());
        assert_eq!(h, 2000);
        assert_eq!(w, 500);
    }

    #[test]
    fn test_direct_upscale_truncates() {
        assert_eq!(direct_fit_dimensions(300, 400, &t()), (500, 666));
        assert_eq!(direct_fit_dimensions(450, 300, &t()), (900, 600));
    }

    #[test]
    fn test_direct_within_bounds_unchanged() {
        assert_eq!(direct_fit_dimensions(1000, 1200, &t()), (1000, 1200));
    }

    #[test]
    fn test_direct_upscale_can_overshoot_standard_bound() {
        let (w, h) = direct_fit_dimensions(1300, 100, &t());
        assert_eq!(h, 600);
        assert!(w > 1400);
    }

    #[test]
    fn test_direct_preserves_aspect() {
        for &(w, h) in &[(10000, 8000), (3000, 1000), (300, 400), (120, 90), (2000, 2500)] {
            let out = direct_fit_dimensions(w, h, &t());
            assert!(aspect_within_one_px((w, h), out), "{}x{} -> {:?}", w, h, out);
        }
    }
}
