use super::params::{StandardCurve, VolumeBounds};

/// Average mass of one base pair of double-stranded DNA, in g/mol.
pub const DALTONS_PER_BP: f64 = 660.0;
pub const NL_PER_L: f64 = 1e9;
const NL_PER_UL: f64 = 1000.0;

/// Volume (nL) that delivers `target_ng` of DNA at concentration `conc` (ng/uL),
/// clamped to the dispensing bounds and snapped to the instrument resolution.
///
/// A missing or non-finite concentration is treated as needing an unbounded volume,
/// so the sample is dispensed at `max_vol`.
#[inline]
pub fn normalized_volume(conc: Option<f64>, target_ng: f64, bounds: &VolumeBounds) -> f64 {
    let raw = match conc.filter(|c| c.is_finite()) {
        Some(c) => target_ng / c * NL_PER_UL,
        None => f64::INFINITY,
    };
    let raw = if raw.is_nan() { f64::INFINITY } else { raw };
    snap_to_resolution(raw.clamp(bounds.min_vol(), bounds.max_vol()), bounds)
}

/// Rounds to the nearest multiple of the resolution, ties to even.
///
/// The result never leaves `[min_vol, max_vol]`: when rounding would cross a bound
/// that is not itself a multiple of the resolution, the closest in-range multiple
/// is used instead.
#[inline]
pub fn snap_to_resolution(volume: f64, bounds: &VolumeBounds) -> f64 {
    let res = bounds.resolution();
    let snapped = (volume / res).round_ties_even() * res;
    if snapped > bounds.max_vol() {
        (bounds.max_vol() / res).floor() * res
    } else if snapped < bounds.min_vol() {
        (bounds.min_vol() / res).ceil() * res
    } else {
        snapped
    }
}

/// Library molarity (nM) from a qPCR Cp value.
#[inline]
pub fn qpcr_molar_concentration(cp: Option<f64>, curve: &StandardCurve) -> Option<f64> {
    cp.map(|cp| 10f64.powf((cp - curve.intercept) / curve.slope) * curve.dilution_factor / 1000.0)
}

/// Library molarity (nM) from a DNA mass concentration (ng/uL) and mean fragment length (bp).
#[inline]
pub fn pico_molar_concentration(dna_conc: Option<f64>, avg_fragment_bp: f64) -> Option<f64> {
    dna_conc.map(|c| c / (DALTONS_PER_BP * avg_fragment_bp) * 1e6)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_multiple(v: f64, res: f64) -> bool {
        let ratio = v / res;
        (ratio - ratio.round()).abs() < 1e-9
    }

    #[test]
    fn normalized_volume_divides_target_mass_by_concentration() {
        let bounds = VolumeBounds::default();
        assert_eq!(normalized_volume(Some(4.0), 5.0, &bounds), 1250.0);
        assert_eq!(normalized_volume(Some(2.0), 5.0, &bounds), 2500.0);
        assert_eq!(normalized_volume(Some(10.0), 5.0, &bounds), 500.0);
    }

    #[test]
    fn normalized_volume_clamps_to_bounds() {
        let bounds = VolumeBounds::default();
        assert_eq!(normalized_volume(Some(1e6), 5.0, &bounds), 2.5);
        assert_eq!(normalized_volume(Some(0.001), 5.0, &bounds), 3500.0);
        assert_eq!(normalized_volume(Some(0.0), 5.0, &bounds), 3500.0);
        assert_eq!(normalized_volume(Some(-3.0), 5.0, &bounds), 2.5);
    }

    #[test]
    fn missing_concentration_gets_the_maximum_volume() {
        let bounds = VolumeBounds::default();
        assert_eq!(normalized_volume(None, 5.0, &bounds), 3500.0);
        assert_eq!(normalized_volume(Some(f64::NAN), 5.0, &bounds), 3500.0);
    }

    #[test]
    fn snapping_rounds_half_to_even() {
        let bounds = VolumeBounds::new(0.0, 100.0, 1.0).unwrap();
        assert_eq!(snap_to_resolution(2.5, &bounds), 2.0);
        assert_eq!(snap_to_resolution(3.5, &bounds), 4.0);
        assert_eq!(snap_to_resolution(3.4, &bounds), 3.0);
    }

    #[test]
    fn snapping_stays_inside_bounds_that_are_not_multiples() {
        let bounds = VolumeBounds::new(3.0, 9.0, 2.5).unwrap();
        assert_eq!(snap_to_resolution(3.0, &bounds), 5.0);
        assert_eq!(snap_to_resolution(9.0, &bounds), 7.5);
    }

    #[test]
    fn output_is_always_a_bounded_multiple_of_the_resolution() {
        let bounds = VolumeBounds::new(2.5, 3500.0, 2.5).unwrap();
        let concs = [
            None,
            Some(0.0),
            Some(0.0137),
            Some(0.77),
            Some(1.2345),
            Some(3.3333),
            Some(7.0),
            Some(19.9),
            Some(250.0),
            Some(1e9),
        ];
        for conc in concs {
            let v = normalized_volume(conc, 5.0, &bounds);
            assert!((2.5..=3500.0).contains(&v), "{v} out of bounds for {conc:?}");
            assert!(is_multiple(v, 2.5), "{v} is not a multiple of 2.5");
        }
    }

    #[test]
    fn qpcr_concentration_follows_the_standard_curve() {
        let curve = StandardCurve::default();
        let at_intercept = qpcr_molar_concentration(Some(curve.intercept), &curve).unwrap();
        assert!((at_intercept - 25.0).abs() < 1e-9);

        let one_log_lower = qpcr_molar_concentration(Some(curve.intercept - 3.231), &curve).unwrap();
        assert!((one_log_lower - 250.0).abs() < 1e-9);
    }

    #[test]
    fn qpcr_concentration_propagates_missing_cp() {
        let curve = StandardCurve::default();
        assert_eq!(qpcr_molar_concentration(None, &curve), None);
        assert!(qpcr_molar_concentration(Some(99.0), &curve).unwrap() >= 0.0);
    }

    #[test]
    fn pico_concentration_converts_mass_to_molarity() {
        let nm = pico_molar_concentration(Some(26.4), 400.0).unwrap();
        assert!((nm - 100.0).abs() < 1e-9);
        assert_eq!(pico_molar_concentration(None, 400.0), None);
    }
}
