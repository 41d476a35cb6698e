//! Logistic scoring of a descriptor pair.

use micella_core::{MicellaError, Result};
use serde::Serialize;

use crate::coefficients::CoefficientSet;

/// Smallest and largest probability a score can carry; both ends stay open.
const P_MIN: f64 = f64::MIN_POSITIVE;
const P_MAX: f64 = 1.0 - f64::EPSILON / 2.0;

/// The two descriptors the model consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescriptorPair {
    /// Distribution coefficient of the ionized structure.
    pub logd: f64,
    /// Crippen molar refractivity.
    pub mr: f64,
}

impl DescriptorPair {
    /// Build a pair, rejecting non-finite values.
    pub fn new(logd: f64, mr: f64) -> Result<Self> {
        let pair = DescriptorPair { logd, mr };
        pair.check_finite()?;
        Ok(pair)
    }

    fn check_finite(&self) -> Result<()> {
        if !self.logd.is_finite() {
            return Err(MicellaError::DescriptorUnavailable(format!(
                "logD is not finite ({})",
                self.logd
            )));
        }
        if !self.mr.is_finite() {
            return Err(MicellaError::DescriptorUnavailable(format!(
                "CrippenMR is not finite ({})",
                self.mr
            )));
        }
        Ok(())
    }
}

/// Result of scoring one descriptor pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    /// `intercept + z1 + z2`
    pub linear: f64,
    /// Interaction probability, strictly inside (0, 1).
    pub probability: f64,
}

/// Weighted standardized terms `(z1, z2)` of a pair.
pub fn standardized_terms(pair: &DescriptorPair, coeffs: &CoefficientSet) -> (f64, f64) {
    let z1 = ((pair.logd - coeffs.mean_logd) / coeffs.scale_logd) * coeffs.w_logd;
    let z2 = ((pair.mr - coeffs.mean_mr) / coeffs.scale_mr) * coeffs.w_mr;
    (z1, z2)
}

/// Logistic function evaluated without overflow for large `|x|`.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Score a descriptor pair with one coefficient set.
pub fn score(pair: &DescriptorPair, coeffs: &CoefficientSet) -> Result<Score> {
    pair.check_finite()?;
    let (z1, z2) = standardized_terms(pair, coeffs);
    let linear = coeffs.intercept + z1 + z2;
    if linear.is_nan() {
        return Err(MicellaError::Configuration(
            "coefficient set produced an undefined linear predictor".into(),
        ));
    }
    Ok(Score {
        linear,
        probability: sigmoid(linear).clamp(P_MIN, P_MAX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::{V1, V2};
    use proptest::prelude::*;

    fn at_means(c: &CoefficientSet) -> DescriptorPair {
        DescriptorPair::new(c.mean_logd, c.mean_mr).unwrap()
    }

    #[test]
    fn v1_at_means() {
        let s = score(&at_means(&V1), &V1).unwrap();
        assert_eq!(s.linear, V1.intercept);
        assert!((s.probability - 1.0 / (1.0 + (-0.7999132f64).exp())).abs() < 1e-15);
        assert_eq!((s.probability * 100.0).round() / 100.0, 0.69);
    }

    #[test]
    fn v2_at_means() {
        let s = score(&at_means(&V2), &V2).unwrap();
        assert_eq!((s.probability * 100.0).round() / 100.0, 0.73);
    }

    #[test]
    fn variants_are_independent() {
        let pair = DescriptorPair::new(1.0, 60.0).unwrap();
        let a = score(&pair, &V1).unwrap();
        let b = score(&pair, &V2).unwrap();
        assert_ne!(a.probability, b.probability);
        assert_eq!(a, score(&pair, &V1).unwrap());
    }

    #[test]
    fn saturates_inside_open_interval() {
        let high = score(&DescriptorPair::new(1e6, 1e6).unwrap(), &V1).unwrap();
        assert!(high.probability > 0.999 && high.probability < 1.0);
        let low = score(&DescriptorPair::new(-1e6, -1e6).unwrap(), &V1).unwrap();
        assert!(low.probability > 0.0 && low.probability < 1e-3);
    }

    #[test]
    fn sigmoid_is_stable() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-800.0).is_finite());
        assert!(sigmoid(800.0).is_finite());
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn non_finite_descriptors_rejected() {
        assert!(matches!(
            DescriptorPair::new(f64::NAN, 1.0),
            Err(MicellaError::DescriptorUnavailable(_))
        ));
        assert!(matches!(
            DescriptorPair::new(1.0, f64::INFINITY),
            Err(MicellaError::DescriptorUnavailable(_))
        ));
        let raw = DescriptorPair { logd: f64::NEG_INFINITY, mr: 1.0 };
        assert!(score(&raw, &V1).is_err());
    }

    #[test]
    fn higher_descriptors_raise_probability() {
        let low = score(&DescriptorPair::new(0.0, 50.0).unwrap(), &V1).unwrap();
        let high = score(&DescriptorPair::new(4.0, 130.0).unwrap(), &V1).unwrap();
        assert!(high.probability > low.probability);
    }

    proptest! {
        #[test]
        fn probability_in_open_unit_interval(logd in -1e9f64..1e9, mr in -1e9f64..1e9) {
            let pair = DescriptorPair::new(logd, mr).unwrap();
            for coeffs in [&V1, &V2] {
                let s = score(&pair, coeffs).unwrap();
                prop_assert!(s.probability > 0.0 && s.probability < 1.0);
            }
        }

        #[test]
        fn scoring_is_deterministic(logd in -20.0f64..20.0, mr in 0.0f64..400.0) {
            let pair = DescriptorPair::new(logd, mr).unwrap();
            let a = score(&pair, &V2).unwrap();
            let b = score(&pair, &V2).unwrap();
            prop_assert_eq!(a.probability.to_bits(), b.probability.to_bits());
        }
    }
}
