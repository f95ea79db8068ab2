//! Adjustment curves reshape surface noise before it becomes a column height.

use serde::{Deserialize, Serialize};

/// A mapping applied to terrain noise before height conversion.
///
/// Any `Fn(f32) -> f32` is a curve, so tests and callers can pass closures.
pub trait AdjustmentCurve {
    /// Maps `t` (normally in `[0, 1]`) to an adjusted value.
    fn evaluate(&self, t: f32) -> f32;
}

impl<F> AdjustmentCurve for F
where
    F: Fn(f32) -> f32,
{
    #[inline]
    fn evaluate(&self, t: f32) -> f32 {
        self(t)
    }
}

/// The identity curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinearCurve;

impl AdjustmentCurve for LinearCurve {
    #[inline]
    fn evaluate(&self, t: f32) -> f32 {
        t
    }
}

/// A piecewise-linear curve through `(t, value)` keyframes.
///
/// Keyframes are kept sorted by `t`. Outside the first and last keyframe the
/// curve holds the end value. Serialized as a list of `[t, value]` pairs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<[f32; 2]>", into = "Vec<[f32; 2]>")]
pub struct KeyframeCurve {
    keys: Vec<(f32, f32)>,
}

impl Default for KeyframeCurve {
    fn default() -> Self {
        Self::new(vec![(0.0, 0.0), (1.0, 1.0)])
    }
}

impl KeyframeCurve {
    /// Builds a curve from keyframes in any order.
    #[must_use]
    pub fn new(mut keys: Vec<(f32, f32)>) -> Self {
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { keys }
    }

    /// Sorted keyframes.
    #[must_use]
    pub fn keys(&self) -> &[(f32, f32)] {
        &self.keys
    }
}

impl AdjustmentCurve for KeyframeCurve {
    fn evaluate(&self, t: f32) -> f32 {
        let (Some(&first), Some(&last)) = (self.keys.first(), self.keys.last()) else {
            return t;
        };
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }

        // First key strictly past t; exists because t < last.0
        let upper = self.keys.partition_point(|key| key.0 <= t);
        let (t0, v0) = self.keys[upper - 1];
        let (t1, v1) = self.keys[upper];
        let span = t1 - t0;
        if span <= f32::EPSILON {
            return v1;
        }
        v0 + (v1 - v0) * ((t - t0) / span)
    }
}

impl From<Vec<[f32; 2]>> for KeyframeCurve {
    fn from(value: Vec<[f32; 2]>) -> Self {
        Self::new(value.into_iter().map(|[t, v]| (t, v)).collect())
    }
}

impl From<KeyframeCurve> for Vec<[f32; 2]> {
    fn from(value: KeyframeCurve) -> Self {
        value.keys.into_iter().map(|(t, v)| [t, v]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_is_identity() {
        for t in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(LinearCurve.evaluate(t), t);
        }
    }

    #[test]
    fn test_closures_are_curves() {
        let square = |t: f32| t * t;
        assert_eq!(square.evaluate(0.5), 0.25);
    }

    #[test]
    fn test_default_keyframes_match_linear() {
        let curve = KeyframeCurve::default();
        for t in [0.0, 0.1, 0.5, 0.9, 1.0] {
            assert!((curve.evaluate(t) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn test_keyframe_interpolation_and_clamping() {
        let curve = KeyframeCurve::new(vec![(1.0, 1.0), (0.0, 0.0), (0.5, 0.2)]);
        assert_eq!(curve.keys()[1], (0.5, 0.2));
        assert!((curve.evaluate(0.25) - 0.1).abs() < 1e-6);
        assert!((curve.evaluate(0.75) - 0.6).abs() < 1e-6);
        assert_eq!(curve.evaluate(0.5), 0.2);
        assert_eq!(curve.evaluate(-3.0), 0.0);
        assert_eq!(curve.evaluate(7.0), 1.0);
    }

    #[test]
    fn test_keyframes_from_toml_pairs() {
        #[derive(Deserialize)]
        struct Wrapper {
            curve: KeyframeCurve,
        }
        let parsed: Wrapper = toml::from_str("curve = [[0.0, 0.0], [0.6, 0.2], [1.0, 1.0]]").unwrap();
        assert_eq!(parsed.curve.keys().len(), 3);
        assert!((parsed.curve.evaluate(0.3) - 0.1).abs() < 1e-6);
    }
}
