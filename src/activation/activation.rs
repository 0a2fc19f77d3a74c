use serde::{Serialize, Deserialize};

use crate::dataset::scaling::ScalingRange;

/// Activation applied by every neuron of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationKind {
    Linear,
    HyperbolicTangent,
    RectifiedLinearUnits,
}

/// Value ranges an activation works well with.
///
/// `inputs` is where the activation is still responsive, `outputs` is the
/// range it can produce. The trainer normalizes datasets into these ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivationBounds {
    pub inputs: ScalingRange,
    pub outputs: ScalingRange,
}

impl ActivationKind {
    /// Element-wise activation of the pre-activation value `x`.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationKind::Linear => x,
            ActivationKind::HyperbolicTangent => x.tanh(),
            ActivationKind::RectifiedLinearUnits => if x > 0.0 { x } else { 0.0 },
        }
    }

    /// Derivative of the activation, evaluated at the pre-activation `x`
    /// (not at the activation's output).
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationKind::Linear => 1.0,
            ActivationKind::HyperbolicTangent => {
                let t = x.tanh();
                1.0 - t * t
            }
            ActivationKind::RectifiedLinearUnits => if x > 0.0 { 1.0 } else { 0.0 },
        }
    }

    /// Recommended input/output ranges, or `None` for unbounded activations.
    pub fn bounds(&self) -> Option<ActivationBounds> {
        match self {
            ActivationKind::HyperbolicTangent => Some(ActivationBounds {
                inputs: ScalingRange::new(-5.0, 5.0),
                outputs: ScalingRange::new(-1.0, 1.0),
            }),
            ActivationKind::Linear | ActivationKind::RectifiedLinearUnits => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_is_identity_with_unit_slope() {
        let kind = ActivationKind::Linear;
        assert_eq!(kind.function(-3.5), -3.5);
        assert_eq!(kind.derivative(-3.5), 1.0);
        assert_eq!(kind.derivative(100.0), 1.0);
    }

    #[test]
    fn tanh_derivative_matches_finite_difference() {
        let kind = ActivationKind::HyperbolicTangent;
        let h = 1e-6;
        for &x in &[-2.0, -0.3, 0.0, 0.7, 1.9] {
            let numeric = (kind.function(x + h) - kind.function(x - h)) / (2.0 * h);
            assert_abs_diff_eq!(kind.derivative(x), numeric, epsilon = 1e-8);
        }
    }

    #[test]
    fn relu_clamps_negatives_and_has_zero_slope_at_origin() {
        let kind = ActivationKind::RectifiedLinearUnits;
        assert_eq!(kind.function(-1.0), 0.0);
        assert_eq!(kind.function(2.5), 2.5);
        assert_eq!(kind.derivative(0.0), 0.0);
        assert_eq!(kind.derivative(0.1), 1.0);
    }

    #[test]
    fn only_tanh_reports_bounds() {
        let bounds = ActivationKind::HyperbolicTangent.bounds().unwrap();
        assert_eq!(bounds.inputs, ScalingRange::new(-5.0, 5.0));
        assert_eq!(bounds.outputs, ScalingRange::new(-1.0, 1.0));
        assert!(ActivationKind::Linear.bounds().is_none());
        assert!(ActivationKind::RectifiedLinearUnits.bounds().is_none());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&ActivationKind::HyperbolicTangent).unwrap();
        assert_eq!(json, "\"hyperbolic_tangent\"");
    }
}
