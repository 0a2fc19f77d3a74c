use serde::{Serialize, Deserialize};

use crate::dataset::dataset::{ComponentStatistics, DatasetStatistics};
use crate::error::{ensure_len, Error, Result};

/// A closed numeric interval `[min, max]` used as a normalization target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingRange {
    pub min: f64,
    pub max: f64,
}

impl ScalingRange {
    pub const fn new(min: f64, max: f64) -> Self {
        ScalingRange { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        self.min + 0.5 * self.width()
    }

    pub fn validate(&self) -> Result<()> {
        if self.min < self.max && self.width().is_finite() {
            Ok(())
        } else {
            Err(Error::InvalidParameter(format!(
                "scaling range [{}, {}] must be finite with min < max",
                self.min, self.max
            )))
        }
    }
}

impl Default for ScalingRange {
    fn default() -> Self {
        ScalingRange::new(-1.0, 1.0)
    }
}

/// Affine rescaling of one component: `(x - offset) / divisor * factor + shift`.
///
/// A zero `divisor` marks a constant component, which always maps to `shift`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScaling {
    pub offset: f64,
    pub divisor: f64,
    pub factor: f64,
    pub shift: f64,
}

impl ComponentScaling {
    pub fn apply(&self, x: f64) -> f64 {
        if self.divisor == 0.0 {
            self.shift
        } else {
            (x - self.offset) / self.divisor * self.factor + self.shift
        }
    }

    pub fn invert(&self, y: f64) -> f64 {
        if self.divisor == 0.0 {
            self.offset
        } else {
            (y - self.shift) / self.factor * self.divisor + self.offset
        }
    }
}

/// The mapping a `Dataset` was rescaled with, so that new inputs can be
/// scaled the same way and network outputs mapped back to dataset units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingTransform {
    pub inputs: Vec<ComponentScaling>,
    pub outputs: Vec<ComponentScaling>,
}

impl ScalingTransform {
    /// Min/max normalization into the given ranges.
    pub fn normalize(statistics: &DatasetStatistics, inputs: ScalingRange, outputs: ScalingRange) -> Self {
        ScalingTransform {
            inputs: normalize_components(&statistics.inputs, inputs),
            outputs: normalize_components(&statistics.outputs, outputs),
        }
    }

    /// Zero mean, unit variance.
    pub fn standardize(statistics: &DatasetStatistics) -> Self {
        ScalingTransform {
            inputs: standardize_components(&statistics.inputs),
            outputs: standardize_components(&statistics.outputs),
        }
    }

    pub fn scale_inputs(&self, values: &mut [f64]) -> Result<()> {
        map_in_place("scaled inputs", &self.inputs, values, ComponentScaling::apply)
    }

    pub fn scale_outputs(&self, values: &mut [f64]) -> Result<()> {
        map_in_place("scaled outputs", &self.outputs, values, ComponentScaling::apply)
    }

    pub fn restore_inputs(&self, values: &mut [f64]) -> Result<()> {
        map_in_place("restored inputs", &self.inputs, values, ComponentScaling::invert)
    }

    pub fn restore_outputs(&self, values: &mut [f64]) -> Result<()> {
        map_in_place("restored outputs", &self.outputs, values, ComponentScaling::invert)
    }
}

fn normalize_components(stats: &ComponentStatistics, range: ScalingRange) -> Vec<ComponentScaling> {
    stats
        .min
        .iter()
        .zip(&stats.max)
        .map(|(&lo, &hi)| {
            let width = hi - lo;
            if width > 0.0 {
                ComponentScaling { offset: lo, divisor: width, factor: range.width(), shift: range.min }
            } else {
                ComponentScaling { offset: lo, divisor: 0.0, factor: range.width(), shift: range.midpoint() }
            }
        })
        .collect()
}

fn standardize_components(stats: &ComponentStatistics) -> Vec<ComponentScaling> {
    stats
        .mean
        .iter()
        .zip(&stats.std_dev)
        .map(|(&mean, &std_dev)| ComponentScaling { offset: mean, divisor: std_dev, factor: 1.0, shift: 0.0 })
        .collect()
}

fn map_in_place(
    context: &'static str,
    components: &[ComponentScaling],
    values: &mut [f64],
    f: fn(&ComponentScaling, f64) -> f64,
) -> Result<()> {
    ensure_len(context, components.len(), values.len())?;
    for (value, component) in values.iter_mut().zip(components) {
        *value = f(component, *value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normalization_hits_range_bounds_exactly() {
        let c = ComponentScaling { offset: 2.0, divisor: 8.0, factor: 2.0, shift: -1.0 };
        assert_eq!(c.apply(2.0), -1.0);
        assert_eq!(c.apply(10.0), 1.0);
        assert_eq!(c.apply(6.0), 0.0);
    }

    #[test]
    fn invert_undoes_apply() {
        let c = ComponentScaling { offset: -3.0, divisor: 1.5, factor: 10.0, shift: -5.0 };
        for &x in &[-3.0, 0.0, 1.25, 7.0] {
            assert_abs_diff_eq!(c.invert(c.apply(x)), x, epsilon = 1e-12);
        }
    }

    #[test]
    fn constant_component_maps_to_shift() {
        let c = ComponentScaling { offset: 4.0, divisor: 0.0, factor: 2.0, shift: 0.0 };
        assert_eq!(c.apply(4.0), 0.0);
        assert_eq!(c.invert(0.3), 4.0);
    }

    #[test]
    fn range_validation() {
        assert!(ScalingRange::new(-1.0, 1.0).validate().is_ok());
        assert!(ScalingRange::new(1.0, 1.0).validate().is_err());
        assert!(ScalingRange::new(2.0, 1.0).validate().is_err());
        assert!(ScalingRange::new(f64::NEG_INFINITY, 1.0).validate().is_err());
        assert!(ScalingRange::new(-f64::MAX, f64::MAX).validate().is_err());
        assert!(ScalingRange::new(f64::NAN, 1.0).validate().is_err());
        assert_eq!(ScalingRange::default().midpoint(), 0.0);
    }

    #[test]
    fn transform_rejects_wrong_widths() {
        let t = ScalingTransform { inputs: vec![], outputs: vec![] };
        assert!(t.scale_inputs(&mut [1.0]).is_err());
    }
}
