//! Synthetic datasets built from a target function.

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::dataset::dataset::Dataset;
use crate::error::{Error, Result};

/// Draws `size` samples with every input component uniform in `[lower, upper)`.
pub fn generate_random<F, R>(
    size: usize,
    inputs_size: usize,
    lower: f64,
    upper: f64,
    function: F,
    rng: &mut R,
) -> Result<Dataset>
where
    F: Fn(&[f64]) -> Vec<f64>,
    R: Rng + ?Sized,
{
    check_request(size, inputs_size, lower, upper)?;
    let between = Uniform::new(lower, upper);

    let inputs: Vec<Vec<f64>> = (0..size)
        .map(|_| (0..inputs_size).map(|_| between.sample(rng)).collect())
        .collect();
    let outputs = inputs.iter().map(|x| function(x.as_slice())).collect();
    Dataset::new(inputs, outputs)
}

/// Places `size` evenly spaced samples over `[lower, upper)`: sample `i`
/// has every input component equal to `lower + i * (upper - lower) / size`.
pub fn generate_sampled<F>(
    size: usize,
    inputs_size: usize,
    lower: f64,
    upper: f64,
    function: F,
) -> Result<Dataset>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    check_request(size, inputs_size, lower, upper)?;
    let step = (upper - lower) / size as f64;

    let inputs: Vec<Vec<f64>> = (0..size)
        .map(|i| vec![lower + i as f64 * step; inputs_size])
        .collect();
    let outputs = inputs.iter().map(|x| function(x.as_slice())).collect();
    Dataset::new(inputs, outputs)
}

fn check_request(size: usize, inputs_size: usize, lower: f64, upper: f64) -> Result<()> {
    if size == 0 {
        return Err(Error::Construction("dataset size must be positive".into()));
    }
    if inputs_size == 0 {
        return Err(Error::Construction("generated inputs need at least one component".into()));
    }
    if !(lower < upper && (upper - lower).is_finite()) {
        return Err(Error::Construction(format!(
            "input range [{}, {}) must be finite and non-empty",
            lower, upper
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn weighted_sum(x: &[f64]) -> Vec<f64> {
        vec![2.0 * x[0] + x[1]]
    }

    #[test]
    fn random_samples_stay_in_range_and_follow_function() {
        let mut rng = StdRng::seed_from_u64(5);
        let ds = generate_random(200, 2, -3.0, 4.0, weighted_sum, &mut rng).unwrap();
        assert_eq!(ds.len(), 200);
        for (x, y) in ds.inputs().iter().zip(ds.outputs()) {
            assert!(x.iter().all(|&v| (-3.0..4.0).contains(&v)));
            assert_abs_diff_eq!(y[0], 2.0 * x[0] + x[1], epsilon = 1e-12);
        }
    }

    #[test]
    fn sampled_inputs_are_evenly_spaced() {
        let ds = generate_sampled(4, 1, -1.0, 1.0, |x| vec![x[0] * x[0]]).unwrap();
        let xs: Vec<f64> = ds.inputs().iter().map(|x| x[0]).collect();
        assert_eq!(xs, vec![-1.0, -0.5, 0.0, 0.5]);
        assert_eq!(ds.outputs()[1], vec![0.25]);
    }

    #[test]
    fn sampled_fills_every_component() {
        let ds = generate_sampled(2, 3, 0.0, 1.0, |x| vec![x.iter().sum()]).unwrap();
        assert_eq!(ds.inputs()[1], vec![0.5, 0.5, 0.5]);
        assert_eq!(ds.outputs()[1], vec![1.5]);
    }

    #[test]
    fn degenerate_requests_fail() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(generate_random(0, 2, 0.0, 1.0, weighted_sum, &mut rng), Err(Error::Construction(_))));
        assert!(matches!(generate_sampled(10, 0, 0.0, 1.0, |_| vec![0.0]), Err(Error::Construction(_))));
        assert!(matches!(generate_sampled(10, 1, 1.0, 1.0, |_| vec![0.0]), Err(Error::Construction(_))));
        assert!(matches!(generate_sampled(10, 1, 2.0, 1.0, |_| vec![0.0]), Err(Error::Construction(_))));
    }

    #[test]
    fn overflowing_range_width_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            generate_random(4, 1, -f64::MAX, f64::MAX, weighted_sum, &mut rng),
            Err(Error::Construction(_))
        ));
        assert!(matches!(generate_sampled(4, 1, -f64::MAX, f64::MAX, |x| x.to_vec()), Err(Error::Construction(_))));
        assert!(matches!(generate_sampled(4, 1, 0.0, f64::INFINITY, |x| x.to_vec()), Err(Error::Construction(_))));
    }

    #[test]
    fn function_with_empty_output_is_rejected() {
        assert!(generate_sampled(3, 1, 0.0, 1.0, |_| Vec::new()).is_err());
    }
}
