/// Online gradient descent with momentum on the previous step's raw gradient.
///
/// `momentum` scales the gradient saved from the previous step, not the
/// previous (learning-rate scaled) update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
    pub momentum: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64, momentum: f64) -> Sgd {
        Sgd { learning_rate, momentum }
    }

    /// Applies one update to a single weight and stores `gradient` as the
    /// momentum term for the next call.
    pub fn step(&self, weight: &mut f64, last_gradient: &mut f64, gradient: f64) {
        *weight -= gradient * self.learning_rate + *last_gradient * self.momentum;
        *last_gradient = gradient;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_is_plain_gradient_descent() {
        let sgd = Sgd::new(0.5, 0.9);
        let (mut w, mut last) = (1.0, 0.0);
        sgd.step(&mut w, &mut last, 2.0);
        assert_eq!(w, 0.0);
        assert_eq!(last, 2.0);
    }

    #[test]
    fn second_step_adds_momentum_of_previous_gradient() {
        let sgd = Sgd::new(0.1, 0.5);
        let (mut w, mut last) = (0.0, 0.0);
        sgd.step(&mut w, &mut last, 1.0);
        sgd.step(&mut w, &mut last, 1.0);
        // -0.1 then -(0.1 + 0.5)
        assert!((w - -0.7).abs() < 1e-12);
    }
}
