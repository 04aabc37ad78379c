pub trait Filter<T>: Default {
    fn add_sample(&mut self, sample: T);

    fn filtered_value(&self) -> Option<T>;

    fn reset(&mut self);
}

/// First-order exponential (IIR) low-pass, `y = alpha * y + (1 - alpha) * x`.
///
/// The first sample after reset seeds the filter state directly so the
/// output has no startup transient.
pub struct ExponentialFilter {
    alpha: f32,
    filtered_value: Option<f32>,
}

impl ExponentialFilter {
    pub const fn new(alpha: f32) -> Self {
        Self {
            alpha,
            filtered_value: None,
        }
    }
}

impl Default for ExponentialFilter {
    fn default() -> Self {
        Self::new(0.9)
    }
}

impl Filter<f32> for ExponentialFilter {
    fn add_sample(&mut self, sample: f32) {
        self.filtered_value = match self.filtered_value {
            None => Some(sample),
            Some(prev) => Some(self.alpha * prev + (1.0 - self.alpha) * sample),
        };
    }

    fn filtered_value(&self) -> Option<f32> {
        self.filtered_value
    }

    fn reset(&mut self) {
        self.filtered_value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_seeds_exactly() {
        let mut filter = ExponentialFilter::default();
        assert_eq!(filter.filtered_value(), None);

        filter.add_sample(12.5);
        assert_eq!(filter.filtered_value(), Some(12.5));
    }

    #[test]
    fn smooths_subsequent_samples() {
        let mut filter = ExponentialFilter::default();
        filter.add_sample(0.0);
        filter.add_sample(10.0);
        let val = filter.filtered_value().unwrap();
        assert!(libm::fabsf(val - 1.0) < 1e-6);
    }

    #[test]
    fn converges_geometrically_on_constant_input() {
        let mut filter = ExponentialFilter::default();
        filter.add_sample(0.0);

        let mut prev_err = 100.0f32;
        for _ in 0..100 {
            filter.add_sample(100.0);
            let err = libm::fabsf(100.0 - filter.filtered_value().unwrap());
            assert!(err <= prev_err * 0.9 + 1e-4);
            prev_err = err;
        }
        assert!(prev_err < 1e-2);
    }

    #[test]
    fn reset_returns_to_seeding() {
        let mut filter = ExponentialFilter::default();
        filter.add_sample(1.0);
        filter.add_sample(2.0);
        filter.reset();
        assert_eq!(filter.filtered_value(), None);

        filter.add_sample(7.0);
        assert_eq!(filter.filtered_value(), Some(7.0));
    }
}
