use num::Float;

/// Evenly spaced samples over a closed interval, like numpy.linspace.
pub struct Linspace<F> {
    start: F,
    end: F,
    step: F,
    index: usize,
    len: usize,
}

impl<F: Float> Linspace<F> {
    pub fn new(min: F, max: F, n: usize) -> Self {
        let step = if n > 1 {
            let num_steps = F::from(n - 1).unwrap_or_else(F::one);
            (max - min) / num_steps
        } else {
            F::zero()
        };

        Linspace {
            start: min,
            end: max,
            step,
            index: 0,
            len: n,
        }
    }

    /// Samples `[min, max]` every `step`, always including both ends. `None`
    /// if the sample count doesn't fit in a `usize`.
    pub fn with_step(min: F, max: F, step: F) -> Option<Self> {
        Some(Self::new(min, max, Self::step_count(min, max, step)?))
    }

    /// Number of samples `with_step` takes over `[min, max]`, never fewer than two.
    pub fn step_count(min: F, max: F, step: F) -> Option<usize> {
        // floor is the closest approximation to python's int() conversion
        let num = ((max - min) / step).floor().to_usize()?.checked_add(1)?;

        Some(num.max(2))
    }
}

impl<F: Float> Iterator for Linspace<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        if self.index >= self.len {
            return None;
        }

        let i = F::from(self.index)?;
        self.index += 1;

        // The last sample is exactly `max`
        if self.index == self.len && self.len > 1 {
            return Some(self.end);
        }

        Some(self.start + self.step * i)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<F: Float> ExactSizeIterator for Linspace<F> {}

#[test]
fn test_linspace_endpoints() {
    let points: Vec<f64> = Linspace::new(0., 10., 11).collect();

    assert_eq!(points.len(), 11);
    assert_eq!(points[0], 0.);
    assert_eq!(points[5], 5.);
    assert_eq!(points[10], 10.);
}

#[test]
fn test_linspace_with_step() {
    let points: Vec<f64> = Linspace::with_step(0., 10., 0.1).unwrap().collect();

    assert_eq!(points.len(), 101);
    assert_eq!(points[100], 10.);
    approx::assert_relative_eq!(points[37], 3.7, epsilon = 1e-12);

    // A step wider than the domain still yields both ends
    let points: Vec<f64> = Linspace::with_step(2., 3., 5.).unwrap().collect();

    assert_eq!(points, vec![2., 3.]);
}

#[test]
fn test_linspace_step_count_overflow() {
    assert_eq!(Linspace::step_count(0., 1., 0.25), Some(5));
    assert_eq!(Linspace::step_count(0., 1., 1e-300), None);
    assert_eq!(Linspace::step_count(-1e308, 1e308, 1.), None);
    assert!(Linspace::with_step(0., 1., f64::MIN_POSITIVE).is_none());
}
