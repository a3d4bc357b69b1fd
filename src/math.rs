use num::Float;

/// Piecewise-linear interpolation of `x` through `coords`, similar to numpy.interp.
///
/// `coords` must be sorted by x. Values left of the first point take the first
/// y, values right of the last point take the last y. An empty table yields zero.
pub(crate) fn interp<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let (Some(&(first_x, first_y)), Some(&(last_x, last_y))) = (coords.first(), coords.last()) else {
        return F::zero();
    };

    if x <= first_x {
        return first_y;
    }
    if x >= last_x {
        return last_y;
    }

    for window in coords.windows(2) {
        let (x1, y1) = window[0];
        let (x2, y2) = window[1];

        if x1 <= x && x <= x2 {
            // Vertical step in the table
            if x2 == x1 {
                return y2;
            }

            let span = x2 - x1;
            let t = if span.is_finite() {
                (x - x1) / span
            } else {
                // Halves of huge coordinates don't overflow
                let half = F::one() / (F::one() + F::one());

                (x * half - x1 * half) / (x2 * half - x1 * half)
            };

            return y1 + t * (y2 - y1);
        }
    }

    last_y
}

#[test]
fn test_interp() {
    let interp_many = |xs: &[f64], coords: &[(f64, f64)]| xs.iter().map(|&x| interp(x, coords)).collect::<Vec<_>>();
    let coords = [(1., 3.), (2., 2.), (3., 0.)];

    assert_eq!(
        interp_many(&[0., 1., 1.5, 3.24], &coords),
        vec![3., 3., 2.5, 0.]
    );
    approx::assert_relative_eq!(interp(2.72, &coords), 0.56, epsilon = 1e-12);

    let coords = [(0., 0.), (1., 2.), (2., 5.), (3., 3.), (4.5, 2.)];

    assert_eq!(interp_many(&[2.5, -1., 7.5], &coords), vec![4., 0., 2.]);
}

#[test]
fn test_interp_edge_tables() {
    assert_eq!(interp(4., &[] as &[(f64, f64)]), 0.);
    assert_eq!(interp(-3., &[(2., 0.7)]), 0.7);
    assert_eq!(interp(9., &[(2., 0.7)]), 0.7);
    // A point on a vertical step takes the first segment that reaches it
    assert_eq!(interp(1., &[(0., 0.), (1., 0.), (1., 1.), (2., 1.)]), 0.);
    assert_eq!(interp(1.5, &[(0., 0.), (1., 0.), (1., 1.), (2., 1.)]), 1.);
}
