//! Membership functions mapping a crisp value to a degree in `[0, 1]`.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::interp;

/// The raw parameters of a membership function, before validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "params", rename_all = "snake_case")]
pub enum Shape {
    /// `(a, b, c)`: zero outside `[a, c]`, peak of one at `b`
    Triangular(f64, f64, f64),
    /// `(a, b, c, d)`: zero outside `[a, d]`, plateau of one on `[b, c]`
    Trapezoidal(f64, f64, f64, f64),
    /// `(center, sigma)`
    Gaussian(f64, f64),
    /// `(inflection, slope)`; a negative slope gives a descending curve
    Sigmoid(f64, f64),
    /// Piecewise-linear through `(x, degree)` points sorted by x
    Points(Vec<(f64, f64)>),
}

/// A validated membership function.
///
/// Evaluation is pure and total: [`MembershipFn::degree`] returns a value in
/// `[0, 1]` for every finite input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Shape", into = "Shape")]
pub struct MembershipFn(Shape);

impl MembershipFn {
    pub fn new(shape: Shape) -> Result<Self, ConfigError> {
        validate(&shape)?;

        Ok(MembershipFn(shape))
    }

    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self, ConfigError> {
        Self::new(Shape::Triangular(a, b, c))
    }

    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<Self, ConfigError> {
        Self::new(Shape::Trapezoidal(a, b, c, d))
    }

    pub fn gaussian(center: f64, sigma: f64) -> Result<Self, ConfigError> {
        Self::new(Shape::Gaussian(center, sigma))
    }

    pub fn sigmoid(inflection: f64, slope: f64) -> Result<Self, ConfigError> {
        Self::new(Shape::Sigmoid(inflection, slope))
    }

    pub fn points(points: impl Into<Vec<(f64, f64)>>) -> Result<Self, ConfigError> {
        Self::new(Shape::Points(points.into()))
    }

    pub fn shape(&self) -> &Shape {
        &self.0
    }

    /// Degree of membership of `x`, always within `[0, 1]`.
    pub fn degree(&self, x: f64) -> f64 {
        match self.0 {
            Shape::Triangular(a, b, c) => {
                if x < a || x > c {
                    0.
                } else if x == b {
                    1.
                } else if x < b {
                    ramp(x, a, b)
                } else {
                    ramp(x, c, b)
                }
            },
            Shape::Trapezoidal(a, b, c, d) => {
                if x < a || x > d {
                    0.
                } else if b <= x && x <= c {
                    1.
                } else if x < b {
                    ramp(x, a, b)
                } else {
                    ramp(x, d, c)
                }
            },
            // Scaling by sigma first keeps tiny sigmas from underflowing to 0/0
            Shape::Gaussian(center, sigma) => (-0.5 * ((x - center) / sigma).powi(2)).exp(),
            Shape::Sigmoid(inflection, slope) => {
                let z = slope * (x - inflection);

                // A flat sigmoid is 0.5 everywhere, even where x - inflection overflows
                if z.is_nan() {
                    0.5
                } else {
                    1. / (1. + (-z).exp())
                }
            },
            Shape::Points(ref points) => interp(x, points),
        }
    }

    /// Interval where the degree is nonzero, if bounded.
    pub fn support(&self) -> Option<(f64, f64)> {
        match self.0 {
            Shape::Triangular(a, _, c) => Some((a, c)),
            Shape::Trapezoidal(a, _, _, d) => Some((a, d)),
            Shape::Gaussian(..) | Shape::Sigmoid(..) => None,
            Shape::Points(ref points) => {
                let first = points.first()?;
                let last = points.last()?;

                // Flat shoulders above zero extend forever
                if first.1 > 0. || last.1 > 0. {
                    return None;
                }

                let leading = points.iter().take_while(|p| p.1 == 0.).count();

                if leading == points.len() {
                    return None;
                }

                let trailing = points.iter().rev().take_while(|p| p.1 == 0.).count();

                Some((points[leading - 1].0, points[points.len() - trailing].0))
            },
        }
    }

    /// Interval where the degree reaches one, if it does.
    pub fn core(&self) -> Option<(f64, f64)> {
        match self.0 {
            Shape::Triangular(_, b, _) => Some((b, b)),
            Shape::Trapezoidal(_, b, c, _) => Some((b, c)),
            Shape::Gaussian(center, _) => Some((center, center)),
            Shape::Sigmoid(..) => None,
            Shape::Points(ref points) => {
                let start = points.iter().find(|p| p.1 == 1.)?;
                let end = points.iter().rev().find(|p| p.1 == 1.)?;

                Some((start.0, end.0))
            },
        }
    }
}

/// Linear rise from zero at `from` to one at `to`, for `x` between them.
fn ramp(x: f64, from: f64, to: f64) -> f64 {
    let span = to - from;
    let t = if span.is_finite() {
        (x - from) / span
    } else {
        // The span of two huge values overflows, their halves don't
        (x * 0.5 - from * 0.5) / (to * 0.5 - from * 0.5)
    };

    t.clamp(0., 1.)
}

impl TryFrom<Shape> for MembershipFn {
    type Error = ConfigError;

    fn try_from(shape: Shape) -> Result<Self, Self::Error> {
        MembershipFn::new(shape)
    }
}

impl From<MembershipFn> for Shape {
    fn from(mf: MembershipFn) -> Self {
        mf.0
    }
}

fn validate(shape: &Shape) -> Result<(), ConfigError> {
    let finite = |name: &'static str, params: &[f64]| {
        if params.iter().all(|p| p.is_finite()) {
            Ok(())
        } else {
            Err(ConfigError::invalid_shape(name, format!("parameters must be finite, got {params:?}")))
        }
    };

    match *shape {
        Shape::Triangular(a, b, c) => {
            finite("triangular", &[a, b, c])?;

            if !(a <= b && b <= c) {
                return Err(ConfigError::invalid_shape(
                    "triangular",
                    format!("expected a <= b <= c, got a={a}, b={b}, c={c}"),
                ));
            }
        },
        Shape::Trapezoidal(a, b, c, d) => {
            finite("trapezoidal", &[a, b, c, d])?;

            if !(a <= b && b <= c && c <= d) {
                return Err(ConfigError::invalid_shape(
                    "trapezoidal",
                    format!("expected a <= b <= c <= d, got a={a}, b={b}, c={c}, d={d}"),
                ));
            }
        },
        Shape::Gaussian(center, sigma) => {
            finite("gaussian", &[center, sigma])?;

            if sigma <= 0. {
                return Err(ConfigError::invalid_shape(
                    "gaussian",
                    format!("expected sigma > 0, got sigma={sigma}"),
                ));
            }
        },
        Shape::Sigmoid(inflection, slope) => finite("sigmoid", &[inflection, slope])?,
        Shape::Points(ref points) => {
            if points.is_empty() {
                return Err(ConfigError::invalid_shape("points", "expected at least one point"));
            }

            for &(x, y) in points {
                finite("points", &[x, y])?;

                if !(0. ..=1.).contains(&y) {
                    return Err(ConfigError::invalid_shape(
                        "points",
                        format!("expected degrees in [0, 1], got {y} at x={x}"),
                    ));
                }
            }

            if let Some(pair) = points.windows(2).find(|w| w[0].0 > w[1].0) {
                return Err(ConfigError::invalid_shape(
                    "points",
                    format!("expected x to be non-decreasing, got {} before {}", pair[0].0, pair[1].0),
                ));
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_triangular() {
        let mf = MembershipFn::triangular(0., 5., 10.).unwrap();

        assert_eq!(mf.degree(5.), 1.);
        assert_eq!(mf.degree(0.), 0.);
        assert_eq!(mf.degree(10.), 0.);
        assert_eq!(mf.degree(2.5), 0.5);
        assert_eq!(mf.degree(7.5), 0.5);
        assert_eq!(mf.degree(-1.), 0.);
        assert_eq!(mf.degree(11.), 0.);
    }

    #[test]
    fn test_triangular_shoulders() {
        let left = MembershipFn::triangular(0., 0., 10.).unwrap();
        let right = MembershipFn::triangular(0., 10., 10.).unwrap();

        assert_eq!(left.degree(0.), 1.);
        assert_eq!(left.degree(10.), 0.);
        assert_eq!(left.degree(4.), 0.6);
        assert_eq!(right.degree(10.), 1.);
        assert_eq!(right.degree(0.), 0.);
        assert_eq!(right.degree(4.), 0.4);
    }

    #[test]
    fn test_trapezoidal() {
        let mf = MembershipFn::trapezoidal(35., 45., 55., 65.).unwrap();

        assert_eq!(mf.degree(35.), 0.);
        assert_eq!(mf.degree(40.), 0.5);
        assert_eq!(mf.degree(45.), 1.);
        assert_eq!(mf.degree(55.), 1.);
        assert_eq!(mf.degree(60.), 0.5);
        assert_eq!(mf.degree(65.), 0.);

        let shoulder = MembershipFn::trapezoidal(60., 70., 90., 90.).unwrap();

        assert_eq!(shoulder.degree(90.), 1.);
        assert_eq!(shoulder.degree(95.), 0.);
    }

    #[test]
    fn test_gaussian() {
        let mf = MembershipFn::gaussian(27., 5.).unwrap();

        assert_eq!(mf.degree(27.), 1.);
        assert_relative_eq!(mf.degree(32.), (-0.5f64).exp());
        assert_relative_eq!(mf.degree(22.), mf.degree(32.));
    }

    #[test]
    fn test_sigmoid() {
        let rising = MembershipFn::sigmoid(7., 2.).unwrap();
        let falling = MembershipFn::sigmoid(3., -2.).unwrap();

        assert_eq!(rising.degree(7.), 0.5);
        assert!(rising.degree(9.) > 0.98);
        assert!(rising.degree(5.) < 0.02);
        assert_eq!(falling.degree(3.), 0.5);
        assert!(falling.degree(0.) > 0.99);
        assert!(falling.degree(10.) < 0.01);
        // Saturates instead of overflowing
        assert_eq!(rising.degree(-1e6), 0.);
        assert_eq!(rising.degree(1e6), 1.);
    }

    #[test]
    fn test_extreme_parameters() {
        let narrow = MembershipFn::gaussian(5., 1e-200).unwrap();

        assert_eq!(narrow.degree(5.), 1.);
        assert_eq!(narrow.degree(5.1), 0.);
        assert_eq!(MembershipFn::gaussian(-1e308, 1.).unwrap().degree(1e308), 0.);

        let flat = MembershipFn::sigmoid(-1e308, 0.).unwrap();

        assert_eq!(flat.degree(1e308), 0.5);
        assert_eq!(flat.degree(0.), 0.5);
        assert_eq!(MembershipFn::sigmoid(-1e308, 1e-300).unwrap().degree(1e308), 1.);

        let wide = MembershipFn::triangular(-1e308, 1e308, 1e308).unwrap();

        assert_relative_eq!(wide.degree(0.), 0.5, epsilon = 1e-12);
        assert_relative_eq!(wide.degree(9e307), 0.95, epsilon = 1e-12);

        let wide = MembershipFn::trapezoidal(-1.7e308, -1e308, 1e308, 1.7e308).unwrap();

        assert_eq!(wide.degree(0.), 1.);
        assert_relative_eq!(wide.degree(1.35e308), 0.5, epsilon = 1e-12);

        let wide = MembershipFn::points([(-1e308, 0.), (1e308, 1.)]).unwrap();

        assert_relative_eq!(wide.degree(0.), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_points() {
        let mf = MembershipFn::points([(175., 0.), (180., 0.2), (185., 0.7), (190., 1.)]).unwrap();

        assert_eq!(mf.degree(150.), 0.);
        assert_relative_eq!(mf.degree(182.5), 0.45);
        assert_eq!(mf.degree(200.), 1.);
        assert_eq!(mf.core(), Some((190., 190.)));
        assert_eq!(mf.support(), None);
    }

    #[test]
    fn test_support_and_core() {
        let tri = MembershipFn::triangular(4., 6., 8.).unwrap();
        let trap = MembershipFn::trapezoidal(0., 0., 3., 5.).unwrap();

        assert_eq!(tri.support(), Some((4., 8.)));
        assert_eq!(tri.core(), Some((6., 6.)));
        assert_eq!(trap.support(), Some((0., 5.)));
        assert_eq!(trap.core(), Some((0., 3.)));
        assert_eq!(MembershipFn::sigmoid(1., 1.).unwrap().core(), None);

        let bump = MembershipFn::points([(0., 0.), (1., 0.), (2., 1.), (3., 0.)]).unwrap();

        assert_eq!(bump.support(), Some((1., 3.)));
    }

    #[test]
    fn test_invalid_shapes() {
        let err = MembershipFn::triangular(5., 2., 8.).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidShape { shape: "triangular", .. }));
        assert!(err.to_string().contains("a <= b <= c"));

        assert!(MembershipFn::trapezoidal(0., 3., 2., 5.).is_err());
        assert!(MembershipFn::gaussian(0., 0.).is_err());
        assert!(MembershipFn::gaussian(0., -1.).is_err());
        assert!(MembershipFn::sigmoid(f64::NAN, 1.).is_err());
        assert!(MembershipFn::triangular(0., f64::INFINITY, f64::INFINITY).is_err());
        assert!(MembershipFn::points(Vec::new()).is_err());
        assert!(MembershipFn::points([(0., 0.), (1., 1.5)]).is_err());
        assert!(MembershipFn::points([(2., 0.), (1., 1.)]).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        #[derive(Deserialize)]
        struct Holder {
            mf: MembershipFn,
        }

        let ok: Holder = toml::from_str("mf = { shape = \"triangular\", params = [0.0, 5.0, 10.0] }").unwrap();

        assert_eq!(ok.mf, MembershipFn::triangular(0., 5., 10.).unwrap());

        let bad = toml::from_str::<Holder>("mf = { shape = \"gaussian\", params = [0.0, -1.0] }");

        assert!(bad.is_err());
    }

    fn any_shape() -> impl Strategy<Value = MembershipFn> {
        let value = || prop_oneof![-1e3f64..1e3, prop::num::f64::NORMAL, Just(0.)];
        let ordered = prop::collection::vec(value(), 4).prop_map(|mut v| {
            v.sort_by(|a, b| a.total_cmp(b));
            v
        });
        let sigma = prop_oneof![1e-3f64..1e3, 1e-300f64..1e-3, prop::num::f64::NORMAL.prop_map(f64::abs)];
        let slope = prop_oneof![-50f64..50., Just(0.), prop::num::f64::NORMAL];

        prop_oneof![
            ordered.clone().prop_map(|v| MembershipFn::triangular(v[0], v[1], v[2]).unwrap()),
            ordered.clone().prop_map(|v| MembershipFn::trapezoidal(v[0], v[1], v[2], v[3]).unwrap()),
            (value(), sigma).prop_map(|(c, s)| MembershipFn::gaussian(c, s).unwrap()),
            (value(), slope).prop_map(|(i, s)| MembershipFn::sigmoid(i, s).unwrap()),
            ordered.prop_map(|v| MembershipFn::points([(v[0], 0.), (v[1], 1.), (v[2], 1.), (v[3], 0.)]).unwrap()),
        ]
    }

    proptest! {
        #[test]
        fn degree_stays_in_unit_interval(
            mf in any_shape(),
            x in prop_oneof![-1e4f64..1e4, prop::num::f64::NORMAL, Just(0.)],
        ) {
            let degree = mf.degree(x);

            prop_assert!((0. ..=1.).contains(&degree), "{:?} at {} gave {}", mf, x, degree);
        }

        #[test]
        fn triangular_peaks_at_b(a in -1e3f64..0., b in 0f64..1e3, width in 0f64..1e3) {
            let mf = MembershipFn::triangular(a, b, b + width).unwrap();

            prop_assert_eq!(mf.degree(b), 1.);
        }

        #[test]
        fn trapezoidal_plateau(b in -1e3f64..1e3, width in 0f64..1e3, t in 0f64..=1.) {
            let c = b + width;
            let mf = MembershipFn::trapezoidal(b - 1., b, c, c + 1.).unwrap();
            let x = (b + t * width).min(c);

            prop_assert_eq!(mf.degree(x), 1.);
        }
    }
}
