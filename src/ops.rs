use num::Float;
use serde::{Deserialize, Serialize};

use crate::math::interp;

/// And operator method for combining the compositions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AndOp {
    #[default]
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
}

impl AndOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
            Self::DrasticProd => {
                if v == F::one() {
                    u
                } else if u == F::one() {
                    v
                } else {
                    F::zero()
                }
            },
        }
    }

    /// Folds every degree with this operator. `None` for no degrees.
    pub fn fold<F: Float>(self, degrees: impl IntoIterator<Item = F>) -> Option<F> {
        degrees.into_iter().reduce(|u, v| self.call(u, v))
    }
}

/// Or operator method for combining the compositions of propositions
/// in a fuzzy rule premise. Also used to aggregate rules sharing a consequent
/// and to union the implied output curves.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl OrOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
            Self::DrasticSum => {
                if v == F::zero() {
                    u
                } else if u == F::zero() {
                    v
                } else {
                    F::one()
                }
            },
        }
    }

    pub fn fold<F: Float>(self, degrees: impl IntoIterator<Item = F>) -> Option<F> {
        degrees.into_iter().reduce(|u, v| self.call(u, v))
    }
}

/// Implication operator shaping a consequent term by its activation level.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplicationOp {
    /// Clip the term at the activation level (Mamdani)
    #[default]
    Min,
    /// Scale the term by the activation level (Larsen)
    Prod,
}

impl ImplicationOp {
    pub fn call<F: Float>(self, activation: F, degree: F) -> F {
        match self {
            Self::Min => F::min(activation, degree),
            Self::Prod => activation * degree,
        }
    }
}

/// Method for defuzzifcating the resulting membership function.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationOp {
    /// Center of Gravity
    #[default]
    Cog,
    /// Bisector of Area
    Boa,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

impl DefuzzificationOp {
    /// Reduces a sampled membership curve to one crisp value.
    ///
    /// Returns `None` when the curve encloses no area, i.e. it is zero
    /// everywhere or has fewer than two samples.
    pub fn call<F: Float>(self, universe: &[F], membership: &[F]) -> Option<F> {
        debug_assert_eq!(universe.len(), membership.len());

        if universe.len() < 2 {
            return None;
        }

        match self {
            Self::Cog => centroid(universe, membership),
            Self::Boa => bisector(universe, membership),
            Self::Mom => {
                let maxima = maxima(universe, membership)?;
                let len = F::from(maxima.len())?;

                Some(maxima.into_iter().fold(F::zero(), |acc, u| acc + u) / len)
            },
            Self::Lom => maxima(universe, membership)?.into_iter().reduce(F::max),
            Self::Som => maxima(universe, membership)?.into_iter().reduce(F::min),
        }
    }
}

/// Center of gravity of a piecewise-linear curve. Each segment is split into a
/// rectangle and a triangle whose areas and centroids are exact.
pub fn centroid<F: Float>(universe: &[F], membership: &[F]) -> Option<F> {
    let two = F::one() + F::one();
    let three = two + F::one();
    let mut num = F::zero();
    let mut den = F::zero();

    for (u, m) in universe.windows(2).zip(membership.windows(2)) {
        let base = u[1] - u[0];
        let area_rect = F::min(m[0], m[1]) * base;
        let center_rect = u[0] + base / two;
        let area_tri = base * F::abs(m[1] - m[0]) / two;
        let center_tri = if m[1] > m[0] {
            u[0] + two / three * base
        } else {
            u[0] + F::one() / three * base
        };

        num = num + area_rect * center_rect + area_tri * center_tri;
        den = den + area_rect + area_tri;
    }

    if den > F::zero() {
        Some(num / den)
    } else {
        None
    }
}

fn bisector<F: Float>(universe: &[F], membership: &[F]) -> Option<F> {
    let two = F::one() + F::one();
    let areas: Vec<F> = universe
        .windows(2)
        .zip(membership.windows(2))
        .map(|(u, m)| (m[0] + m[1]) * (u[1] - u[0]) / two)
        .collect();
    let total = areas.iter().fold(F::zero(), |acc, a| acc + *a);

    if total <= F::zero() {
        return None;
    }

    let target = total / two;
    let mut cum_area = F::zero();

    for (i, area) in areas.iter().enumerate() {
        let prev = cum_area;

        cum_area = cum_area + *area;

        if cum_area >= target {
            return Some(interp(target, &[(prev, universe[i]), (cum_area, universe[i + 1])]));
        }
    }

    universe.last().copied()
}

fn maxima<F: Float>(universe: &[F], membership: &[F]) -> Option<Vec<F>> {
    let maximum = membership.iter().copied().reduce(F::max)?;

    if maximum <= F::zero() {
        return None;
    }

    Some(
        universe
            .iter()
            .zip(membership)
            .filter_map(|(u, m)| if *m == maximum { Some(*u) } else { None })
            .collect(),
    )
}

/// The operator set used by an engine. Defaults to classic Mamdani:
/// min conjunction, max aggregation, clipping implication and centroid.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Operators {
    pub and_op: AndOp,
    pub or_op: OrOp,
    pub imp_op: ImplicationOp,
    pub defuzz_op: DefuzzificationOp,
}

impl Operators {
    /// Larsen variant: product conjunction and scaling implication
    pub fn larsen() -> Self {
        Self {
            and_op: AndOp::Prod,
            imp_op: ImplicationOp::Prod,
            ..Self::default()
        }
    }
}
