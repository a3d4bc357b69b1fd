use crate::variable::{Variable, VariableKey};

/// A single `variable IS term` statement.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Proposition {
    pub(crate) variable: VariableKey,
    pub(crate) term: String,
}

impl Proposition {
    pub fn variable(&self) -> VariableKey {
        self.variable
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn and(self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).and(rhs)
    }

    pub fn or(self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).or(rhs)
    }
}

/// A rule premise. Plain conjunctions of propositions are the common case;
/// `Or` nodes are combined with the engine's [`OrOp`](crate::ops::OrOp).
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Is(Proposition),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    /// Conjunction of every expression
    pub fn all(exprs: impl IntoIterator<Item = impl Into<Expr>>) -> Self {
        Expr::And(exprs.into_iter().map(Into::into).collect())
    }

    /// Disjunction of every expression
    pub fn any(exprs: impl IntoIterator<Item = impl Into<Expr>>) -> Self {
        Expr::Or(exprs.into_iter().map(Into::into).collect())
    }

    pub fn and(self, rhs: impl Into<Expr>) -> Self {
        match self {
            Expr::And(mut exprs) => {
                exprs.push(rhs.into());
                Expr::And(exprs)
            },
            lhs => Expr::And(vec![lhs, rhs.into()]),
        }
    }

    pub fn or(self, rhs: impl Into<Expr>) -> Self {
        match self {
            Expr::Or(mut exprs) => {
                exprs.push(rhs.into());
                Expr::Or(exprs)
            },
            lhs => Expr::Or(vec![lhs, rhs.into()]),
        }
    }

    /// Every proposition referenced, left to right.
    pub fn propositions(&self) -> Vec<&Proposition> {
        let mut props = Vec::new();

        fn parse<'p>(expr: &'p Expr, out: &mut Vec<&'p Proposition>) {
            match expr {
                Expr::Is(prop) => out.push(prop),
                Expr::And(exprs) | Expr::Or(exprs) => {
                    for expr in exprs {
                        parse(expr, out);
                    }
                },
            }
        }

        parse(self, &mut props);

        props
    }
}

impl From<Proposition> for Expr {
    fn from(prop: Proposition) -> Self {
        Expr::Is(prop)
    }
}

impl Variable {
    /// `self IS term`. The handle only means something to the [`Variables`]
    /// that returned it; an engine built from another store may reject the
    /// rule or bind it to whichever variable sits under the same key.
    ///
    /// [`Variables`]: crate::Variables
    pub fn is(self, term: impl Into<String>) -> Proposition {
        Proposition {
            variable: self.0,
            term: term.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::MembershipFn;
    use crate::terms::Terms;
    use crate::variable::Variables;

    #[test]
    fn test_builder_flattens_chains() {
        let mut vars = Variables::new();
        let terms = || Terms::new().with("low", MembershipFn::triangular(0., 0., 1.).unwrap());
        let a = vars.add_input("a", 0. ..=1., terms(), None).unwrap();
        let b = vars.add_input("b", 0. ..=1., terms(), None).unwrap();
        let c = vars.add_input("c", 0. ..=1., terms(), None).unwrap();

        let expr = a.is("low").and(b.is("low")).and(c.is("low"));

        assert!(matches!(&expr, Expr::And(exprs) if exprs.len() == 3));

        let expr = a.is("low").and(b.is("low").or(c.is("low")));
        let props: Vec<_> = expr.propositions().iter().map(|p| p.variable()).collect();

        assert_eq!(props, vec![a.key(), b.key(), c.key()]);
        assert_eq!(Expr::all([a.is("low"), b.is("low")]), a.is("low").and(b.is("low")));
    }
}
