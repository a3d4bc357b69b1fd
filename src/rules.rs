use std::collections::HashMap;

use crate::dsl::{Expr, Proposition};
use crate::error::{ConfigError, EvalError};
use crate::ops::{AndOp, OrOp};
use crate::variable::{Role, VariableKey, Variables};

/// `IF premise THEN consequence`. Rules carry no priority: every rule fires
/// and contributes to aggregation.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub(crate) premise: Expr,
    pub(crate) consequence: Proposition,
}

impl Rule {
    pub fn new(premise: impl Into<Expr>, consequence: Proposition) -> Self {
        Rule {
            premise: premise.into(),
            consequence,
        }
    }

    pub fn premise(&self) -> &Expr {
        &self.premise
    }

    pub fn consequence(&self) -> &Proposition {
        &self.consequence
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    pub fn add(&mut self, premise: impl Into<Expr>, consequence: Proposition) {
        self.0.push(Rule::new(premise, consequence));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Rule> {
        self.0.iter()
    }
}

impl FromIterator<Rule> for Rules {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Rules(iter.into_iter().collect())
    }
}

/// A premise whose terms have been resolved to indices on their variable.
#[derive(Clone, Debug)]
pub(crate) enum Premise {
    Is { variable: VariableKey, term: usize },
    And(Vec<Premise>),
    Or(Vec<Premise>),
}

/// A rule checked against the engine's variables.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedRule {
    pub(crate) premise: Premise,
    pub(crate) output: VariableKey,
    pub(crate) term: usize,
}

impl ResolvedRule {
    pub(crate) fn resolve(index: usize, rule: &Rule, vars: &Variables) -> Result<Self, ConfigError> {
        let premise = resolve_premise(index, &rule.premise, vars)?;
        let (output, term) = resolve_proposition(index, &rule.consequence, vars, Role::Output)?;

        Ok(ResolvedRule { premise, output, term })
    }

    /// Firing strength of the premise for the given crisp facts.
    pub(crate) fn fire(
        &self,
        vars: &Variables,
        facts: &HashMap<VariableKey, f64>,
        and_op: AndOp,
        or_op: OrOp,
    ) -> Result<f64, EvalError> {
        fire_premise(&self.premise, vars, facts, and_op, or_op)
    }
}

fn resolve_premise(index: usize, expr: &Expr, vars: &Variables) -> Result<Premise, ConfigError> {
    let resolve_all = |exprs: &[Expr]| -> Result<Vec<Premise>, ConfigError> {
        if exprs.is_empty() {
            return Err(ConfigError::EmptyAntecedent(index));
        }

        exprs.iter().map(|e| resolve_premise(index, e, vars)).collect()
    };

    Ok(match expr {
        Expr::Is(prop) => {
            let (variable, term) = resolve_proposition(index, prop, vars, Role::Input)?;

            Premise::Is { variable, term }
        },
        Expr::And(exprs) => Premise::And(resolve_all(exprs)?),
        Expr::Or(exprs) => Premise::Or(resolve_all(exprs)?),
    })
}

fn resolve_proposition(
    index: usize,
    prop: &Proposition,
    vars: &Variables,
    expected: Role,
) -> Result<(VariableKey, usize), ConfigError> {
    let var = vars
        .slot(prop.variable)
        .ok_or_else(|| ConfigError::UnknownVariableReference {
            rule: index,
            variable: format!("{:?}", prop.variable),
        })?;

    if var.role() != expected {
        return Err(ConfigError::RoleMismatch {
            rule: index,
            variable: var.name().to_owned(),
            role: var.role().as_str(),
            position: match expected {
                Role::Input => "antecedent",
                Role::Output => "consequent",
            },
        });
    }

    let term = var
        .term_index(&prop.term)
        .ok_or_else(|| ConfigError::UnknownTermReference {
            rule: index,
            variable: var.name().to_owned(),
            term: prop.term.clone(),
        })?;

    Ok((prop.variable, term))
}

fn fire_premise(
    premise: &Premise,
    vars: &Variables,
    facts: &HashMap<VariableKey, f64>,
    and_op: AndOp,
    or_op: OrOp,
) -> Result<f64, EvalError> {
    match premise {
        Premise::Is { variable, term } => {
            // Keys were checked when the rule was resolved
            let Some(var) = vars.slot(*variable) else {
                return Err(EvalError::UnknownVariable(format!("{variable:?}")));
            };
            let value = facts
                .get(variable)
                .ok_or_else(|| EvalError::MissingInput(var.name().to_owned()))?;

            Ok(var.term_at(*term).membership().degree(*value))
        },
        Premise::And(premises) => {
            let degrees = premises
                .iter()
                .map(|p| fire_premise(p, vars, facts, and_op, or_op))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(and_op.fold(degrees).unwrap_or(0.))
        },
        Premise::Or(premises) => {
            let degrees = premises
                .iter()
                .map(|p| fire_premise(p, vars, facts, and_op, or_op))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(or_op.fold(degrees).unwrap_or(0.))
        },
    }
}
