//! Serializable system descriptions.
//!
//! A [`SystemDescription`] is the in-memory form of a whole system: variables
//! with their terms, rules, and the operator set. It is usually written in TOML:
//!
//! ```toml
//! [[variables]]
//! name = "x"
//! role = "input"
//! min = 0.0
//! max = 10.0
//!
//! [[variables.terms]]
//! name = "low"
//! shape = "triangular"
//! params = [0.0, 0.0, 10.0]
//!
//! [[rules]]
//! if = [["x", "low"]]
//! then = ["y", "small"]
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dsl::{Expr, Proposition};
use crate::error::{ConfigError, Result};
use crate::inference::InferenceEngine;
use crate::ops::Operators;
use crate::rules::{Rule, Rules};
use crate::terms::{Term, Terms};
use crate::variable::{FuzzyVariable, Role, Variables};

/// A complete system, ready to be built into an [`InferenceEngine`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemDescription {
    /// Operator set (default: min/max/clip/centroid)
    #[serde(default)]
    pub operators: Operators,

    /// Variables in declaration order
    #[serde(default)]
    pub variables: Vec<VariableSpec>,

    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// One variable of a [`SystemDescription`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,

    pub role: Role,

    /// Lower bound of the domain
    pub min: f64,

    /// Upper bound of the domain
    pub max: f64,

    /// Sampling step (default: 0.1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    /// Terms in declaration order
    pub terms: Vec<Term>,
}

/// `if` holds the conjunction of every listed condition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(rename = "if")]
    pub when: Vec<ConditionSpec>,

    /// `[variable, term]`
    pub then: (String, String),
}

/// An antecedent condition: a `[variable, term]` pair, or a nested
/// `{ all = [...] }` / `{ any = [...] }` group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionSpec {
    Is((String, String)),
    All { all: Vec<ConditionSpec> },
    Any { any: Vec<ConditionSpec> },
}

impl ConditionSpec {
    pub fn is(variable: impl Into<String>, term: impl Into<String>) -> Self {
        ConditionSpec::Is((variable.into(), term.into()))
    }
}

impl SystemDescription {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Validates the description and builds an engine from it.
    pub fn build(&self) -> std::result::Result<InferenceEngine, ConfigError> {
        let mut vars = Variables::new();

        for spec in &self.variables {
            let terms = Terms::from(spec.terms.clone());

            vars.add(FuzzyVariable::new(&spec.name, spec.role, spec.min..=spec.max, terms, spec.step)?)?;
        }

        let rules = self
            .rules
            .iter()
            .enumerate()
            .map(|(i, rule)| rule.to_rule(i, &vars))
            .collect::<std::result::Result<Rules, _>>()?;

        InferenceEngine::with_ops(vars, rules, self.operators)
    }
}

impl FromStr for SystemDescription {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_toml_str(s)
    }
}

impl RuleSpec {
    fn to_rule(&self, index: usize, vars: &Variables) -> std::result::Result<Rule, ConfigError> {
        let premise = match self.when.as_slice() {
            [] => return Err(ConfigError::EmptyAntecedent(index)),
            [single] => single.to_expr(index, vars)?,
            conditions => Expr::And(
                conditions
                    .iter()
                    .map(|c| c.to_expr(index, vars))
                    .collect::<std::result::Result<_, _>>()?,
            ),
        };
        let (variable, term) = &self.then;

        Ok(Rule::new(premise, proposition(index, vars, variable, term)?))
    }
}

impl ConditionSpec {
    fn to_expr(&self, index: usize, vars: &Variables) -> std::result::Result<Expr, ConfigError> {
        let group = |conditions: &[ConditionSpec]| {
            conditions
                .iter()
                .map(|c| c.to_expr(index, vars))
                .collect::<std::result::Result<Vec<_>, _>>()
        };

        Ok(match self {
            ConditionSpec::Is((variable, term)) => Expr::Is(proposition(index, vars, variable, term)?),
            ConditionSpec::All { all } => Expr::And(group(all)?),
            ConditionSpec::Any { any } => Expr::Or(group(any)?),
        })
    }
}

fn proposition(
    index: usize,
    vars: &Variables,
    variable: &str,
    term: &str,
) -> std::result::Result<Proposition, ConfigError> {
    let handle = vars
        .handle(variable)
        .ok_or_else(|| ConfigError::UnknownVariableReference {
            rule: index,
            variable: variable.to_owned(),
        })?;

    Ok(handle.is(term))
}

impl InferenceEngine {
    /// An equivalent description of this engine. Building it again yields an
    /// engine with identical behavior.
    pub fn description(&self) -> SystemDescription {
        let vars = self.variables();

        let variables = vars
            .iter()
            .map(|(_, var)| VariableSpec {
                name: var.name().to_owned(),
                role: var.role(),
                min: *var.domain().start(),
                max: *var.domain().end(),
                step: Some(var.step()),
                terms: var.terms().cloned().collect(),
            })
            .collect();

        let rules = self
            .rules()
            .iter()
            .map(|rule| {
                let when = match rule.premise() {
                    Expr::And(exprs) => exprs.iter().map(|e| condition(e, vars)).collect(),
                    expr => vec![condition(expr, vars)],
                };
                let consequence = rule.consequence();

                RuleSpec {
                    when,
                    then: (variable_name(consequence, vars), consequence.term().to_owned()),
                }
            })
            .collect();

        SystemDescription {
            operators: self.operators(),
            variables,
            rules,
        }
    }
}

fn condition(expr: &Expr, vars: &Variables) -> ConditionSpec {
    match expr {
        Expr::Is(prop) => ConditionSpec::Is((variable_name(prop, vars), prop.term().to_owned())),
        Expr::And(exprs) => ConditionSpec::All {
            all: exprs.iter().map(|e| condition(e, vars)).collect(),
        },
        Expr::Or(exprs) => ConditionSpec::Any {
            any: exprs.iter().map(|e| condition(e, vars)).collect(),
        },
    }
}

// Rules were resolved against these variables when the engine was built
fn variable_name(prop: &Proposition, vars: &Variables) -> String {
    vars.slot(prop.variable())
        .map(|var| var.name().to_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::{Error, EvalError};
    use crate::inputs::Inputs;
    use crate::membership::{MembershipFn, Shape};
    use crate::ops::{DefuzzificationOp, ImplicationOp};

    const TOY: &str = r#"
        [[variables]]
        name = "x"
        role = "input"
        min = 0.0
        max = 10.0

        [[variables.terms]]
        name = "low"
        shape = "triangular"
        params = [0.0, 0.0, 10.0]

        [[variables.terms]]
        name = "high"
        shape = "triangular"
        params = [0.0, 10.0, 10.0]

        [[variables]]
        name = "y"
        role = "output"
        min = 0.0
        max = 10.0
        step = 0.05

        [[variables.terms]]
        name = "small"
        shape = "triangular"
        params = [0.0, 0.0, 10.0]

        [[variables.terms]]
        name = "large"
        shape = "points"
        params = [[0.0, 0.0], [10.0, 1.0]]

        [[rules]]
        if = [["x", "low"]]
        then = ["y", "small"]

        [[rules]]
        if = [["x", "high"]]
        then = ["y", "large"]
    "#;

    #[test]
    fn test_parse_toml() {
        let desc = SystemDescription::from_toml_str(TOY).unwrap();

        assert_eq!(desc.operators, Operators::default());
        assert_eq!(desc.variables.len(), 2);
        assert_eq!(desc.variables[0].step, None);
        assert_eq!(desc.variables[1].step, Some(0.05));
        assert_eq!(
            desc.variables[1].terms[1].membership().shape(),
            &Shape::Points(vec![(0., 0.), (10., 1.)])
        );
        assert_eq!(desc.rules[1].when, vec![ConditionSpec::is("x", "high")]);
        assert_eq!(desc.rules[1].then, ("y".to_owned(), "large".to_owned()));

        let engine = desc.build().unwrap();
        let outputs = engine.evaluate(&Inputs::from([("x", 10.)])).unwrap();

        assert_relative_eq!(outputs.get("y").unwrap(), 20. / 3., epsilon = 1e-9);
    }

    #[test]
    fn test_nested_conditions_and_operators() {
        let toml = r#"
            [operators]
            imp_op = "prod"
            defuzz_op = "mom"

            [[variables]]
            name = "a"
            role = "input"
            min = 0.0
            max = 1.0
            terms = [
                { name = "no", shape = "trapezoidal", params = [0.0, 0.0, 0.2, 0.6] },
                { name = "yes", shape = "sigmoid", params = [0.5, 12.0] },
            ]

            [[variables]]
            name = "b"
            role = "input"
            min = 0.0
            max = 1.0
            terms = [
                { name = "no", shape = "gaussian", params = [0.0, 0.3] },
                { name = "yes", shape = "gaussian", params = [1.0, 0.3] },
            ]

            [[variables]]
            name = "out"
            role = "output"
            min = 0.0
            max = 1.0
            step = 0.01
            terms = [
                { name = "off", shape = "triangular", params = [0.0, 0.0, 1.0] },
                { name = "on", shape = "triangular", params = [0.0, 1.0, 1.0] },
            ]

            [[rules]]
            if = [["a", "yes"], { any = [["b", "yes"], ["b", "no"]] }]
            then = ["out", "on"]

            [[rules]]
            if = [{ all = [["a", "no"], ["b", "no"]] }]
            then = ["out", "off"]
        "#;

        let desc: SystemDescription = toml.parse().unwrap();

        assert_eq!(desc.operators.imp_op, ImplicationOp::Prod);
        assert_eq!(desc.operators.defuzz_op, DefuzzificationOp::Mom);
        assert!(matches!(&desc.rules[0].when[1], ConditionSpec::Any { any } if any.len() == 2));

        let engine = desc.build().unwrap();
        let outputs = engine.evaluate(&Inputs::from([("a", 1.), ("b", 0.5)])).unwrap();

        // Only "on" fires; its scaled peak sits at the top of the domain
        assert_relative_eq!(outputs.get("out").unwrap(), 1., epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_descriptions() {
        let err = SystemDescription::from_toml_str(&TOY.replace("[0.0, 10.0, 10.0]", "[10.0, 0.0, 10.0]")).unwrap_err();
        assert!(matches!(err, Error::Toml(_)));

        let desc = SystemDescription::from_toml_str(&TOY.replace(r#"["x", "high"]"#, r#"["z", "high"]"#)).unwrap();
        assert_eq!(
            desc.build().unwrap_err(),
            ConfigError::UnknownVariableReference {
                rule: 1,
                variable: "z".into()
            }
        );

        let desc = SystemDescription::from_toml_str(&TOY.replace(r#"["y", "small"]"#, r#"["y", "tiny"]"#)).unwrap();
        assert!(matches!(desc.build().unwrap_err(), ConfigError::UnknownTermReference { rule: 0, .. }));

        let desc = SystemDescription::from_toml_str(&TOY.replace(r#"if = [["x", "low"]]"#, "if = []")).unwrap();
        assert_eq!(desc.build().unwrap_err(), ConfigError::EmptyAntecedent(0));

        let desc = SystemDescription::from_toml_str(&TOY.replace(r#"name = "y""#, r#"name = "x""#)).unwrap();
        assert_eq!(desc.build().unwrap_err(), ConfigError::DuplicateVariable("x".into()));
    }

    #[test]
    fn test_description_round_trip() {
        let engine = SystemDescription::from_toml_str(TOY).unwrap().build().unwrap();
        let desc = engine.description();

        assert_eq!(desc.variables[0].step, Some(0.1));
        assert_eq!(desc.rules.len(), 2);

        let toml = desc.to_toml_string().unwrap();
        let rebuilt = SystemDescription::from_toml_str(&toml).unwrap().build().unwrap();

        assert_eq!(rebuilt.description(), desc);

        for x in [0., 2.5, 5., 7.5, 10.] {
            let inputs = Inputs::from([("x", x)]);

            assert_eq!(engine.evaluate(&inputs), rebuilt.evaluate(&inputs));
        }

        assert_eq!(
            rebuilt.evaluate(&Inputs::from([("x", 11.)])),
            Err(EvalError::EmptyOutput("y".into()))
        );
    }

    #[test]
    fn test_description_of_built_engine() {
        let mut vars = Variables::new();
        let terms = || {
            Terms::new()
                .with("no", MembershipFn::triangular(0., 0., 1.).unwrap())
                .with("yes", MembershipFn::triangular(0., 1., 1.).unwrap())
        };
        let a = vars.add_input("a", 0. ..=1., terms(), None).unwrap();
        let b = vars.add_input("b", 0. ..=1., terms(), None).unwrap();
        let out = vars.add_output("out", 0. ..=1., terms(), None).unwrap();
        let mut rules = Rules::new();

        rules.add(a.is("yes").or(b.is("yes")), out.is("yes"));
        rules.add(a.is("no").and(b.is("no")), out.is("no"));

        let desc = InferenceEngine::new(vars, rules).unwrap().description();

        assert_eq!(
            desc.rules[0].when,
            vec![ConditionSpec::Any {
                any: vec![ConditionSpec::is("a", "yes"), ConditionSpec::is("b", "yes")]
            }]
        );
        assert_eq!(
            desc.rules[1].when,
            vec![ConditionSpec::is("a", "no"), ConditionSpec::is("b", "no")]
        );
    }
}
