use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::error::{ConfigError, EvalError};
use crate::inputs::Inputs;
use crate::ops::Operators;
use crate::outputs::{Aggregate, Outputs};
use crate::rules::{ResolvedRule, Rules};
use crate::variable::{FuzzyVariable, Role, VariableKey, Variables};

/// A Mamdani inference engine.
///
/// The engine exclusively owns its variables and rules and never mutates them
/// after construction, so `evaluate` may be called concurrently from several
/// threads through a shared reference.
#[derive(Clone, Debug)]
pub struct InferenceEngine {
    vars: Variables,
    rules: Rules,
    resolved: Vec<ResolvedRule>,
    ops: Operators,
}

impl InferenceEngine {
    /// Builds an engine with the default min/max/centroid operators. See
    /// [`with_ops`](Self::with_ops).
    pub fn new(vars: Variables, rules: Rules) -> Result<Self, ConfigError> {
        Self::with_ops(vars, rules, Operators::default())
    }

    /// Builds an engine, checking every rule against `vars`. Any reference to
    /// a missing variable or term, or a variable used in the wrong role, fails
    /// the whole construction.
    ///
    /// Rules must be built from handles returned by this same `vars`. Handles
    /// from another [`Variables`] are not detected reliably.
    pub fn with_ops(vars: Variables, rules: Rules, ops: Operators) -> Result<Self, ConfigError> {
        let resolved = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| ResolvedRule::resolve(i, rule, &vars))
            .collect::<Result<Vec<_>, _>>()?;

        for (handle, var) in vars.with_role(Role::Output) {
            if !resolved.iter().any(|rule| rule.output == handle.key()) {
                warn!(variable = var.name(), "no rule concludes on output variable");
            }
        }

        debug!(
            variables = vars.len(),
            rules = resolved.len(),
            ?ops,
            "built inference engine"
        );

        Ok(Self {
            vars,
            rules,
            resolved,
            ops,
        })
    }

    pub fn variables(&self) -> &Variables {
        &self.vars
    }

    pub fn variable(&self, name: &str) -> Option<&FuzzyVariable> {
        self.vars.by_name(name)
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn operators(&self) -> Operators {
        self.ops
    }

    /// Names of the variables `evaluate` expects values for
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.vars.with_role(Role::Input).map(|(_, var)| var.name())
    }

    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.vars.with_role(Role::Output).map(|(_, var)| var.name())
    }

    /// Firing strength of one rule, or `None` if there is no rule at `index`.
    /// Only the inputs that rule reads need to be present.
    pub fn fire(&self, index: usize, inputs: &Inputs) -> Option<Result<f64, EvalError>> {
        let rule = self.resolved.get(index)?;

        Some(
            self.facts(inputs)
                .and_then(|facts| rule.fire(&self.vars, &facts, self.ops.and_op, self.ops.or_op)),
        )
    }

    /// Firing strength of every rule, in rule order.
    ///
    /// Unlike [`evaluate`](Self::evaluate), only the inputs the rules actually
    /// read need to be present.
    pub fn firing_strengths(&self, inputs: &Inputs) -> Result<Vec<f64>, EvalError> {
        let facts = self.facts(inputs)?;

        self.fire_all(&facts)
    }

    /// Runs one inference: fuzzify, fire every rule, aggregate per output
    /// variable and defuzzify. Either every output gets a crisp value or the
    /// call fails.
    pub fn evaluate(&self, inputs: &Inputs) -> Result<Outputs, EvalError> {
        for (_, var) in self.vars.with_role(Role::Input) {
            if inputs.get(var.name()).is_none() {
                return Err(EvalError::MissingInput(var.name().to_owned()));
            }
        }

        let facts = self.facts(inputs)?;
        let strengths = self.fire_all(&facts)?;
        let mut outputs = Outputs::default();

        for (handle, var) in self.vars.with_role(Role::Output) {
            let aggregate = self.aggregate(handle.key(), var, &strengths);
            let (universe, membership): (Vec<f64>, Vec<f64>) = aggregate.curve.iter().copied().unzip();
            let crisp = self
                .ops
                .defuzz_op
                .call(&universe, &membership)
                .ok_or_else(|| EvalError::EmptyOutput(var.name().to_owned()))?;

            trace!(variable = var.name(), crisp, activations = ?aggregate.activations, "defuzzified output");

            outputs.insert(var.name().to_owned(), crisp, aggregate);
        }

        Ok(outputs)
    }

    /// Validates the supplied keys and converts them to crisp facts.
    fn facts(&self, inputs: &Inputs) -> Result<HashMap<VariableKey, f64>, EvalError> {
        let mut facts = HashMap::with_capacity(inputs.len());

        for (name, value) in inputs.iter() {
            let handle = self
                .vars
                .handle(name)
                .filter(|handle| self.vars.get(*handle).map(FuzzyVariable::role) == Some(Role::Input))
                .ok_or_else(|| EvalError::UnknownVariable(name.to_owned()))?;

            if !value.is_finite() {
                return Err(EvalError::NonFiniteInput {
                    variable: name.to_owned(),
                    value,
                });
            }

            facts.insert(handle.key(), value);
        }

        Ok(facts)
    }

    fn fire_all(&self, facts: &HashMap<VariableKey, f64>) -> Result<Vec<f64>, EvalError> {
        let strengths = self
            .resolved
            .iter()
            .map(|rule| rule.fire(&self.vars, facts, self.ops.and_op, self.ops.or_op))
            .collect::<Result<Vec<_>, _>>()?;

        trace!(?strengths, "fired rules");

        Ok(strengths)
    }

    /// Activation level per term, then the union of every term implied by its
    /// level, sampled over the universe.
    fn aggregate(&self, key: VariableKey, var: &FuzzyVariable, strengths: &[f64]) -> Aggregate {
        let or_op = self.ops.or_op;
        let imp_op = self.ops.imp_op;
        let mut levels = vec![0.; var.terms().len()];

        for (rule, strength) in self.resolved.iter().zip(strengths) {
            if rule.output == key {
                levels[rule.term] = or_op.call(levels[rule.term], *strength);
            }
        }

        // A zero level contributes nothing under either implication
        let active: Vec<_> = levels
            .iter()
            .enumerate()
            .filter(|(_, level)| **level > 0.)
            .map(|(i, level)| (var.term_at(i).membership(), *level))
            .collect();

        let curve = var
            .universe()
            .iter()
            .map(|&x| {
                let degree = active
                    .iter()
                    .fold(0., |acc, (mf, level)| or_op.call(acc, imp_op.call(*level, mf.degree(x))));

                (x, degree)
            })
            .collect();

        let activations = var
            .terms()
            .zip(levels)
            .map(|(term, level)| (term.name().to_owned(), level))
            .collect();

        Aggregate { activations, curve }
    }
}
