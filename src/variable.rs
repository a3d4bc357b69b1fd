use std::collections::HashMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::error::ConfigError;
use crate::linspace::Linspace;
use crate::terms::{Term, Terms};

/// Sampling step used when a variable doesn't specify one
pub const DEFAULT_STEP: f64 = 0.1;

/// Most samples a variable's universe may hold. Finer steps are rejected with
/// [`ConfigError::InvalidResolution`] rather than coarsened.
pub const MAX_SAMPLES: usize = 1_000_000;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// A cheap handle to a variable stored in [`Variables`], used to build rules.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Variable(pub(crate) VariableKey);

impl Variable {
    pub fn key(self) -> VariableKey {
        self.0
    }
}

/// Whether a variable appears in rule antecedents or consequents.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Input,
    Output,
}

impl Role {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Role::Input => "input",
            Role::Output => "output",
        }
    }
}

/// A named numeric universe with its linguistic terms.
///
/// The sampled universe is only used to aggregate and defuzzify outputs; rule
/// firing evaluates membership functions at the crisp input directly.
#[derive(Clone, Debug)]
pub struct FuzzyVariable {
    name: String,
    role: Role,
    min_u: f64,
    max_u: f64,
    step: f64,
    universe: Vec<f64>,
    terms: Terms,
}

impl FuzzyVariable {
    pub fn new(
        name: impl Into<String>,
        role: Role,
        universe_range: RangeInclusive<f64>,
        terms: Terms,
        step: Option<f64>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let min_u = *universe_range.start();
        let max_u = *universe_range.end();
        let step = step.unwrap_or(DEFAULT_STEP);

        if !(min_u.is_finite() && max_u.is_finite() && min_u < max_u) {
            return Err(ConfigError::InvalidDomain {
                variable: name,
                min: min_u,
                max: max_u,
            });
        }

        let samples = Some(step)
            .filter(|step| step.is_finite() && *step > 0.)
            .and_then(|step| Linspace::step_count(min_u, max_u, step))
            .filter(|n| *n <= MAX_SAMPLES);
        let Some(samples) = samples else {
            return Err(ConfigError::InvalidResolution { variable: name, step });
        };

        if terms.is_empty() {
            return Err(ConfigError::EmptyTerms(name));
        }

        for (i, term) in terms.0.iter().enumerate() {
            if terms.0[..i].iter().any(|t| t.name() == term.name()) {
                return Err(ConfigError::DuplicateTerm {
                    variable: name,
                    term: term.name().to_owned(),
                });
            }
        }

        Ok(Self {
            universe: Linspace::new(min_u, max_u, samples).collect(),
            name,
            role,
            min_u,
            max_u,
            step,
            terms,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn domain(&self) -> RangeInclusive<f64> {
        self.min_u..=self.max_u
    }

    /// The requested sampling step. When it doesn't divide the domain evenly
    /// the samples are spread out a little further, see [`spacing`](Self::spacing).
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Actual distance between neighbouring samples of the universe
    pub fn spacing(&self) -> f64 {
        (self.max_u - self.min_u) / (self.universe.len() - 1) as f64
    }

    /// Sample points across the domain at the configured resolution
    pub fn universe(&self) -> &[f64] {
        &self.universe
    }

    pub fn terms(&self) -> impl ExactSizeIterator<Item = &Term> {
        self.terms.0.iter()
    }

    pub fn term(&self, name: &str) -> Option<&Term> {
        self.terms.0.iter().find(|t| t.name() == name)
    }

    pub(crate) fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.0.iter().position(|t| t.name() == name)
    }

    pub(crate) fn term_at(&self, index: usize) -> &Term {
        &self.terms.0[index]
    }

    /// Degree of every term at `value`. Values outside the domain are not
    /// clamped.
    pub fn fuzzify(&self, value: f64) -> HashMap<&str, f64> {
        self.terms
            .0
            .iter()
            .map(|t| (t.name(), t.membership().degree(value)))
            .collect()
    }

    /// The term with the highest degree at `value`; ties go to the term
    /// declared first.
    pub fn dominant_term(&self, value: f64) -> Option<(&str, f64)> {
        self.terms
            .0
            .iter()
            .map(|t| (t.name(), t.membership().degree(value)))
            .fold(None, |best, (name, degree)| match best {
                Some((_, best_degree)) if best_degree >= degree => best,
                _ => Some((name, degree)),
            })
    }

    /// A term's membership function sampled over the universe.
    pub fn term_curve(&self, term: &str) -> Option<Vec<(f64, f64)>> {
        let membership = self.term(term)?.membership();

        Some(self.universe.iter().map(|&x| (x, membership.degree(x))).collect())
    }
}

/// The variables owned by one engine, addressable by key or by name.
#[derive(Clone, Debug, Default)]
pub struct Variables {
    slots: SlotMap<VariableKey, FuzzyVariable>,
    by_name: HashMap<String, VariableKey>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, variable: FuzzyVariable) -> Result<Variable, ConfigError> {
        if self.by_name.contains_key(variable.name()) {
            return Err(ConfigError::DuplicateVariable(variable.name().to_owned()));
        }

        let name = variable.name().to_owned();
        let key = self.slots.insert(variable);

        self.by_name.insert(name, key);

        Ok(Variable(key))
    }

    /// If the step value is not provided, it defaults to 0.1
    pub fn add_input(
        &mut self,
        name: impl Into<String>,
        universe_range: RangeInclusive<f64>,
        terms: Terms,
        step: Option<f64>,
    ) -> Result<Variable, ConfigError> {
        self.add(FuzzyVariable::new(name, Role::Input, universe_range, terms, step)?)
    }

    /// If the step value is not provided, it defaults to 0.1
    pub fn add_output(
        &mut self,
        name: impl Into<String>,
        universe_range: RangeInclusive<f64>,
        terms: Terms,
        step: Option<f64>,
    ) -> Result<Variable, ConfigError> {
        self.add(FuzzyVariable::new(name, Role::Output, universe_range, terms, step)?)
    }

    pub fn get(&self, var: Variable) -> Option<&FuzzyVariable> {
        self.slots.get(var.0)
    }

    pub fn handle(&self, name: &str) -> Option<Variable> {
        self.by_name.get(name).copied().map(Variable)
    }

    pub fn by_name(&self, name: &str) -> Option<&FuzzyVariable> {
        self.by_name.get(name).map(|key| &self.slots[*key])
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Variables in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Variable, &FuzzyVariable)> {
        self.slots.iter().map(|(key, var)| (Variable(key), var))
    }

    pub fn with_role(&self, role: Role) -> impl Iterator<Item = (Variable, &FuzzyVariable)> {
        self.iter().filter(move |(_, var)| var.role() == role)
    }

    pub(crate) fn slot(&self, key: VariableKey) -> Option<&FuzzyVariable> {
        self.slots.get(key)
    }
}
