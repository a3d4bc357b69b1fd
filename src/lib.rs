//! A general Mamdani fuzzy inference engine.
//!
//! Systems are described as input and output variables over bounded numeric
//! domains, each with named membership-function terms, plus a set of
//! `IF ... THEN variable IS term` rules. An [`InferenceEngine`] maps crisp input
//! values to crisp output values.
//!
//! ```
//! use fuzzy_infer::{InferenceEngine, Inputs, MembershipFn, Rules, Terms, Variables};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut vars = Variables::new();
//! let levels = || -> Result<Terms, fuzzy_infer::ConfigError> {
//!     Ok(Terms::new()
//!         .with("low", MembershipFn::triangular(0., 0., 10.)?)
//!         .with("high", MembershipFn::triangular(0., 10., 10.)?))
//! };
//! let x = vars.add_input("x", 0. ..=10., levels()?, None)?;
//! let y = vars.add_output("y", 0. ..=10., levels()?, None)?;
//!
//! let mut rules = Rules::new();
//! rules.add(x.is("low"), y.is("low"));
//! rules.add(x.is("high"), y.is("high"));
//!
//! let engine = InferenceEngine::new(vars, rules)?;
//! let outputs = engine.evaluate(&Inputs::from([("x", 10.)]))?;
//!
//! assert!((outputs.get("y").unwrap_or_default() - 20. / 3.).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```

mod cascade;
mod classify;
mod description;
mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod ops;
mod outputs;
mod rules;
mod terms;
mod variable;

pub use cascade::Cascade;
pub use classify::Bands;
pub use description::{ConditionSpec, RuleSpec, SystemDescription, VariableSpec};
pub use dsl::{Expr, Proposition};
pub use error::{ConfigError, Error, EvalError, Result};
pub use inference::InferenceEngine;
pub use inputs::Inputs;
pub use linspace::Linspace;
pub use membership::{MembershipFn, Shape};
pub use ops::{centroid, AndOp, DefuzzificationOp, ImplicationOp, Operators, OrOp};
pub use outputs::{Aggregate, Outputs};
pub use rules::{Rule, Rules};
pub use terms::{Term, Terms};
pub use variable::{FuzzyVariable, Role, Variable, VariableKey, Variables, DEFAULT_STEP, MAX_SAMPLES};
