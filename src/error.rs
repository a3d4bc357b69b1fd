//! Error types for engine construction and evaluation.

use thiserror::Error;

/// Result type alias for fallible crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building an engine. A configuration error always aborts
/// construction, so no partially-valid engine is ever observable.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Membership function parameters violate the shape's ordering
    #[error("invalid {shape} shape: {reason}")]
    InvalidShape { shape: &'static str, reason: String },

    #[error("term '{term}' is defined twice on variable '{variable}'")]
    DuplicateTerm { variable: String, term: String },

    #[error("variable '{0}' is defined twice")]
    DuplicateVariable(String),

    /// A rule names a term its variable doesn't define
    #[error("rule {rule} references unknown term '{term}' on variable '{variable}'")]
    UnknownTermReference { rule: usize, variable: String, term: String },

    /// A rule names a variable the engine doesn't own
    #[error("rule {rule} references unknown variable '{variable}'")]
    UnknownVariableReference { rule: usize, variable: String },

    #[error("rule {rule} uses {role} variable '{variable}' as {position}")]
    RoleMismatch {
        rule: usize,
        variable: String,
        role: &'static str,
        position: &'static str,
    },

    #[error("rule {0} has an empty antecedent")]
    EmptyAntecedent(usize),

    #[error("variable '{variable}' has an invalid domain [{min}, {max}]")]
    InvalidDomain { variable: String, min: f64, max: f64 },

    #[error("variable '{variable}' has an invalid resolution {step}")]
    InvalidResolution { variable: String, step: f64 },

    #[error("variable '{0}' defines no terms")]
    EmptyTerms(String),
}

impl ConfigError {
    pub(crate) fn invalid_shape(shape: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidShape {
            shape,
            reason: reason.into(),
        }
    }
}

/// Errors raised by a single `evaluate` call. They never leave the engine in a
/// different state than before the call.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("missing input for variable '{0}'")]
    MissingInput(String),

    /// The caller supplied a key that isn't an input variable
    #[error("unknown input variable '{0}'")]
    UnknownVariable(String),

    #[error("input '{variable}' is not a finite number: {value}")]
    NonFiniteInput { variable: String, value: f64 },

    /// No rule produced any activation for this output variable
    #[error("no rule activated output variable '{0}'")]
    EmptyOutput(String),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}
