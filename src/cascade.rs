use std::collections::{BTreeMap, HashSet};

use tracing::{debug, trace};

use crate::error::{ConfigError, EvalError};
use crate::inference::InferenceEngine;
use crate::inputs::Inputs;
use crate::outputs::Outputs;

/// Engines run in sequence, where later stages may read the crisp outputs of
/// earlier ones as inputs.
///
/// Every stage only receives the values it declares as inputs, taken from the
/// caller's inputs and the outputs produced so far.
#[derive(Clone, Debug, Default)]
pub struct Cascade {
    stages: Vec<InferenceEngine>,
    accepted: HashSet<String>,
}

impl Cascade {
    /// Chains `stages` in order. An output name may only be produced once and
    /// never by a stage after one that already reads that name from the caller.
    pub fn new(stages: impl IntoIterator<Item = InferenceEngine>) -> Result<Self, ConfigError> {
        let stages: Vec<_> = stages.into_iter().collect();
        let mut produced = HashSet::new();
        let mut accepted = HashSet::new();

        for stage in &stages {
            for name in stage.input_names() {
                if !produced.contains(name) {
                    accepted.insert(name.to_owned());
                }
            }

            for name in stage.output_names() {
                if accepted.contains(name) || !produced.insert(name.to_owned()) {
                    return Err(ConfigError::DuplicateVariable(name.to_owned()));
                }
            }
        }

        debug!(stages = stages.len(), inputs = accepted.len(), "built cascade");

        Ok(Cascade { stages, accepted })
    }

    pub fn stages(&self) -> &[InferenceEngine] {
        &self.stages
    }

    /// Names the caller must supply, in no particular order
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.accepted.iter().map(String::as_str)
    }

    /// Evaluates every stage and returns the outputs of all of them.
    pub fn evaluate(&self, inputs: &Inputs) -> Result<Outputs, EvalError> {
        if let Some((name, _)) = inputs.iter().find(|(name, _)| !self.accepted.contains(*name)) {
            return Err(EvalError::UnknownVariable(name.to_owned()));
        }

        let mut pool: BTreeMap<String, f64> = inputs.0.clone();
        let mut outputs = Outputs::default();

        for (i, stage) in self.stages.iter().enumerate() {
            let stage_inputs: Inputs = stage
                .input_names()
                .filter_map(|name| pool.get(name).map(|val| (name, *val)))
                .collect();
            let stage_outputs = stage.evaluate(&stage_inputs)?;

            trace!(stage = i, outputs = ?stage_outputs.iter().collect::<Vec<_>>(), "evaluated stage");

            pool.extend(stage_outputs.iter().map(|(name, val)| (name.to_owned(), val)));
            outputs.extend(stage_outputs);
        }

        Ok(outputs)
    }
}
