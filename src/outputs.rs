use std::collections::BTreeMap;

/// The fuzzy result of one output variable before defuzzification.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate {
    pub(crate) activations: Vec<(String, f64)>,
    pub(crate) curve: Vec<(f64, f64)>,
}

impl Aggregate {
    /// Activation level of every term, in declaration order
    pub fn activations(&self) -> &[(String, f64)] {
        &self.activations
    }

    pub fn activation(&self, term: &str) -> Option<f64> {
        self.activations.iter().find(|(name, _)| name == term).map(|(_, level)| *level)
    }

    /// The aggregated membership curve sampled over the variable's universe
    pub fn curve(&self) -> &[(f64, f64)] {
        &self.curve
    }
}

/// Crisp values for every output variable of one evaluation, plus the
/// aggregated sets they were defuzzified from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outputs {
    defuzzificated_inferred_memberships: BTreeMap<String, f64>,
    aggregates: BTreeMap<String, Aggregate>,
}

impl Outputs {
    pub(crate) fn insert(&mut self, var: String, crisp: f64, aggregate: Aggregate) {
        self.defuzzificated_inferred_memberships.insert(var.clone(), crisp);
        self.aggregates.insert(var, aggregate);
    }

    pub(crate) fn extend(&mut self, other: Outputs) {
        self.defuzzificated_inferred_memberships
            .extend(other.defuzzificated_inferred_memberships);
        self.aggregates.extend(other.aggregates);
    }

    pub fn get(&self, var: &str) -> Option<f64> {
        self.defuzzificated_inferred_memberships.get(var).copied()
    }

    pub fn aggregate(&self, var: &str) -> Option<&Aggregate> {
        self.aggregates.get(var)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.defuzzificated_inferred_memberships
            .iter()
            .map(|(name, val)| (name.as_str(), *val))
    }

    pub fn len(&self) -> usize {
        self.defuzzificated_inferred_memberships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defuzzificated_inferred_memberships.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, f64> {
        self.defuzzificated_inferred_memberships
    }
}
