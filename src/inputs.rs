use std::collections::{BTreeMap, HashMap};

/// Crisp input values keyed by variable name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs(pub(crate) BTreeMap<String, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(BTreeMap::new())
    }

    pub fn add(&mut self, var: impl Into<String>, val: f64) {
        self.0.insert(var.into(), val);
    }

    pub fn with(mut self, var: impl Into<String>, val: f64) -> Self {
        self.add(var, val);
        self
    }

    pub fn get(&self, var: &str) -> Option<f64> {
        self.0.get(var).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, val)| (name.as_str(), *val))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Inputs(iter.into_iter().map(|(name, val)| (name.into(), val)).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[(S, f64); N]> for Inputs {
    fn from(pairs: [(S, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<HashMap<String, f64>> for Inputs {
    fn from(map: HashMap<String, f64>) -> Self {
        Inputs(map.into_iter().collect())
    }
}

impl From<BTreeMap<String, f64>> for Inputs {
    fn from(map: BTreeMap<String, f64>) -> Self {
        Inputs(map)
    }
}
