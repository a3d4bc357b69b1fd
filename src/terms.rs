use serde::{Deserialize, Serialize};

use crate::membership::MembershipFn;

/// A named linguistic value of a variable, backed by one membership function.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Term {
    name: String,
    #[serde(flatten)]
    membership: MembershipFn,
}

impl Term {
    pub fn new(name: impl Into<String>, membership: MembershipFn) -> Self {
        Term {
            name: name.into(),
            membership,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn membership(&self) -> &MembershipFn {
        &self.membership
    }
}

/// Terms in declaration order. Names are checked for uniqueness when the
/// owning variable is built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Terms(pub(crate) Vec<Term>);

impl Terms {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, membership: MembershipFn) {
        self.0.push(Term::new(name, membership));
    }

    pub fn with(mut self, name: impl Into<String>, membership: MembershipFn) -> Self {
        self.insert(name, membership);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, MembershipFn)> for Terms {
    fn from_iter<It: IntoIterator<Item = (S, MembershipFn)>>(iter: It) -> Self {
        Terms(iter.into_iter().map(|(name, mf)| Term::new(name, mf)).collect())
    }
}

impl From<Vec<Term>> for Terms {
    fn from(terms: Vec<Term>) -> Self {
        Terms(terms)
    }
}
