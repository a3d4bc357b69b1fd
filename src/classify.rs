//! Mapping crisp outputs to discrete labels.

/// Ordered, upper-inclusive thresholds with a label for everything above the
/// last one.
///
/// ```
/// use fuzzy_infer::Bands;
///
/// let bands = Bands::new("aggressive").band(40., "conservative").band(65., "moderate");
///
/// assert_eq!(bands.classify(40.), "conservative");
/// assert_eq!(bands.classify(65.1), "aggressive");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Bands {
    bands: Vec<(f64, String)>,
    otherwise: String,
}

impl Bands {
    pub fn new(otherwise: impl Into<String>) -> Self {
        Bands {
            bands: Vec::new(),
            otherwise: otherwise.into(),
        }
    }

    /// Adds a band for values up to and including `upper`. Bands are checked
    /// in the order they were added.
    pub fn band(mut self, upper: f64, label: impl Into<String>) -> Self {
        self.bands.push((upper, label.into()));
        self
    }

    pub fn classify(&self, value: f64) -> &str {
        self.bands
            .iter()
            .find(|(upper, _)| value <= *upper)
            .map_or(&self.otherwise, |(_, label)| label)
    }

    /// Every label, lowest band first
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bands
            .iter()
            .map(|(_, label)| label.as_str())
            .chain(std::iter::once(self.otherwise.as_str()))
    }
}
