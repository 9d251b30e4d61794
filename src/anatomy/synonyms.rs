/// Mesh-name fragments for each valve, keyed by lowercase valve name.
pub const VALVE_SYNONYMS: &[(&str, &[&str])] = &[
    ("mitral", &["mitral", "mv"]),
    ("aortic", &["aortic", "av"]),
    ("tricuspid", &["tricuspid", "tv"]),
    ("pulmonary", &["pulmonary", "pv"]),
    ("pulmonic", &["pulmonary", "pulmonic", "pv"]),
];

/// Mesh-name fragments for each coronary artery, keyed by uppercase
/// abbreviation.
pub const ARTERY_SYNONYMS: &[(&str, &[&str])] = &[
    ("LAD", &["lad", "left anterior descending"]),
    ("LCX", &["lcx", "left circumflex"]),
    ("RCA", &["rca", "right coronary"]),
];

/// Case-insensitive substring matcher over mesh names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSelector {
    terms: Vec<String>,
}

impl NameSelector {
    /// Creates a selector from raw terms (lowercased on construction).
    #[must_use]
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Selector for a valve name, expanded through [`VALVE_SYNONYMS`].
    #[must_use]
    pub fn valve(name: &str) -> Self {
        let key = name.to_lowercase();
        lookup(VALVE_SYNONYMS, &key).map_or_else(|| Self::new([key.as_str()]), Self::new)
    }

    /// Selector for a coronary artery name, expanded through
    /// [`ARTERY_SYNONYMS`].
    #[must_use]
    pub fn artery(name: &str) -> Self {
        lookup(ARTERY_SYNONYMS, &name.to_uppercase())
            .map_or_else(|| Self::new([name]), Self::new)
    }

    /// Returns the lowercase search terms.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Whether a mesh name contains any of the terms.
    #[must_use]
    pub fn matches(&self, mesh_name: &str) -> bool {
        let name = mesh_name.to_lowercase();
        self.terms.iter().any(|t| name.contains(t.as_str()))
    }
}

fn lookup(table: &[(&str, &'static [&'static str])], key: &str) -> Option<&'static [&'static str]> {
    table.iter().find(|(k, _)| *k == key).map(|(_, terms)| *terms)
}
