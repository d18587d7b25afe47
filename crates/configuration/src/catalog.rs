use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashSet;

/// A crime category as submitted by clients, and how it is stored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CrimeCategory {
    /// The name clients send in `crimecodedesc`.
    pub label: String,
    /// The name written to the `crimes` table.
    pub code: String,
    /// Weighting factor stored with every record of this category.
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct CategoryCatalog(Vec<CrimeCategory>);

impl CategoryCatalog {
    pub fn resolve(&self, label: &str) -> Option<&CrimeCategory> {
        self.0.iter().find(|c| c.label == label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for c in &self.0 {
            if !seen.insert(c.label.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate crime category label '{}'",
                    c.label
                )));
            }
            if !(c.weight.is_finite() && c.weight > 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "category '{}' has invalid weight {}",
                    c.label, c.weight
                )));
            }
        }
        Ok(())
    }
}
