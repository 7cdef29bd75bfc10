//! Search criteria and the per-user progress report.

use serde::{Deserialize, Serialize};

/// Language and location filters for a developer search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Primary language qualifier (e.g. "rust")
    pub language: String,

    /// Location qualifier (e.g. "seoul")
    pub location: String,
}

impl SearchCriteria {
    /// Create new search criteria
    pub fn new(language: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            location: location.into(),
        }
    }

    /// Set the language qualifier
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the location qualifier
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Build the user-search query string.
    ///
    /// Blank filters are left out; returns `None` when both are blank. The
    /// qualifiers are space separated, which the form encoder sends as `+`.
    pub fn query(&self) -> Option<String> {
        let qualifiers: Vec<String> = [("language", &self.language), ("location", &self.location)]
            .into_iter()
            .filter_map(|(key, value)| {
                let value = value.trim();
                (!value.is_empty()).then(|| format!("{}:{}", key, value))
            })
            .collect();

        if qualifiers.is_empty() {
            None
        } else {
            Some(qualifiers.join(" "))
        }
    }
}

/// Progress notification emitted after each search result is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchProgress<'a> {
    /// Zero-based position of the user in the search result
    pub index: usize,

    /// Number of search items that carry a login
    pub total: usize,

    /// Login of the user just processed
    pub username: &'a str,

    /// Whether a contact email was found
    pub found: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_with_both_filters() {
        let criteria = SearchCriteria::new("rust", "seoul");
        assert_eq!(criteria.query().unwrap(), "language:rust location:seoul");
    }

    #[test]
    fn test_query_trims_and_skips_blank_filters() {
        let criteria = SearchCriteria::new("  go ", "");
        assert_eq!(criteria.query().unwrap(), "language:go");

        let criteria = SearchCriteria::default().location("Berlin");
        assert_eq!(criteria.query().unwrap(), "location:Berlin");
    }

    #[test]
    fn test_query_empty_criteria() {
        assert!(SearchCriteria::new(" ", "\t").query().is_none());
        assert!(SearchCriteria::default().query().is_none());
    }
}
