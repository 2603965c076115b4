//! CompletionSuggestion - autocomplete entry for a partial query

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ranked place-name suggestion produced by the autocomplete feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSuggestion {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
}

impl CompletionSuggestion {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }

    /// Full-search query for this suggestion: `"{title}, {subtitle}"`
    pub fn query(&self) -> String {
        format!("{}, {}", self.title, self.subtitle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_joins_title_and_subtitle() {
        let suggestion = CompletionSuggestion::new("Blue Bottle Coffee", "Mint Plaza, San Francisco");
        assert_eq!(
            suggestion.query(),
            "Blue Bottle Coffee, Mint Plaza, San Francisco"
        );
    }

    #[test]
    fn test_query_keeps_separator_without_subtitle() {
        let suggestion = CompletionSuggestion::new("Tokyo Tower", "");
        assert_eq!(suggestion.query(), "Tokyo Tower, ");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = CompletionSuggestion::new("A", "B");
        let b = CompletionSuggestion::new("A", "B");
        assert_ne!(a.id, b.id);
    }
}
