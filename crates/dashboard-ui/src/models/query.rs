//! User directory search query

/// A search term as typed, plus its trimmed, case-folded form used for matching
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    raw: String,
    folded: String,
}

impl SearchQuery {
    pub fn new(input: impl Into<String>) -> Self {
        let raw = input.into();
        let folded = raw.trim().to_lowercase();
        Self { raw, folded }
    }

    /// The input exactly as typed
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Trimmed, lowercased form
    #[must_use]
    pub fn folded(&self) -> &str {
        &self.folded
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// Case-insensitive substring test; the empty query matches everything
    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        self.folded.is_empty() || haystack.to_lowercase().contains(&self.folded)
    }
}
