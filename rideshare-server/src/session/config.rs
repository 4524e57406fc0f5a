//! Timing and lookup parameters shared by the interactive sessions.

use std::time::Duration;

use crate::domain::Coordinates;

/// Configuration parameters for suggestion and map sessions.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Quiet period after the last keystroke before a lookup is issued.
    pub debounce: Duration,

    /// How long the suggestion panel stays open after blur, so a click on a
    /// candidate can still land.
    pub blur_grace: Duration,

    /// Maximum number of candidates requested per lookup.
    pub result_limit: usize,

    /// `accept-language` hint passed to the provider.
    pub language: String,

    /// Country filter passed to the provider; empty means worldwide.
    pub country: String,

    /// Where the map starts when no initial location is given.
    pub default_anchor: Coordinates,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_blur_grace(mut self, grace: Duration) -> Self {
        self.blur_grace = grace;
        self
    }

    pub fn with_result_limit(mut self, limit: usize) -> Self {
        self.result_limit = limit;
        self
    }

    /// Set the language and country hints.
    pub fn with_locale(mut self, language: impl Into<String>, country: impl Into<String>) -> Self {
        self.language = language.into();
        self.country = country.into();
        self
    }

    pub fn with_default_anchor(mut self, anchor: Coordinates) -> Self {
        self.default_anchor = anchor;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(400),
            blur_grace: Duration::from_millis(200),
            result_limit: 5,
            language: "pt-BR".to_string(),
            country: "br".to_string(),
            default_anchor: Coordinates::BRAZIL_CENTRE,
        }
    }
}
