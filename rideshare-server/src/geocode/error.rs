//! Geocoding error types.

use std::fmt;

/// Coarse classification of a [`ResolutionError`].
///
/// Sessions only care about which of these happened; the full error is
/// kept for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionErrorKind {
    /// Transport failure, non-2xx status or rate limiting.
    Network,
    /// The provider answered with a body we could not decode.
    Decode,
    /// Reverse lookup found no place at the coordinates.
    NoMatch,
}

impl fmt::Display for ResolutionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolutionErrorKind::Network => "network",
            ResolutionErrorKind::Decode => "decode",
            ResolutionErrorKind::NoMatch => "no_match",
        };
        f.write_str(s)
    }
}

/// Errors from resolving places through a geocoding provider.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// HTTP request failed (connection error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the provider
    #[error("rate limited by geocoding provider")]
    RateLimited,

    /// Response body could not be decoded
    #[error("{}", json_message(.message, .body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Reverse lookup returned no place
    #[error("no place found at the given coordinates")]
    NoMatch,
}

fn json_message(message: &str, body: &Option<String>) -> String {
    match body {
        Some(body) => format!("JSON parse error: {message} (body: {body})"),
        None => format!("JSON parse error: {message}"),
    }
}

impl ResolutionError {
    /// Classify this error.
    pub fn kind(&self) -> ResolutionErrorKind {
        match self {
            ResolutionError::Http(e) if e.is_decode() => ResolutionErrorKind::Decode,
            ResolutionError::Http(_)
            | ResolutionError::Api { .. }
            | ResolutionError::RateLimited => ResolutionErrorKind::Network,
            ResolutionError::Json { .. } => ResolutionErrorKind::Decode,
            ResolutionError::NoMatch => ResolutionErrorKind::NoMatch,
        }
    }

    /// Build a decode error, keeping a prefix of the offending body.
    pub(crate) fn decode(message: impl fmt::Display, body: &str) -> Self {
        ResolutionError::Json {
            message: message.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}
