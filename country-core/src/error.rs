use thiserror::Error;

/// Failures a user-initiated lookup can surface.
///
/// Weather enrichment never produces one of these: a failed weather lookup
/// shows up as [`CountryDetail::weather`](crate::CountryDetail) being `None`.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The search input was empty or whitespace only.
    #[error("Please enter a country name")]
    Validation,

    /// The country provider reported no match.
    #[error("Country not found: {name}")]
    NotFound { name: String },

    /// The provider could not be reached or its response could not be read.
    #[error("{message}")]
    Transport { message: String },
}

impl LookupError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
