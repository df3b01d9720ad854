use thiserror::Error;

/// Errors raised by the travel network. None of them are fatal to the process;
/// request boundaries absorb them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TravelError {
    /// Planet not registered, travel point or ticket absent, client gone.
    #[error("not found: {0}")]
    NotFound(String),

    /// The world catalog has no planet with this name.
    #[error("unknown planet: {0}")]
    PlanetUnknown(String),

    /// A collaborator failed in an unexpected way.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TravelError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TravelError::NotFound(_) | TravelError::PlanetUnknown(_))
    }
}
