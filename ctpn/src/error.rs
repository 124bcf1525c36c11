use crate::engine::EngineConfigBuilderError;

#[derive(thiserror::Error, Debug)]
pub enum PetriError {
    #[error("Transition not found: {0}")]
    TransitionNotFound(String),
    #[error("Place not found: {0}")]
    PlaceNotFound(String),
    #[error("Net not found: {0}")]
    NetNotFound(String),
    #[error("Missing token in place '{place_id}': {value}")]
    MissingToken { place_id: String, value: String },
    #[error(
        "Time constraint violation: transition '{transition_id}' not ready at time \
         {current_time} (enabled at {enabled_at})"
    )]
    TimeConstraintViolation { transition_id: String, current_time: i64, enabled_at: i64 },
    /// Firing after `max_firing_delay` elapsed; an invalid argument, see
    /// [`PetriError::is_invalid_argument`].
    #[error(
        "Firing window closed: transition '{transition_id}' attempted at time {current_time} \
         (window closed at {closed_at})"
    )]
    FiringWindowClosed { transition_id: String, current_time: i64, closed_at: i64 },
    #[error("Transition '{transition_id}' inhibited by tokens in place '{place_id}'")]
    Inhibited { transition_id: String, place_id: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Token not found in place '{place_id}': {token}")]
    TokenNotFound { place_id: String, token: String },
    #[error("Inappropriate value: {0}")]
    ValueError(String),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] EngineConfigBuilderError),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl PetriError {
    /// True for errors caused by a reference to a transition, place or net that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PetriError::TransitionNotFound(_)
                | PetriError::PlaceNotFound(_)
                | PetriError::NetNotFound(_)
        )
    }

    /// True for errors caused by firing outside of the transition's delay window.
    pub fn is_time_violation(&self) -> bool {
        matches!(
            self,
            PetriError::TimeConstraintViolation { .. } | PetriError::FiringWindowClosed { .. }
        )
    }

    /// True for calls the net can never accept as given: invalid arguments and firings after the
    /// transition's window closed.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, PetriError::InvalidArgument(_) | PetriError::FiringWindowClosed { .. })
    }
}

pub type Result<T> = std::result::Result<T, PetriError>;
