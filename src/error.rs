use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Tournament id outside of 1..=5
    #[error("`tournament_int` must be {reason} (got {value})")]
    TournamentOutOfRange { value: i64, reason: &'static str },

    #[error("`tournament_str` name not recognized: {0:?}")]
    UnknownTournament(String),

    #[error("unknown model: {0:?}")]
    UnknownModel(String),

    /// An adapter was requested that the crate was built without
    #[error("you must install {model} to use this model (enable the `{feature}` feature)")]
    MissingDependency {
        model: &'static str,
        feature: &'static str,
    },

    #[error("shape mismatch: {0}")]
    Shape(String),

    /// Raised by the estimator layer and passed through adapters untouched
    #[error("estimator error: {0}")]
    Estimator(String),

    #[error("{0} used before fit")]
    NotFitted(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),
}
