use std::io;

/// Boxed cause carried by [`PracticeError::Fetch`].
pub type FetchCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Conditions that keep a practice session from starting.
///
/// The display strings are shown to the user as-is, so they read as
/// messages rather than diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PracticeError {
    #[error("No words available to practice.")]
    NoWordsAvailable,
    #[error("Please enter a topic or word.")]
    EmptyTopic,
    #[error("Please select a sublist.")]
    NoSublistSelected,
    #[error("Error fetching words: {0}")]
    Fetch(#[source] FetchCause),
    #[error("No words found for this topic.")]
    EmptyResult,
    #[error("Unknown sublist '{0}'.")]
    UnknownSublist(String),
    #[error("Could not start the practice worker: {0}")]
    Spawn(#[source] io::Error),
}

impl PracticeError {
    pub fn fetch<E>(cause: E) -> Self
    where
        E: Into<FetchCause>,
    {
        PracticeError::Fetch(cause.into())
    }
}
