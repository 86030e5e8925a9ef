//! Error types for the snerge bot.

/// Top-level error type for the quote bot.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Configuration error (missing file, bad value, invalid range).
    #[error("config error: {0}")]
    Config(String),

    /// Chat transport error (connect, auth, send).
    #[error("chat error: {0}")]
    Chat(String),

    /// Quote corpus error (load failure, empty corpus).
    #[error("corpus error: {0}")]
    Corpus(String),

    /// OAuth credential error (resolve, validate, refresh).
    #[error("credential error: {0}")]
    Credentials(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, BotError>;
