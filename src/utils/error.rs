use thiserror::Error;

#[derive(Debug, Error)]
pub enum MrzError {
    /// The lines do not match any known MRZ layout.
    #[error("Format error: {0}")]
    FormatError(String),

    /// A character outside `A-Z`, `0-9` and `<`.
    #[error("Invalid MRZ character: {0:?}")]
    InvalidCharacter(char),

    #[error("Country rule not found: {0}")]
    CountryRuleNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
