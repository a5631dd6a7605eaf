use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("No character class selected for password generation")]
    NoCharacterClass,

    #[error("Password length must be between {min} and {max}, got {length}")]
    InvalidLength { length: usize, min: usize, max: usize },

    #[error("Secure random source unavailable: {0}")]
    RandomUnavailable(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
