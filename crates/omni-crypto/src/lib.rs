pub mod charset;
pub mod error;
pub mod password;
pub mod random;

pub use charset::CharClass;
pub use error::{CryptoError, Result};
pub use password::{PasswordGenerator, PasswordSpec, Strength, MAX_LENGTH, MIN_LENGTH};
pub use random::SecureRandom;
