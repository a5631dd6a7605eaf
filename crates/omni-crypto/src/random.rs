use crate::error::{CryptoError, Result};
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng, RngCore};
use tracing::warn;

/// Handle to the operating system's secure random source.
///
/// Obtaining one performs a capability check, so callers learn up front
/// whether secure generation is possible instead of getting a silent no-op.
#[derive(Debug, Clone, Copy)]
pub struct SecureRandom {
    rng: OsRng,
}

impl SecureRandom {
    pub fn system() -> Result<Self> {
        let mut sample = [0u8; 4];
        OsRng.try_fill_bytes(&mut sample).map_err(|e| {
            warn!("OS random source unavailable: {}", e);
            CryptoError::RandomUnavailable(e.to_string())
        })?;
        Ok(Self { rng: OsRng })
    }

    pub fn is_available() -> bool {
        Self::system().is_ok()
    }

    pub fn rng(&mut self) -> &mut OsRng {
        &mut self.rng
    }
}

/// Uniform index in `[0, bound)`. `bound` must be non-zero.
pub fn random_index<R: RngCore + CryptoRng>(rng: &mut R, bound: usize) -> usize {
    rng.gen_range(0..bound)
}
