use crate::charset::CharClass;
use crate::error::{CryptoError, Result};
use crate::random::{random_index, SecureRandom};
use rand::seq::SliceRandom;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub const MIN_LENGTH: usize = 8;
pub const MAX_LENGTH: usize = 128;
pub const DEFAULT_LENGTH: usize = 16;

/// Length and character classes of a password to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordSpec {
    pub length: usize,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for PasswordSpec {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
        }
    }
}

impl PasswordSpec {
    /// All classes enabled, length checked against `MIN_LENGTH..=MAX_LENGTH`.
    pub fn new(length: usize) -> Result<Self> {
        let spec = Self {
            length,
            ..Self::default()
        };
        spec.validate_length()?;
        Ok(spec)
    }

    pub fn with_lowercase(mut self, enabled: bool) -> Self {
        self.lowercase = enabled;
        self
    }

    pub fn with_uppercase(mut self, enabled: bool) -> Self {
        self.uppercase = enabled;
        self
    }

    pub fn with_digits(mut self, enabled: bool) -> Self {
        self.digits = enabled;
        self
    }

    pub fn with_symbols(mut self, enabled: bool) -> Self {
        self.symbols = enabled;
        self
    }

    pub fn is_enabled(&self, class: CharClass) -> bool {
        match class {
            CharClass::Lower => self.lowercase,
            CharClass::Upper => self.uppercase,
            CharClass::Digit => self.digits,
            CharClass::Symbol => self.symbols,
        }
    }

    /// Enabled classes in the fixed lower, upper, digit, symbol order.
    pub fn enabled_classes(&self) -> Vec<CharClass> {
        CharClass::ALL
            .into_iter()
            .filter(|class| self.is_enabled(*class))
            .collect()
    }

    pub fn can_generate(&self) -> bool {
        CharClass::ALL.iter().any(|class| self.is_enabled(*class))
    }

    pub fn pool(&self) -> String {
        self.enabled_classes().iter().map(|class| class.chars()).collect()
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_length()?;
        if !self.can_generate() {
            return Err(CryptoError::NoCharacterClass);
        }
        Ok(())
    }

    fn validate_length(&self) -> Result<()> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&self.length) {
            return Err(CryptoError::InvalidLength {
                length: self.length,
                min: MIN_LENGTH,
                max: MAX_LENGTH,
            });
        }
        Ok(())
    }

    /// Upper bound on guessing entropy: `length * log2(pool size)`.
    pub fn entropy_bits(&self) -> f64 {
        let pool = self.pool().chars().count();
        if pool == 0 {
            return 0.0;
        }
        self.length as f64 * (pool as f64).log2()
    }

    pub fn strength(&self) -> Strength {
        Strength::from_entropy(self.entropy_bits())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

impl Strength {
    pub fn from_entropy(bits: f64) -> Self {
        if bits < 60.0 {
            Strength::Weak
        } else if bits < 80.0 {
            Strength::Fair
        } else if bits < 128.0 {
            Strength::Strong
        } else {
            Strength::VeryStrong
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strength::Weak => "weak",
            Strength::Fair => "fair",
            Strength::Strong => "strong",
            Strength::VeryStrong => "very strong",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PasswordGenerator;

impl PasswordGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate with the OS random source. Fails if the spec is invalid or
    /// the random source cannot be read.
    pub fn generate(&self, spec: &PasswordSpec) -> Result<String> {
        spec.validate()?;
        let mut random = SecureRandom::system()?;
        let password = assemble(&spec.enabled_classes(), spec.length, random.rng());
        debug!(
            length = spec.length,
            classes = spec.enabled_classes().len(),
            "Generated password"
        );
        Ok(password)
    }

    pub fn generate_with<R: RngCore + CryptoRng>(
        &self,
        spec: &PasswordSpec,
        rng: &mut R,
    ) -> Result<String> {
        spec.validate()?;
        Ok(assemble(&spec.enabled_classes(), spec.length, rng))
    }

    pub fn generate_many(&self, spec: &PasswordSpec, count: usize) -> Result<Vec<String>> {
        spec.validate()?;
        let mut random = SecureRandom::system()?;
        let classes = spec.enabled_classes();
        Ok((0..count)
            .map(|_| assemble(&classes, spec.length, random.rng()))
            .collect())
    }
}

/// One seed per class (in class order, at most `length`), random fill from
/// the whole pool, then a uniform shuffle so seeds carry no position.
pub(crate) fn assemble<R: RngCore + CryptoRng>(
    classes: &[CharClass],
    length: usize,
    rng: &mut R,
) -> String {
    let pool: Vec<char> = classes.iter().flat_map(|class| class.chars().chars()).collect();
    if pool.is_empty() {
        return String::new();
    }

    let mut chars: Vec<char> = Vec::with_capacity(length);
    for class in classes.iter().take(length) {
        let set: Vec<char> = class.chars().chars().collect();
        chars.push(set[random_index(rng, set.len())]);
    }
    while chars.len() < length {
        chars.push(pool[random_index(rng, pool.len())]);
    }

    chars.shuffle(rng);
    chars.into_iter().collect()
}
