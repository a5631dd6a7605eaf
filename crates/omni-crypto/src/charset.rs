//! Character classes a password can draw from.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
/// Symbols accepted by nearly every password policy.
pub const SYMBOLS: &str = "!@#$%&*?-_+";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    Lower,
    Upper,
    Digit,
    Symbol,
}

impl CharClass {
    /// Fixed class order used for pool construction and seeding.
    pub const ALL: [CharClass; 4] = [
        CharClass::Lower,
        CharClass::Upper,
        CharClass::Digit,
        CharClass::Symbol,
    ];

    pub fn chars(&self) -> &'static str {
        match self {
            CharClass::Lower => LOWERCASE,
            CharClass::Upper => UPPERCASE,
            CharClass::Digit => DIGITS,
            CharClass::Symbol => SYMBOLS,
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars().contains(c)
    }

    pub fn classify(c: char) -> Option<CharClass> {
        Self::ALL.into_iter().find(|class| class.contains(c))
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CharClass::Lower => "lowercase",
            CharClass::Upper => "uppercase",
            CharClass::Digit => "digits",
            CharClass::Symbol => "symbols",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_are_disjoint() {
        for class in CharClass::ALL {
            for c in class.chars().chars() {
                assert_eq!(CharClass::classify(c), Some(class));
            }
        }
        assert_eq!(CharClass::classify('^'), None);
    }

    #[test]
    fn test_class_sizes() {
        let sizes: Vec<usize> = CharClass::ALL.iter().map(|c| c.chars().len()).collect();
        assert_eq!(sizes, vec![26, 26, 10, 11]);
    }
}
