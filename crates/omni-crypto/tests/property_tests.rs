use omni_crypto::{CharClass, CryptoError, PasswordGenerator, PasswordSpec, MAX_LENGTH, MIN_LENGTH};
use proptest::prelude::*;
use std::collections::HashSet;

/// Any combination of the four class flags with at least one enabled.
fn class_flags_strategy() -> impl Strategy<Value = (bool, bool, bool, bool)> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>())
        .prop_filter("at least one class", |(l, u, d, s)| *l || *u || *d || *s)
}

fn spec_from(length: usize, (l, u, d, s): (bool, bool, bool, bool)) -> PasswordSpec {
    PasswordSpec::new(length)
        .expect("length in range")
        .with_lowercase(l)
        .with_uppercase(u)
        .with_digits(d)
        .with_symbols(s)
}

// Property-based tests for password generation
proptest! {
    #[test]
    fn test_password_has_exact_length_and_class_coverage(
        length in MIN_LENGTH..=MAX_LENGTH,
        flags in class_flags_strategy()
    ) {
        let spec = spec_from(length, flags);
        let password = PasswordGenerator::new().generate(&spec).unwrap();

        prop_assert_eq!(password.chars().count(), length);

        for class in spec.enabled_classes() {
            prop_assert!(
                password.chars().any(|c| class.contains(c)),
                "missing {} in generated password", class
            );
        }

        let pool: HashSet<char> = spec.pool().chars().collect();
        prop_assert!(password.chars().all(|c| pool.contains(&c)));
        prop_assert!(password
            .chars()
            .all(|c| CharClass::classify(c).map(|class| spec.is_enabled(class)).unwrap_or(false)));
    }

    #[test]
    fn test_out_of_range_length_is_rejected(
        length in prop_oneof![0..MIN_LENGTH, (MAX_LENGTH + 1)..1024usize]
    ) {
        let is_invalid_length = matches!(
            PasswordSpec::new(length),
            Err(CryptoError::InvalidLength { .. })
        );
        prop_assert!(is_invalid_length);
    }

    #[test]
    fn test_passwords_are_unique(iterations in 2..20usize) {
        let spec = PasswordSpec::new(32).unwrap();
        let generator = PasswordGenerator::new();
        let mut seen = HashSet::new();

        for _ in 0..iterations {
            prop_assert!(seen.insert(generator.generate(&spec).unwrap()));
        }
    }
}

#[test]
fn test_all_classes_disabled_yields_no_password() {
    let spec = spec_from(16, (false, false, false, false));
    let result = PasswordGenerator::new().generate(&spec);
    assert!(matches!(result, Err(CryptoError::NoCharacterClass)));
}

#[test]
fn test_seed_characters_are_not_pinned_to_front() {
    // The shuffle moves seed characters, so the first digit lands at varying positions.
    let spec = spec_from(64, (true, false, true, false));
    let generator = PasswordGenerator::new();
    let positions: HashSet<usize> = (0..50)
        .map(|_| {
            let password = generator.generate(&spec).unwrap();
            password.chars().position(|c| c.is_ascii_digit()).unwrap()
        })
        .collect();
    assert!(positions.len() > 1);
}
