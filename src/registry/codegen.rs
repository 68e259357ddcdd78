//! Short public game code generation.
//!
//! Codes are fixed-length strings drawn from a 64-symbol URL-safe alphabet.
//! At the default length of 6 the keyspace is 64^6 (about 6.9e10), which
//! keeps the birthday-bound collision probability for ten thousand
//! simultaneous codes well under 1e-9. The generator itself does not check
//! uniqueness; the registry retries against its current code set.

use rand::Rng;

/// URL-safe alphabet, matching the shape of nanoid-style identifiers.
pub const CODE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Default code length
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Generator for public game codes.
#[derive(Clone, Copy, Debug)]
pub struct CodeGenerator {
    length: usize,
}

impl CodeGenerator {
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Produce one code. Thread-safe; each call samples a thread-local rng.
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_have_configured_length() {
        for length in [4, 6, 10] {
            let generator = CodeGenerator::new(length);
            assert_eq!(generator.generate().len(), length);
        }
    }

    #[test]
    fn test_codes_are_pairwise_distinct_in_bulk() {
        let generator = CodeGenerator::default();
        let codes: HashSet<String> = (0..10_000).map(|_| generator.generate()).collect();
        assert_eq!(codes.len(), 10_000);
    }

    proptest! {
        #[test]
        fn test_codes_stay_in_alphabet(length in 1usize..32) {
            let generator = CodeGenerator::new(length);
            let code = generator.generate();
            prop_assert_eq!(code.len(), length);
            prop_assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
    }
}
