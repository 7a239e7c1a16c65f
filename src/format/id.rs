//! Ephemeral identifiers for report nodes that arrive without one
//!
//! These keys only need to be unique within a loaded report; they are not
//! suitable for anything security sensitive.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const UUID_TEMPLATE: &str = "xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx";

/// Source of fresh node identifiers
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Version-4 style identifiers backed by a seedable RNG
pub struct RandomIds {
    rng: StdRng,
}

impl RandomIds {
    /// Deterministic sequence, for tests and reproducible output
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        generate_uuid(&mut self.rng)
    }
}

/// Fill the version-4 template: `x` is any hex digit, `y` is one of 8, 9, a, b
pub fn generate_uuid<R: Rng + ?Sized>(rng: &mut R) -> String {
    UUID_TEMPLATE
        .chars()
        .map(|c| match c {
            'x' => hex_digit(rng.gen_range(0..16)),
            'y' => hex_digit((rng.gen_range(0..16) & 0x3) | 0x8),
            other => other,
        })
        .collect()
}

fn hex_digit(value: u32) -> char {
    char::from_digit(value, 16).unwrap_or('0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use regex::Regex;

    fn uuid_pattern() -> Regex {
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$").unwrap()
    }

    #[test]
    fn test_seeded_ids_are_reproducible() {
        let mut a = RandomIds::seeded(7);
        let mut b = RandomIds::seeded(7);
        assert_eq!(a.next_id(), b.next_id());
        assert_eq!(a.next_id(), b.next_id());
    }

    #[test]
    fn test_consecutive_ids_differ() {
        let mut ids = RandomIds::seeded(1);
        let first = ids.next_id();
        let second = ids.next_id();
        assert_ne!(first, second);
    }

    #[test]
    fn test_entropy_ids_match_pattern() {
        let mut ids = RandomIds::default();
        let id = ids.next_id();
        assert!(uuid_pattern().is_match(&id), "bad id {}", id);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn uuid_always_matches_v4_layout(seed in any::<u64>()) {
            let id = RandomIds::seeded(seed).next_id();
            prop_assert_eq!(id.len(), 36);
            prop_assert!(uuid_pattern().is_match(&id), "bad id {}", id);
            let chars: Vec<char> = id.chars().collect();
            prop_assert_eq!(chars[14], '4');
            prop_assert!(matches!(chars[19], '8' | '9' | 'a' | 'b'));
        }
    }
}
