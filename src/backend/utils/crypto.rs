// src/backend/utils/crypto.rs
// Random tokens and hashing helpers.

use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Generates a random 24-character hex identifier. Uniqueness is the only
/// property callers rely on; ids carry no ordering.
pub fn generate_id() -> String {
    let bytes: [u8; 12] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// Generates an alphanumeric password of `length` characters with at least
/// one ASCII letter and one digit. `length` below 2 is raised to 2.
pub fn generate_temporary_password(length: usize) -> String {
    let mut rng = rand::thread_rng();
    let length = length.max(2);
    let mut chars: Vec<char> = Vec::with_capacity(length);
    chars.push(rng.gen_range(b'a'..=b'z') as char);
    chars.push(rng.gen_range(b'0'..=b'9') as char);
    chars.extend((2..length).map(|_| rng.sample(Alphanumeric) as char));
    chars.shuffle(&mut rng);
    chars.into_iter().collect()
}

/// Calculates the SHA256 hash of byte data and returns it as a hex string.
pub fn calculate_sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_hex_and_distinct() {
        let ids: HashSet<String> = (0..500).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 500);
        assert!(ids.iter().all(|id| id.len() == 24 && id.chars().all(|c| c.is_ascii_hexdigit())));
    }

    #[test]
    fn temporary_passwords_contain_letter_and_digit() {
        for _ in 0..100 {
            let password = generate_temporary_password(12);
            assert_eq!(password.len(), 12);
            assert!(password.chars().any(|c| c.is_ascii_alphabetic()));
            assert!(password.chars().any(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            calculate_sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
