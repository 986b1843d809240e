//! Form key generation.

use rand::RngCore;

/// Number of random bytes in a form key.
const FORM_KEY_BYTES: usize = 16;

/// Length of a form key in hex characters.
pub const FORM_KEY_LEN: usize = FORM_KEY_BYTES * 2;

/// Generates a new form key: 16 bytes from the OS-seeded CSPRNG, hex encoded.
#[must_use]
pub fn generate_form_key() -> String {
    let mut bytes = [0u8; FORM_KEY_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Whether `key` has the shape of a generated form key.
#[must_use]
pub fn is_valid_form_key(key: &str) -> bool {
    key.len() == FORM_KEY_LEN && key.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_hex_of_any_key_bytes_is_valid(bytes in any::<[u8; FORM_KEY_BYTES]>()) {
            prop_assert!(is_valid_form_key(&hex::encode(bytes)));
        }

        #[test]
        fn prop_valid_keys_are_lowercase_hex(key in "[0-9a-fA-F]{30,34}") {
            let expected = key.len() == FORM_KEY_LEN && !key.chars().any(|c| c.is_ascii_uppercase());
            prop_assert_eq!(is_valid_form_key(&key), expected);
        }
    }
}
