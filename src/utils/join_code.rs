// src/utils/join_code.rs
use rand::Rng;

pub const CODE_LENGTH: usize = 6;

// 0/O and 1/I/L are left out so codes survive being read aloud or retyped.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Generate a 6-character share code. Codes are not unique by construction;
/// the unique index on pools.code is the authority and callers retry on a
/// collision.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Normalize user-entered codes to the stored form.
pub fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_have_fixed_length() {
        for _ in 0..100 {
            assert_eq!(generate().len(), CODE_LENGTH);
        }
    }

    #[test]
    fn generated_codes_stay_inside_the_alphabet() {
        for _ in 0..100 {
            let code = generate();
            assert!(
                code.bytes().all(|b| CODE_ALPHABET.contains(&b)),
                "unexpected character in code {}",
                code
            );
        }
    }

    #[test]
    fn generated_codes_are_already_normalized() {
        let code = generate();
        assert_eq!(normalize(&code), code);
    }

    #[test]
    fn normalize_uppercases_and_trims() {
        assert_eq!(normalize("  ab12cd "), "AB12CD");
    }
}
