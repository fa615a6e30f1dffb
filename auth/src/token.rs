use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes behind a single-use token.
pub const TOKEN_BYTES: usize = 32;

/// Generate an opaque single-use token.
///
/// # Returns
/// `TOKEN_BYTES` bytes from the OS RNG, hex encoded (64 characters)
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Compare a presented token with the stored one in constant time.
pub fn tokens_match(presented: &str, stored: &str) -> bool {
    constant_time_eq(presented.as_bytes(), stored.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_format() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_token_is_fresh() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_tokens_match() {
        let token = generate_token();
        assert!(tokens_match(&token, &token.clone()));
        assert!(!tokens_match(&token, &generate_token()));
        assert!(!tokens_match("", &token));
    }
}
