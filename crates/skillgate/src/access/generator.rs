use rand::rngs::OsRng;
use rand::Rng;

use super::domain::{RecruiterCode, CODE_ALPHABET, CODE_LENGTH};

const DEFAULT_MAX_ATTEMPTS: u32 = 20;

/// Samples recruiter code candidates and bounds how often registration may retry
/// after a storage collision.
///
/// Uniqueness is arbitrated by the account store's code constraint, not here: the
/// generator supplies candidates and the retry budget, and the registration loop
/// retries while the store signals a collision. Exhausting the budget means the
/// random source is broken or the namespace is saturated, and registration fails
/// loudly instead of looping.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    max_attempts: u32,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl CodeGenerator {
    pub fn new(max_attempts: u32) -> Self {
        let sanitized = if max_attempts == 0 {
            DEFAULT_MAX_ATTEMPTS
        } else {
            max_attempts
        };

        Self {
            max_attempts: sanitized,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Draw one candidate code from the operating system's CSPRNG. Codes carry no
    /// trace of the account id or the clock.
    pub fn candidate(&self) -> RecruiterCode {
        let mut code = String::with_capacity(CODE_LENGTH);
        for _ in 0..CODE_LENGTH {
            let index = OsRng.gen_range(0..CODE_ALPHABET.len());
            code.push(CODE_ALPHABET[index] as char);
        }
        RecruiterCode::from_canonical(code)
    }
}
