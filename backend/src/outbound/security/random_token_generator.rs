//! Random implementation of the `TokenGenerator` port.

use rand::RngCore;
use rand::rngs::OsRng;

use crate::domain::ports::TokenGenerator;
use crate::domain::{AccessToken, TOKEN_BYTES};

/// Draws tokens from the operating system RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> AccessToken {
        let mut bytes = [0_u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        AccessToken::from_entropy(bytes)
    }
}
