//! Cryptographically secure random bytes from the operating system.

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::errors::{BurnNoteError, Result};

/// Fill `buf` from the OS CSPRNG.
///
/// An unavailable entropy source is reported, never papered over with a
/// weaker generator.
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| BurnNoteError::RandomSource(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_distinct_buffers() {
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        fill_random(&mut a).unwrap();
        fill_random(&mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_buffer_is_fine() {
        fill_random(&mut []).unwrap();
    }
}
