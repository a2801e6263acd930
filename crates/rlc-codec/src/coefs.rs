//! # Coding Coefficients
//!
//! Coefficients are never carried on the wire: encoder and decoder both
//! regenerate them from `(key, add_param)` and the window size. This module
//! is the single place that derivation lives.

use crate::error::CodecError;
use crate::prng::TinyMt32;

/// Density threshold at which every coefficient is nonzero.
pub const FULL_DENSITY: u8 = 15;

/// PRNG seed for a repair symbol.
///
/// `add_param` extends the 16-bit repair key; with `add_param == 0` the seed
/// is the bare key.
pub fn repair_seed(key: u16, add_param: u16) -> u32 {
    (u32::from(add_param) << 16) | u32::from(key)
}

/// Fill `count` coefficients for the given seed.
///
/// With `density == 15` every coefficient is in `1..=255`. Lower values make
/// each coefficient nonzero with probability `(density + 1) / 16`.
pub fn generate_coding_coefficients(
    seed: u32,
    count: usize,
    density: u8,
) -> Result<Vec<u8>, CodecError> {
    if density > FULL_DENSITY {
        return Err(CodecError::InvalidDensity(density));
    }
    let mut rng = TinyMt32::new(seed);
    let mut coefs = Vec::with_capacity(count);
    for _ in 0..count {
        let c = if density == FULL_DENSITY || rng.rand16() <= density {
            nonzero_byte(&mut rng)
        } else {
            0
        };
        coefs.push(c);
    }
    Ok(coefs)
}

fn nonzero_byte(rng: &mut TinyMt32) -> u8 {
    loop {
        let c = rng.rand256();
        if c != 0 {
            return c;
        }
    }
}
