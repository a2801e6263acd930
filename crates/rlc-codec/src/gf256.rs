//! # GF(2^8) Arithmetic
//!
//! Primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11D), generator 2.
//! Log/antilog tables are generated at compile time, so they are immutable
//! process-wide statics shared by every encoder and decoder.
//!
//! Addition and subtraction are both XOR (characteristic 2).

use crate::error::CodecError;

// ─── Tables ─────────────────────────────────────────────────────────────────

// Generate both tables together. Primitive polynomial 0x11D, generator 2.
const fn gen_tables() -> ([u8; 256], [u8; 512]) {
    let mut log = [0u8; 256];
    let mut exp = [0u8; 512];
    let mut x: u16 = 1;
    let mut i = 0usize;
    while i < 255 {
        exp[i] = x as u8;
        exp[i + 255] = x as u8; // duplicate for easy modular lookup
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= 0x11D;
        }
        i += 1;
    }
    // log[0] is unused (0 has no logarithm)
    log[0] = 0;
    (log, exp)
}

const TABLES: ([u8; 256], [u8; 512]) = gen_tables();
static LOG_TABLE: [u8; 256] = TABLES.0;
static EXP_TABLE: [u8; 512] = TABLES.1;

// ─── Scalar Operations ──────────────────────────────────────────────────────

/// Addition in GF(256).
#[inline]
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Subtraction in GF(256); identical to [`add`].
#[inline]
pub fn sub(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Multiplication in GF(256).
#[inline]
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
    EXP_TABLE[log_sum]
}

/// Multiplicative inverse in GF(256).
pub fn inv(a: u8) -> Result<u8, CodecError> {
    if a == 0 {
        return Err(CodecError::DivisionByZero);
    }
    Ok(EXP_TABLE[255 - LOG_TABLE[a as usize] as usize])
}

/// Division in GF(256).
pub fn div(a: u8, b: u8) -> Result<u8, CodecError> {
    if b == 0 {
        return Err(CodecError::DivisionByZero);
    }
    if a == 0 {
        return Ok(0);
    }
    let log_diff = LOG_TABLE[a as usize] as usize + 255 - LOG_TABLE[b as usize] as usize;
    Ok(EXP_TABLE[log_diff])
}

// ─── Slice Kernels ──────────────────────────────────────────────────────────

/// `dst[i] += src[i]` over the common prefix of both slices.
pub fn add_assign(dst: &mut [u8], src: &[u8]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// `dst[i] *= c`.
pub fn mul_assign(dst: &mut [u8], c: u8) {
    match c {
        0 => dst.fill(0),
        1 => {}
        _ => {
            let log_c = LOG_TABLE[c as usize] as usize;
            for d in dst.iter_mut() {
                if *d != 0 {
                    *d = EXP_TABLE[LOG_TABLE[*d as usize] as usize + log_c];
                }
            }
        }
    }
}

/// `dst[i] += c * src[i]` over the common prefix of both slices.
pub fn add_scaled_assign(dst: &mut [u8], c: u8, src: &[u8]) {
    match c {
        0 => {}
        1 => add_assign(dst, src),
        _ => {
            let log_c = LOG_TABLE[c as usize] as usize;
            for (d, &s) in dst.iter_mut().zip(src) {
                if s != 0 {
                    *d ^= EXP_TABLE[LOG_TABLE[s as usize] as usize + log_c];
                }
            }
        }
    }
}
