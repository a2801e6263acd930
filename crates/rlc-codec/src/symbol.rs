//! # Symbol Vector Algebra
//!
//! A [`Symbol`] is a fixed-length byte buffer seen as a vector over GF(256).
//! Operations return new owned symbols; the `*_assign` variants mutate in
//! place and exist for the encoder's accumulation loop.

use std::fmt;

use crate::error::CodecError;
use crate::gf256;

/// A source or repair payload of exactly `symbol_size` bytes.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Symbol {
    data: Vec<u8>,
}

impl Symbol {
    pub fn new(data: Vec<u8>) -> Self {
        Symbol { data }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        Symbol {
            data: data.to_vec(),
        }
    }

    /// An all-zero symbol of `size` bytes.
    pub fn zeroed(size: usize) -> Self {
        Symbol {
            data: vec![0u8; size],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn is_all_zero(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// `self + other`. Both symbols must have the same length.
    pub fn add(&self, other: &Symbol) -> Result<Symbol, CodecError> {
        self.check_len(other)?;
        let mut out = self.clone();
        gf256::add_assign(&mut out.data, &other.data);
        Ok(out)
    }

    /// `self - other`, which in characteristic 2 is `self + other`.
    pub fn sub(&self, other: &Symbol) -> Result<Symbol, CodecError> {
        self.add(other)
    }

    /// `c * self`.
    pub fn scale(&self, c: u8) -> Symbol {
        let mut out = self.clone();
        gf256::mul_assign(&mut out.data, c);
        out
    }

    /// `self / c`.
    pub fn scale_inv(&self, c: u8) -> Result<Symbol, CodecError> {
        Ok(self.scale(gf256::inv(c)?))
    }

    /// In place `self += c * other`.
    pub fn add_scaled_assign(&mut self, c: u8, other: &Symbol) -> Result<(), CodecError> {
        self.check_len(other)?;
        gf256::add_scaled_assign(&mut self.data, c, &other.data);
        Ok(())
    }

    fn check_len(&self, other: &Symbol) -> Result<(), CodecError> {
        if self.data.len() != other.data.len() {
            return Err(CodecError::SizeMismatch {
                expected: self.data.len(),
                got: other.data.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<u8>> for Symbol {
    fn from(data: Vec<u8>) -> Self {
        Symbol::new(data)
    }
}

impl From<&[u8]> for Symbol {
    fn from(data: &[u8]) -> Self {
        Symbol::from_bytes(data)
    }
}

impl AsRef<[u8]> for Symbol {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol(")?;
        for b in &self.data {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}
