//! # Coded Symbols
//!
//! A [`CodedSymbol`] is a payload tagged with the linear combination of
//! source symbols it represents. The coefficient vector is sparse in the
//! sense that only the span `[min_id, max_id]` is stored, as
//! `(min_id, coefs)` with `coefs[i]` the weight of source id `min_id + i`.
//!
//! Every constructor and operation keeps the canonical form:
//!
//! - the first and last stored coefficients are nonzero;
//! - a symbol whose coefficients are all zero is *the* zero value, with an
//!   empty window and an empty payload.
//!
//! Plain source symbols are the special case `coefs == [1]`.

use std::fmt;

use crate::error::CodecError;
use crate::gf256;
use crate::SymbolId;

#[derive(Clone, PartialEq, Eq, Default)]
pub struct CodedSymbol {
    /// Id of `coefs[0]`. Meaningless (0) for the zero value.
    min_id: SymbolId,
    coefs: Vec<u8>,
    data: Vec<u8>,
}

impl CodedSymbol {
    /// The canonical zero value.
    pub fn zero() -> Self {
        CodedSymbol::default()
    }

    /// Wrap a source symbol: coefficient vector `[1]` at `id`.
    pub fn from_source_symbol(id: SymbolId, data: impl Into<Vec<u8>>) -> Self {
        CodedSymbol {
            min_id: id,
            coefs: vec![1],
            data: data.into(),
        }
    }

    /// Build from an explicit coefficient vector starting at `min_id`.
    ///
    /// Leading and trailing zero coefficients are trimmed; an all-zero vector
    /// yields the zero value regardless of `data`. Fails with `IdOverflow` when
    /// a nonzero coefficient would sit past `u32::MAX`.
    pub fn from_coefs_and_symbol(
        min_id: SymbolId,
        coefs: impl Into<Vec<u8>>,
        data: impl Into<Vec<u8>>,
    ) -> Result<Self, CodecError> {
        let coefs = coefs.into();
        if let Some(last) = coefs.iter().rposition(|&c| c != 0) {
            if u64::from(min_id) + last as u64 > u64::from(SymbolId::MAX) {
                return Err(CodecError::IdOverflow {
                    first: min_id,
                    count: coefs.len(),
                });
            }
        }
        let mut symbol = CodedSymbol {
            min_id,
            coefs,
            data: data.into(),
        };
        symbol.canonicalize();
        Ok(symbol)
    }

    // ─── Accessors ──────────────────────────────────────────────────────

    pub fn is_zero(&self) -> bool {
        self.coefs.is_empty()
    }

    /// Lowest id with a nonzero coefficient, `None` for the zero value.
    pub fn min_id(&self) -> Option<SymbolId> {
        (!self.is_zero()).then_some(self.min_id)
    }

    /// Highest id with a nonzero coefficient, `None` for the zero value.
    pub fn max_id(&self) -> Option<SymbolId> {
        (!self.is_zero()).then(|| self.last_id())
    }

    /// Coefficient of source id `id`; 0 outside the window.
    pub fn coef(&self, id: SymbolId) -> u8 {
        if self.is_zero() || id < self.min_id {
            return 0;
        }
        self.coefs
            .get((id - self.min_id) as usize)
            .copied()
            .unwrap_or(0)
    }

    /// `(min_id, coefs)`; `(0, [])` for the zero value.
    pub fn coefs(&self) -> (SymbolId, &[u8]) {
        (self.min_id, &self.coefs)
    }

    /// Number of nonzero coefficients.
    pub fn count_coefs(&self) -> usize {
        self.coefs.iter().filter(|&&c| c != 0).count()
    }

    /// Leading (lowest-id) nonzero coefficient and its id.
    pub fn leading_coef(&self) -> Option<(SymbolId, u8)> {
        self.coefs.first().map(|&c| (self.min_id, c))
    }

    /// `Some(id)` when this symbol is exactly source symbol `id`.
    pub fn decoded_id(&self) -> Option<SymbolId> {
        (self.coefs.as_slice() == [1]).then_some(self.min_id)
    }

    /// Payload length in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    // ─── Algebra ────────────────────────────────────────────────────────

    /// `self + other`. Windows are merged, payloads are added from offset 0
    /// with the shorter one zero-extended.
    pub fn add(&self, other: &CodedSymbol) -> CodedSymbol {
        let mut result = CodedSymbol::zero();
        result.add_base(self, other);
        result
    }

    /// `self - other`, identical to [`CodedSymbol::add`].
    pub fn sub(&self, other: &CodedSymbol) -> CodedSymbol {
        self.add(other)
    }

    /// Store `x + y` into `self`, reusing its buffers.
    pub fn add_base(&mut self, x: &CodedSymbol, y: &CodedSymbol) {
        self.coefs.clear();
        self.data.clear();
        match (x.is_zero(), y.is_zero()) {
            (true, true) => {
                self.min_id = 0;
                return;
            }
            (false, true) => {
                self.copy_from(x);
                return;
            }
            (true, false) => {
                self.copy_from(y);
                return;
            }
            (false, false) => {}
        }

        let lo = x.min_id.min(y.min_id);
        let hi = x.last_id().max(y.last_id());
        self.min_id = lo;
        self.coefs.resize((hi - lo) as usize + 1, 0);
        for operand in [x, y] {
            let offset = (operand.min_id - lo) as usize;
            gf256::add_assign(&mut self.coefs[offset..], &operand.coefs);
        }

        self.data.resize(x.data.len().max(y.data.len()), 0);
        gf256::add_assign(&mut self.data, &x.data);
        gf256::add_assign(&mut self.data, &y.data);

        self.canonicalize();
    }

    /// In place `self += c * other`, the elimination step of the decoder.
    pub fn add_scaled_assign(&mut self, c: u8, other: &CodedSymbol) {
        if c == 0 || other.is_zero() {
            return;
        }
        if self.is_zero() {
            *self = other.scale(c);
            return;
        }

        if other.min_id < self.min_id {
            let grow = (self.min_id - other.min_id) as usize;
            let mut coefs = vec![0u8; grow + self.coefs.len()];
            coefs[grow..].copy_from_slice(&self.coefs);
            self.coefs = coefs;
            self.min_id = other.min_id;
        }
        let hi = self.last_id().max(other.last_id());
        self.coefs.resize((hi - self.min_id) as usize + 1, 0);
        let offset = (other.min_id - self.min_id) as usize;
        gf256::add_scaled_assign(&mut self.coefs[offset..], c, &other.coefs);

        if other.data.len() > self.data.len() {
            self.data.resize(other.data.len(), 0);
        }
        gf256::add_scaled_assign(&mut self.data, c, &other.data);

        self.canonicalize();
    }

    /// `c * self`; scaling by 0 gives the zero value.
    pub fn scale(&self, c: u8) -> CodedSymbol {
        if c == 0 || self.is_zero() {
            return CodedSymbol::zero();
        }
        let mut result = self.clone();
        gf256::mul_assign(&mut result.coefs, c);
        gf256::mul_assign(&mut result.data, c);
        result
    }

    /// `self / c`.
    pub fn scale_inv(&self, c: u8) -> Result<CodedSymbol, CodecError> {
        Ok(self.scale(gf256::inv(c)?))
    }

    /// Text form used by the diagnostic dumps.
    pub fn dump(&self) -> String {
        self.to_string()
    }

    // ─── Internals ──────────────────────────────────────────────────────

    fn last_id(&self) -> SymbolId {
        self.min_id + self.coefs.len().saturating_sub(1) as SymbolId
    }

    fn copy_from(&mut self, other: &CodedSymbol) {
        self.min_id = other.min_id;
        self.coefs.extend_from_slice(&other.coefs);
        self.data.extend_from_slice(&other.data);
    }

    /// Strip zero coefficients at both ends; collapse to the zero value when
    /// nothing is left.
    fn canonicalize(&mut self) {
        let Some(first) = self.coefs.iter().position(|&c| c != 0) else {
            self.min_id = 0;
            self.coefs.clear();
            self.data.clear();
            return;
        };
        let last = self.coefs.iter().rposition(|&c| c != 0).unwrap_or(first);
        self.coefs.truncate(last + 1);
        self.coefs.drain(..first);
        self.min_id += first as SymbolId;
        debug_assert!(self.coefs.first().is_some_and(|&c| c != 0));
        debug_assert!(self.coefs.last().is_some_and(|&c| c != 0));
    }
}

impl fmt::Display for CodedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{'size':{}, 'nb_coef':{}",
            self.data.len(),
            self.count_coefs()
        )?;
        match (self.min_id(), self.max_id()) {
            (Some(lo), Some(hi)) => {
                write!(f, ", 'first_nonzero_id':{lo}, 'last_nonzero_id':{hi}")?
            }
            _ => write!(f, ", 'first_nonzero_id':None, 'last_nonzero_id':None")?,
        }
        write!(f, ", 'coef_value':[")?;
        for (i, c) in self.coefs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, "], 'data':'")?;
        for b in &self.data {
            write!(f, "\\x{b:02x}")?;
        }
        write!(f, "'}}")
    }
}

impl fmt::Debug for CodedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
