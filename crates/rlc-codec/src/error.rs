//! Error type shared by every codec layer.

use thiserror::Error;

use crate::SymbolId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Inverse or division by the zero field element.
    #[error("division by zero in GF(256)")]
    DivisionByZero,

    /// A payload does not have the length the operation requires.
    #[error("symbol size mismatch: expected {expected} bytes, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    /// Source symbols must enter a coding window in consecutive id order.
    #[error("non-consecutive source symbol id: expected {expected}, got {got}")]
    NonConsecutiveId { expected: SymbolId, got: SymbolId },

    #[error("coding window is empty")]
    EmptyWindow,

    /// `build_repair_symbol` was called without coefficients matching the
    /// current window.
    #[error("coding coefficients do not match the current coding window")]
    CoefficientsNotReady,

    #[error("coefficient count mismatch: expected {expected}, got {got}")]
    CoefficientCountMismatch { expected: usize, got: usize },

    /// Density threshold outside `0..=15`.
    #[error("invalid density threshold {0} (must be 0..=15)")]
    InvalidDensity(u8),

    #[error("invalid repair window [{first}, {last}]")]
    InvalidWindow { first: SymbolId, last: SymbolId },

    /// The symbol references ids already dropped from the linear system.
    #[error("symbol id {id} is behind the linear system horizon {horizon}")]
    StaleSymbol { id: SymbolId, horizon: SymbolId },

    #[error("cannot register the zero symbol as a pivot")]
    ZeroSymbol,

    #[error("pivot {0} is already occupied")]
    PivotOccupied(SymbolId),

    #[error("invalid codec configuration: {0}")]
    InvalidConfig(String),

    /// Symbol ids are not allowed to run past `u32::MAX`.
    #[error("symbol id overflow: {count} ids from {first} run past u32::MAX")]
    IdOverflow { first: SymbolId, count: usize },

    /// The repair symbol was built from application-chosen coefficients,
    /// which a key-only repair unit cannot carry.
    #[error("repair symbol uses custom coefficients and has no key to send")]
    CustomCoefficients,

    #[error("dense matrix export of {width} columns exceeds the limit of {limit}")]
    MatrixTooWide { width: u64, limit: usize },
}
