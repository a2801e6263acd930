//! # rlc-codec
//!
//! Sliding-window Random Linear Codes (RLC) over GF(256).
//!
//! The encoder keeps a bounded window of source symbols and emits repair
//! symbols, each a linear combination of the window with coefficients derived
//! from a 16-bit key. The decoder runs online Gaussian elimination over every
//! source and repair symbol it receives and reports source symbols as soon as
//! they are solved.
//!
//! ## Crate structure
//!
//! - [`gf256`] — Field arithmetic and slice kernels
//! - [`symbol`] — Fixed-size payload with field-wise vector ops
//! - [`coded`] — Payload tagged with a sparse coefficient vector
//! - [`symbol_set`] — Online elimination engine (reduced row-echelon form)
//! - [`prng`] / [`coefs`] — TinyMT32 and coefficient derivation
//! - [`window`] — Bounded FIFO of consecutive ids
//! - [`encoder`] / [`decoder`] — Session endpoints
//! - [`wire`] — Byte layout of source and repair units
//! - [`config`] — Codec parameters, TOML input

pub mod coded;
pub mod coefs;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod gf256;
pub mod prng;
pub mod symbol;
pub mod symbol_set;
pub mod window;
pub mod wire;

/// Source symbol identifier, assigned consecutively by the encoder.
pub type SymbolId = u32;

pub use coded::CodedSymbol;
pub use config::{CodecConfig, CodecConfigInput};
pub use decoder::{DecodedSymbol, RlcDecoder, SymbolState};
pub use encoder::{RepairSymbol, RlcEncoder};
pub use error::CodecError;
pub use symbol::Symbol;
pub use symbol_set::{DenseMatrix, Insertion, SymbolSet};
pub use window::WindowInfo;
pub use wire::{Packet, RepairPacket, SourcePacket};
