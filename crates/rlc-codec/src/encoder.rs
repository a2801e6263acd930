//! # Sliding-Window RLC Encoder
//!
//! Source symbols enter a bounded coding window. A repair symbol is the
//! GF(256) linear combination of every symbol in the window, with
//! coefficients regenerated from `(key, add_param)` so they never travel on
//! the wire.
//!
//! Producing a repair symbol is two steps: [`RlcEncoder::generate_coding_coefs`]
//! fixes the coefficients for the current window, then
//! [`RlcEncoder::build_repair_symbol`] combines the payloads. Any change to the
//! window between the two invalidates the coefficients.

use bytes::Bytes;
use tracing::{debug, trace};

use crate::coded::CodedSymbol;
use crate::coefs::{generate_coding_coefficients, repair_seed};
use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::symbol::Symbol;
use crate::window::{CodingWindow, WindowInfo};
use crate::wire::{RepairPacket, SourcePacket};
use crate::SymbolId;

/// A repair symbol together with the parameters the decoder needs to
/// regenerate its coefficients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairSymbol {
    pub key: u16,
    pub add_param: u16,
    pub first_id: SymbolId,
    pub last_id: SymbolId,
    pub symbol: CodedSymbol,
    symbol_size: usize,
    custom: bool,
}

impl RepairSymbol {
    /// Payload padded to the session symbol size.
    pub fn payload(&self) -> Bytes {
        let mut data = self.symbol.data().to_vec();
        data.resize(self.symbol_size, 0);
        Bytes::from(data)
    }

    /// Built from [`RlcEncoder::set_coding_coefs_tab`] rather than a key.
    pub fn is_custom(&self) -> bool {
        self.custom
    }

    /// Repair unit for the wire. Custom-coefficient symbols are refused: a
    /// receiver would regenerate coefficients from `(key, add_param)` and
    /// decode garbage. Send those through
    /// [`RlcDecoder::decode_with_new_repair_symbol_and_coefs`] instead.
    ///
    /// [`RlcDecoder::decode_with_new_repair_symbol_and_coefs`]: crate::RlcDecoder::decode_with_new_repair_symbol_and_coefs
    pub fn to_packet(&self) -> Result<RepairPacket, CodecError> {
        if self.custom {
            return Err(CodecError::CustomCoefficients);
        }
        Ok(RepairPacket {
            key: self.key,
            add_param: self.add_param,
            first_id: self.first_id,
            last_id: self.last_id,
            payload: self.payload(),
        })
    }
}

/// Coefficients fixed for one exact window.
#[derive(Debug, Clone)]
struct CoefficientTable {
    key: u16,
    add_param: u16,
    first_id: SymbolId,
    values: Vec<u8>,
    custom: bool,
}

#[derive(Debug, Clone)]
pub struct RlcEncoder {
    window: CodingWindow<Symbol>,
    symbol_size: usize,
    density_threshold: u8,
    coefs: Option<CoefficientTable>,
}

impl RlcEncoder {
    pub fn new(config: &CodecConfig) -> Self {
        RlcEncoder {
            window: CodingWindow::new(config.max_coding_window_size),
            symbol_size: config.symbol_size,
            density_threshold: config.density_threshold,
            coefs: None,
        }
    }

    /// Append a source symbol. Returns the id evicted from a full window.
    pub fn add_source_symbol_to_coding_window(
        &mut self,
        data: &[u8],
        id: SymbolId,
    ) -> Result<Option<SymbolId>, CodecError> {
        if data.len() != self.symbol_size {
            return Err(CodecError::SizeMismatch {
                expected: self.symbol_size,
                got: data.len(),
            });
        }
        let evicted = self
            .window
            .push(id, Symbol::from_bytes(data))?
            .map(|(old, _)| old);
        self.coefs = None;
        if let Some(old) = evicted {
            debug!(evicted = old, id, "source symbol left the coding window");
        }
        Ok(evicted)
    }

    /// Same as [`add_source_symbol_to_coding_window`], also returning the
    /// source unit to transmit.
    ///
    /// [`add_source_symbol_to_coding_window`]: RlcEncoder::add_source_symbol_to_coding_window
    pub fn add_source_packet(
        &mut self,
        data: &[u8],
        id: SymbolId,
    ) -> Result<(SourcePacket, Option<SymbolId>), CodecError> {
        let evicted = self.add_source_symbol_to_coding_window(data, id)?;
        Ok((SourcePacket::new(id, Bytes::copy_from_slice(data)), evicted))
    }

    /// Derive coefficients for the current window from `(key, add_param)`.
    pub fn generate_coding_coefs(&mut self, key: u16, add_param: u16) -> Result<(), CodecError> {
        let first_id = self.window.first_id().ok_or(CodecError::EmptyWindow)?;
        let values = generate_coding_coefficients(
            repair_seed(key, add_param),
            self.window.len(),
            self.density_threshold,
        )?;
        self.coefs = Some(CoefficientTable {
            key,
            add_param,
            first_id,
            values,
            custom: false,
        });
        Ok(())
    }

    /// Install application-chosen coefficients for the current window.
    ///
    /// Repair symbols built from them carry key 0 and add_param 0 and are
    /// marked custom; the receiving side has to learn the coefficients some
    /// other way, so [`RepairSymbol::to_packet`] refuses them.
    pub fn set_coding_coefs_tab(&mut self, coefs: Vec<u8>) -> Result<(), CodecError> {
        let first_id = self.window.first_id().ok_or(CodecError::EmptyWindow)?;
        if coefs.len() != self.window.len() {
            return Err(CodecError::CoefficientCountMismatch {
                expected: self.window.len(),
                got: coefs.len(),
            });
        }
        self.coefs = Some(CoefficientTable {
            key: 0,
            add_param: 0,
            first_id,
            values: coefs,
            custom: true,
        });
        Ok(())
    }

    /// Coefficients currently fixed for the window, if any.
    pub fn coding_coefs_tab(&self) -> Option<&[u8]> {
        self.coefs.as_ref().map(|t| t.values.as_slice())
    }

    /// Combine the window with the fixed coefficients.
    pub fn build_repair_symbol(&self) -> Result<RepairSymbol, CodecError> {
        let info = self.window.info().ok_or(CodecError::EmptyWindow)?;
        let table = self
            .coefs
            .as_ref()
            .filter(|t| t.first_id == info.first && t.values.len() == info.len)
            .ok_or(CodecError::CoefficientsNotReady)?;

        let mut acc = Symbol::zeroed(self.symbol_size);
        for ((_, source), &c) in self.window.iter().zip(&table.values) {
            acc.add_scaled_assign(c, source)?;
        }
        let symbol =
            CodedSymbol::from_coefs_and_symbol(info.first, table.values.clone(), acc.into_vec())?;

        trace!(
            key = table.key,
            add_param = table.add_param,
            first_id = info.first,
            last_id = info.last,
            nb_coef = symbol.count_coefs(),
            "repair symbol built"
        );
        Ok(RepairSymbol {
            key: table.key,
            add_param: table.add_param,
            first_id: info.first,
            last_id: info.last,
            symbol,
            symbol_size: self.symbol_size,
            custom: table.custom,
        })
    }

    /// [`generate_coding_coefs`] followed by [`build_repair_symbol`].
    ///
    /// [`generate_coding_coefs`]: RlcEncoder::generate_coding_coefs
    /// [`build_repair_symbol`]: RlcEncoder::build_repair_symbol
    pub fn generate_repair_symbol(
        &mut self,
        key: u16,
        add_param: u16,
    ) -> Result<RepairSymbol, CodecError> {
        self.generate_coding_coefs(key, add_param)?;
        self.build_repair_symbol()
    }

    /// Drop every window symbol with an id `<= id` (e.g. acknowledged).
    pub fn remove_source_symbol_from_coding_window(&mut self, id: SymbolId) -> usize {
        let removed = self.window.remove_through(id);
        if removed > 0 {
            self.coefs = None;
            debug!(through = id, removed, "coding window trimmed");
        }
        removed
    }

    pub fn reset_coding_window(&mut self) {
        self.window.clear();
        self.coefs = None;
    }

    pub fn coding_window_info(&self) -> Option<WindowInfo> {
        self.window.info()
    }

    pub fn coding_window_len(&self) -> usize {
        self.window.len()
    }

    pub fn max_coding_window_size(&self) -> usize {
        self.window.capacity()
    }

    pub fn symbol_size(&self) -> usize {
        self.symbol_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gf256;

    fn encoder(size: usize, window: usize) -> RlcEncoder {
        RlcEncoder::new(&CodecConfig::new(size, window).unwrap())
    }

    // ─── Window Management ──────────────────────────────────────────────

    #[test]
    fn rejects_wrong_size() {
        let mut enc = encoder(4, 4);
        assert_eq!(
            enc.add_source_symbol_to_coding_window(&[1, 2, 3], 0),
            Err(CodecError::SizeMismatch {
                expected: 4,
                got: 3
            })
        );
        assert_eq!(enc.coding_window_len(), 0);
    }

    #[test]
    fn full_window_evicts_oldest() {
        let mut enc = encoder(2, 3);
        for id in 0..3 {
            assert_eq!(enc.add_source_symbol_to_coding_window(&[id as u8; 2], id), Ok(None));
        }
        assert_eq!(enc.add_source_symbol_to_coding_window(&[9; 2], 3), Ok(Some(0)));
        let info = enc.coding_window_info().unwrap();
        assert_eq!((info.first, info.last, info.len), (1, 3, 3));
    }

    #[test]
    fn ids_must_be_consecutive() {
        let mut enc = encoder(1, 4);
        enc.add_source_symbol_to_coding_window(&[0], 5).unwrap();
        assert_eq!(
            enc.add_source_symbol_to_coding_window(&[0], 7),
            Err(CodecError::NonConsecutiveId {
                expected: 6,
                got: 7
            })
        );
    }

    #[test]
    fn remove_and_reset() {
        let mut enc = encoder(1, 8);
        for id in 0..6 {
            enc.add_source_symbol_to_coding_window(&[0], id).unwrap();
        }
        assert_eq!(enc.remove_source_symbol_from_coding_window(2), 3);
        assert_eq!(enc.coding_window_info().map(|i| i.first), Some(3));
        enc.reset_coding_window();
        assert!(enc.coding_window_info().is_none());
        // Any id may start a fresh window.
        enc.add_source_symbol_to_coding_window(&[0], 100).unwrap();
    }

    // ─── Repair Generation ──────────────────────────────────────────────

    #[test]
    fn empty_window_has_no_repair() {
        let mut enc = encoder(4, 4);
        assert_eq!(enc.generate_coding_coefs(1, 0), Err(CodecError::EmptyWindow));
        assert_eq!(enc.build_repair_symbol(), Err(CodecError::EmptyWindow));
    }

    #[test]
    fn coefficients_are_invalidated_by_window_changes() {
        let mut enc = encoder(2, 4);
        enc.add_source_symbol_to_coding_window(&[1, 2], 0).unwrap();
        assert_eq!(enc.build_repair_symbol(), Err(CodecError::CoefficientsNotReady));
        enc.generate_coding_coefs(3, 0).unwrap();
        assert!(enc.build_repair_symbol().is_ok());
        enc.add_source_symbol_to_coding_window(&[3, 4], 1).unwrap();
        assert!(enc.coding_coefs_tab().is_none());
        assert_eq!(enc.build_repair_symbol(), Err(CodecError::CoefficientsNotReady));
    }

    #[test]
    fn repair_is_the_linear_combination() {
        let mut enc = encoder(3, 4);
        let sources = [[1u8, 2, 3], [4, 5, 6], [7, 8, 9]];
        for (id, s) in sources.iter().enumerate() {
            enc.add_source_symbol_to_coding_window(s, 10 + id as SymbolId)
                .unwrap();
        }
        enc.generate_coding_coefs(77, 0).unwrap();
        let coefs = enc.coding_coefs_tab().unwrap().to_vec();
        assert_eq!(coefs.len(), 3);

        let repair = enc.build_repair_symbol().unwrap();
        assert_eq!((repair.first_id, repair.last_id), (10, 12));
        let mut expected = [0u8; 3];
        for (s, &c) in sources.iter().zip(&coefs) {
            gf256::add_scaled_assign(&mut expected, c, s);
        }
        assert_eq!(repair.symbol.data(), &expected);
        assert_eq!(repair.symbol.coefs(), (10, coefs.as_slice()));
    }

    #[test]
    fn custom_coefficients() {
        let mut enc = encoder(1, 4);
        enc.add_source_symbol_to_coding_window(&[5], 0).unwrap();
        enc.add_source_symbol_to_coding_window(&[6], 1).unwrap();
        assert_eq!(
            enc.set_coding_coefs_tab(vec![1]),
            Err(CodecError::CoefficientCountMismatch {
                expected: 2,
                got: 1
            })
        );
        enc.set_coding_coefs_tab(vec![1, 1]).unwrap();
        let repair = enc.build_repair_symbol().unwrap();
        assert_eq!(repair.symbol.data(), &[5 ^ 6]);
        assert_eq!((repair.key, repair.add_param), (0, 0));
        assert!(repair.is_custom());
        assert_eq!(repair.to_packet(), Err(CodecError::CustomCoefficients));

        enc.generate_coding_coefs(0, 0).unwrap();
        let keyed = enc.build_repair_symbol().unwrap();
        assert!(!keyed.is_custom());
        assert!(keyed.to_packet().is_ok());
    }

    #[test]
    fn ids_stop_at_u32_max() {
        let mut enc = encoder(1, 4);
        enc.add_source_symbol_to_coding_window(&[3], u32::MAX).unwrap();
        assert_eq!(
            enc.add_source_symbol_to_coding_window(&[4], 0),
            Err(CodecError::IdOverflow {
                first: u32::MAX,
                count: 2
            })
        );
        let repair = enc.generate_repair_symbol(1, 0).unwrap();
        assert_eq!((repair.first_id, repair.last_id), (u32::MAX, u32::MAX));
        assert_eq!(repair.symbol.max_id(), Some(u32::MAX));
    }

    #[test]
    fn packet_payload_is_padded() {
        let mut enc = encoder(4, 2);
        enc.add_source_symbol_to_coding_window(&[0; 4], 0).unwrap();
        enc.set_coding_coefs_tab(vec![0]).unwrap();
        let repair = enc.build_repair_symbol().unwrap();
        assert!(repair.symbol.is_zero());
        assert_eq!(&repair.payload()[..], &[0; 4]);
        assert_eq!((repair.first_id, repair.last_id), (0, 0));

        enc.add_source_symbol_to_coding_window(&[1, 0, 0, 0], 1).unwrap();
        let pkt = enc.generate_repair_symbol(1, 0).unwrap().to_packet().unwrap();
        assert_eq!(pkt.payload.len(), 4);
        assert_eq!((pkt.first_id, pkt.last_id), (0, 1));
    }

    #[test]
    fn add_source_packet_mirrors_input() {
        let mut enc = encoder(2, 2);
        let (pkt, evicted) = enc.add_source_packet(&[7, 8], 3).unwrap();
        assert_eq!(pkt.id, 3);
        assert_eq!(&pkt.payload[..], &[7, 8]);
        assert_eq!(evicted, None);
    }
}
