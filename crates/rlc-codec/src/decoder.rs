//! # Sliding-Window RLC Decoder
//!
//! Every received unit becomes a row of a [`SymbolSet`]: source symbols as
//! the unit vector of their id, repair symbols with the coefficients the
//! encoder used (regenerated from the repair key). Whenever an insertion turns
//! a pivot row into an identity row, that source symbol is decoded and
//! reported to the caller.
//!
//! Each id moves `Unknown → Pending → Decoded` and never back, as long as it
//! stays within the linear-system bound.
//!
//! ## Linear-system bound
//!
//! With `max_linear_system_size = L` (by default four coding windows), only
//! the newest `L` ids are kept, so the rank never exceeds `L` on an endless
//! stream. Rows whose pivot falls behind that horizon are dropped (their pivot
//! ids can be collected with [`RlcDecoder::take_removed_ids`]), even when they
//! still mention newer ids, and later units touching ids behind it are
//! refused with [`CodecError::StaleSymbol`].

use bytes::Bytes;
use tracing::{debug, trace};

use crate::coded::CodedSymbol;
use crate::coefs::{generate_coding_coefficients, repair_seed};
use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::symbol_set::{Insertion, SymbolSet};
use crate::window::{CodingWindow, WindowInfo};
use crate::wire::{RepairPacket, SourcePacket};
use crate::SymbolId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolState {
    /// No row mentions the id.
    Unknown,
    /// Some row mentions the id but it is not solved yet.
    Pending,
    Decoded,
}

/// A source symbol made available by the last insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSymbol {
    pub id: SymbolId,
    pub data: Bytes,
    /// `false` when the symbol itself was just received, `true` when it was
    /// rebuilt from repair symbols.
    pub recovered: bool,
}

#[derive(Debug, Clone)]
pub struct RlcDecoder {
    set: SymbolSet,
    /// Ids seen so far, newest last. Its capacity is the horizon.
    window: CodingWindow<()>,
    symbol_size: usize,
    max_coding_window_size: usize,
    density_threshold: u8,
    removed: Vec<SymbolId>,
}

impl RlcDecoder {
    pub fn new(config: &CodecConfig) -> Self {
        RlcDecoder {
            set: SymbolSet::new(),
            window: CodingWindow::new(config.max_linear_system_size),
            symbol_size: config.symbol_size,
            max_coding_window_size: config.max_coding_window_size,
            density_threshold: config.density_threshold,
            removed: Vec::new(),
        }
    }

    // ─── Insertion ──────────────────────────────────────────────────────

    pub fn decode_with_new_source_symbol(
        &mut self,
        data: &[u8],
        id: SymbolId,
    ) -> Result<Vec<DecodedSymbol>, CodecError> {
        self.check_size(data.len())?;
        self.check_horizon(id)?;
        if self.is_decoded(id) {
            trace!(id, "source symbol already decoded");
            return Ok(Vec::new());
        }
        self.advance(id);
        let row = CodedSymbol::from_source_symbol(id, data);
        self.insert(&row, Some(id))
    }

    pub fn decode_with_new_repair_symbol(
        &mut self,
        payload: &[u8],
        key: u16,
        add_param: u16,
        first_id: SymbolId,
        last_id: SymbolId,
    ) -> Result<Vec<DecodedSymbol>, CodecError> {
        self.check_size(payload.len())?;
        let invalid = CodecError::InvalidWindow {
            first: first_id,
            last: last_id,
        };
        if first_id > last_id {
            return Err(invalid);
        }
        let span = (last_id - first_id) as usize + 1;
        if span > self.max_coding_window_size {
            return Err(invalid);
        }
        self.check_horizon(first_id)?;

        let coefs = generate_coding_coefficients(
            repair_seed(key, add_param),
            span,
            self.density_threshold,
        )?;
        let row = CodedSymbol::from_coefs_and_symbol(first_id, coefs, payload)?;
        self.advance(last_id);
        trace!(key, add_param, first_id, last_id, "repair symbol received");
        self.insert(&row, None)
    }

    /// Insert a repair symbol whose coefficients were chosen by the
    /// application (see [`RlcEncoder::set_coding_coefs_tab`]) and delivered
    /// out of band. `coefs[i]` applies to id `first_id + i`.
    ///
    /// [`RlcEncoder::set_coding_coefs_tab`]: crate::RlcEncoder::set_coding_coefs_tab
    pub fn decode_with_new_repair_symbol_and_coefs(
        &mut self,
        payload: &[u8],
        coefs: &[u8],
        first_id: SymbolId,
    ) -> Result<Vec<DecodedSymbol>, CodecError> {
        self.check_size(payload.len())?;
        if coefs.is_empty() || coefs.len() > self.max_coding_window_size {
            return Err(CodecError::CoefficientCountMismatch {
                expected: self.max_coding_window_size,
                got: coefs.len(),
            });
        }
        let last_id = first_id
            .checked_add((coefs.len() - 1) as SymbolId)
            .ok_or(CodecError::IdOverflow {
                first: first_id,
                count: coefs.len(),
            })?;
        self.check_horizon(first_id)?;

        let row = CodedSymbol::from_coefs_and_symbol(first_id, coefs, payload)?;
        self.advance(last_id);
        trace!(first_id, last_id, "custom repair symbol received");
        self.insert(&row, None)
    }

    pub fn decode_source_packet(
        &mut self,
        packet: &SourcePacket,
    ) -> Result<Vec<DecodedSymbol>, CodecError> {
        self.decode_with_new_source_symbol(&packet.payload, packet.id)
    }

    pub fn decode_repair_packet(
        &mut self,
        packet: &RepairPacket,
    ) -> Result<Vec<DecodedSymbol>, CodecError> {
        self.decode_with_new_repair_symbol(
            &packet.payload,
            packet.key,
            packet.add_param,
            packet.first_id,
            packet.last_id,
        )
    }

    // ─── Queries ────────────────────────────────────────────────────────

    pub fn symbol_state(&self, id: SymbolId) -> SymbolState {
        if self.is_decoded(id) {
            SymbolState::Decoded
        } else if self.set.involves(id) {
            SymbolState::Pending
        } else {
            SymbolState::Unknown
        }
    }

    pub fn is_decoded(&self, id: SymbolId) -> bool {
        self.decoded_symbol(id).is_some()
    }

    /// Payload of a decoded source symbol.
    pub fn decoded_symbol(&self, id: SymbolId) -> Option<&[u8]> {
        self.set
            .get_pivot(id)
            .filter(|row| row.decoded_id() == Some(id))
            .map(CodedSymbol::data)
    }

    pub fn decoded_count(&self) -> usize {
        self.set
            .iter()
            .filter(|(id, row)| row.decoded_id() == Some(*id))
            .count()
    }

    /// Rank of the linear system.
    pub fn rank(&self) -> usize {
        self.set.len()
    }

    /// Range of ids currently tracked.
    pub fn window_info(&self) -> Option<WindowInfo> {
        self.window.info()
    }

    /// Pivot ids dropped by the linear-system bound since the last call.
    pub fn take_removed_ids(&mut self) -> Vec<SymbolId> {
        std::mem::take(&mut self.removed)
    }

    pub fn symbol_set(&self) -> &SymbolSet {
        &self.set
    }

    pub fn symbol_size(&self) -> usize {
        self.symbol_size
    }

    // ─── Internals ──────────────────────────────────────────────────────

    fn check_size(&self, got: usize) -> Result<(), CodecError> {
        if got != self.symbol_size {
            return Err(CodecError::SizeMismatch {
                expected: self.symbol_size,
                got,
            });
        }
        Ok(())
    }

    fn check_horizon(&self, id: SymbolId) -> Result<(), CodecError> {
        // The horizon exists once the bound has been reached.
        if !self.window.is_full() {
            return Ok(());
        }
        match self.window.first_id() {
            Some(horizon) if id < horizon => Err(CodecError::StaleSymbol { id, horizon }),
            _ => Ok(()),
        }
    }

    /// Track `id` as seen and apply the linear-system bound.
    fn advance(&mut self, id: SymbolId) {
        let evicted = self.window.advance_to(id);
        if evicted.is_empty() {
            return;
        }
        let Some(horizon) = self.window.first_id() else {
            return;
        };
        let stale: Vec<SymbolId> = self
            .set
            .pivot_ids()
            .take_while(|&id| id < horizon)
            .collect();
        for id in &stale {
            self.set.remove_pivot(*id);
        }
        if !stale.is_empty() {
            debug!(
                horizon,
                removed = stale.len(),
                rank = self.set.len(),
                "linear system trimmed"
            );
            self.removed.extend(stale);
        }
    }

    fn insert(
        &mut self,
        row: &CodedSymbol,
        received: Option<SymbolId>,
    ) -> Result<Vec<DecodedSymbol>, CodecError> {
        let insertion = self.set.add_with_elimination(row)?;
        if let Insertion::Redundant = insertion {
            return Ok(Vec::new());
        }

        let mut decoded = Vec::new();
        for id in insertion.changed_pivots() {
            let Some(data) = self.decoded_symbol(id) else {
                continue;
            };
            let mut data = data.to_vec();
            data.resize(self.symbol_size, 0);
            decoded.push(DecodedSymbol {
                id,
                data: Bytes::from(data),
                recovered: received != Some(id),
            });
        }
        decoded.sort_by_key(|d| d.id);

        let recovered = decoded.iter().filter(|d| d.recovered).count();
        if recovered > 0 {
            debug!(
                recovered,
                rank = self.set.len(),
                "source symbols recovered"
            );
        }
        Ok(decoded)
    }
}
