//! # Symbol Set: Online Gaussian Elimination
//!
//! Rows are [`CodedSymbol`]s keyed by their pivot: the id of their leading
//! nonzero coefficient. Each insertion eliminates the new row against the
//! existing pivots, lowest id first, and either discards it (linearly
//! dependent) or registers it as a new pivot.
//!
//! After every insertion the set is in reduced row-echelon form:
//!
//! - every pivot row has leading coefficient 1;
//! - every pivot row has a zero coefficient at every *other* pivot id.
//!
//! The reduced form of a given row space is unique, so the final rows do not
//! depend on the order symbols were inserted in. A pivot row whose only
//! coefficient is its leading 1 is a decoded source symbol.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;
use tracing::trace;

use crate::coded::CodedSymbol;
use crate::error::CodecError;
use crate::gf256;
use crate::SymbolId;

/// Outcome of [`SymbolSet::add_with_elimination`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// The symbol was a combination of the existing rows and was dropped.
    Redundant,
    /// A new pivot row was registered.
    Pivot {
        pivot: SymbolId,
        /// Older pivot rows changed by back-substitution.
        updated: Vec<SymbolId>,
    },
}

impl Insertion {
    pub fn pivot(&self) -> Option<SymbolId> {
        match self {
            Insertion::Redundant => None,
            Insertion::Pivot { pivot, .. } => Some(*pivot),
        }
    }

    pub fn is_redundant(&self) -> bool {
        matches!(self, Insertion::Redundant)
    }

    /// The new pivot followed by every row it changed.
    pub fn changed_pivots(&self) -> Vec<SymbolId> {
        match self {
            Insertion::Redundant => Vec::new(),
            Insertion::Pivot { pivot, updated } => {
                let mut ids = Vec::with_capacity(updated.len() + 1);
                ids.push(*pivot);
                ids.extend_from_slice(updated);
                ids
            }
        }
    }
}

/// Widest dense export [`SymbolSet::get_matrix`] will build.
pub const MAX_MATRIX_WIDTH: usize = 1 << 16;

/// Dense export of the current rows, for external inspection tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenseMatrix {
    /// Source id of column 0.
    pub first_id: SymbolId,
    /// Number of columns.
    pub width: usize,
    /// Pivot id of each row, ascending.
    pub pivots: Vec<SymbolId>,
    pub coefs: Vec<Vec<u8>>,
    pub data: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolSet {
    pivots: BTreeMap<SymbolId, CodedSymbol>,
}

impl SymbolSet {
    pub fn new() -> Self {
        SymbolSet::default()
    }

    /// Insert `symbol`, eliminating it against the existing pivot rows.
    pub fn add_with_elimination(&mut self, symbol: &CodedSymbol) -> Result<Insertion, CodecError> {
        let mut row = symbol.clone();

        // Cancel the leading coefficient while it sits on an existing pivot.
        while let Some((id, lead)) = row.leading_coef() {
            let Some(pivot_row) = self.pivots.get(&id) else {
                break;
            };
            let c = gf256::div(lead, pivot_row.coef(id))?;
            row.add_scaled_assign(c, pivot_row);
        }

        let Some((pivot, lead)) = row.leading_coef() else {
            trace!(
                min_id = ?symbol.min_id(),
                max_id = ?symbol.max_id(),
                "redundant symbol discarded"
            );
            return Ok(Insertion::Redundant);
        };

        self.reduce_trailing(&mut row, pivot)?;
        if lead != 1 {
            row = row.scale_inv(lead)?;
        }
        let updated = self.back_substitute(&row, pivot);

        trace!(
            pivot,
            nb_coef = row.count_coefs(),
            updated = updated.len(),
            "pivot registered"
        );
        self.pivots.insert(pivot, row);
        Ok(Insertion::Pivot { pivot, updated })
    }

    /// Register `symbol` at its leading id as is, without elimination.
    ///
    /// The caller guarantees the row is already reduced against the set.
    pub fn add_as_pivot(&mut self, symbol: CodedSymbol) -> Result<SymbolId, CodecError> {
        let (pivot, _) = symbol.leading_coef().ok_or(CodecError::ZeroSymbol)?;
        if self.pivots.contains_key(&pivot) {
            return Err(CodecError::PivotOccupied(pivot));
        }
        self.pivots.insert(pivot, symbol);
        Ok(pivot)
    }

    pub fn get_pivot(&self, id: SymbolId) -> Option<&CodedSymbol> {
        self.pivots.get(&id)
    }

    pub fn remove_pivot(&mut self, id: SymbolId) -> Option<CodedSymbol> {
        self.pivots.remove(&id)
    }

    pub fn contains_pivot(&self, id: SymbolId) -> bool {
        self.pivots.contains_key(&id)
    }

    /// Number of pivot rows (the rank of the system).
    pub fn len(&self) -> usize {
        self.pivots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pivots.is_empty()
    }

    pub fn clear(&mut self) {
        self.pivots.clear();
    }

    pub fn pivot_ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.pivots.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &CodedSymbol)> + '_ {
        self.pivots.iter().map(|(id, row)| (*id, row))
    }

    /// Whether any row has a nonzero coefficient at `id`.
    pub fn involves(&self, id: SymbolId) -> bool {
        self.pivots.range(..=id).any(|(_, row)| row.coef(id) != 0)
    }

    /// Rows as a dense matrix over the union of their windows.
    ///
    /// Rows may sit far apart in id space, so the width is capped at
    /// [`MAX_MATRIX_WIDTH`] columns; wider systems fail with `MatrixTooWide`.
    pub fn get_matrix(&self) -> Result<DenseMatrix, CodecError> {
        let first_id = self
            .pivots
            .values()
            .filter_map(CodedSymbol::min_id)
            .min()
            .unwrap_or(0);
        let last_id = self
            .pivots
            .values()
            .filter_map(CodedSymbol::max_id)
            .max();
        let width = last_id.map_or(0, |last| u64::from(last - first_id) + 1);
        if width > MAX_MATRIX_WIDTH as u64 {
            return Err(CodecError::MatrixTooWide {
                width,
                limit: MAX_MATRIX_WIDTH,
            });
        }
        let width = width as usize;

        let mut matrix = DenseMatrix {
            first_id,
            width,
            pivots: Vec::with_capacity(self.pivots.len()),
            coefs: Vec::with_capacity(self.pivots.len()),
            data: Vec::with_capacity(self.pivots.len()),
        };
        for (&pivot, row) in &self.pivots {
            let dense = (0..width)
                .map(|col| row.coef(first_id + col as SymbolId))
                .collect();
            matrix.pivots.push(pivot);
            matrix.coefs.push(dense);
            matrix.data.push(row.data().to_vec());
        }
        Ok(matrix)
    }

    /// One line per pivot row.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (pivot, row) in &self.pivots {
            let _ = writeln!(out, "{pivot}: {row}");
        }
        out
    }

    // ─── Internals ──────────────────────────────────────────────────────

    /// Clear every coefficient of `row` after `pivot` that sits on another
    /// pivot id, in ascending id order.
    fn reduce_trailing(&self, row: &mut CodedSymbol, pivot: SymbolId) -> Result<(), CodecError> {
        let Some(mut cursor) = pivot.checked_add(1) else {
            return Ok(());
        };
        loop {
            let Some(last) = row.max_id() else {
                return Ok(());
            };
            if cursor > last {
                return Ok(());
            }
            let next = self
                .pivots
                .range(cursor..=last)
                .find(|(&id, _)| row.coef(id) != 0);
            let Some((&id, pivot_row)) = next else {
                return Ok(());
            };
            let c = gf256::div(row.coef(id), pivot_row.coef(id))?;
            row.add_scaled_assign(c, pivot_row);
            match id.checked_add(1) {
                Some(next_cursor) => cursor = next_cursor,
                None => return Ok(()),
            }
        }
    }

    /// Eliminate `pivot` from every older row, given `row` normalized with a
    /// leading 1 at `pivot`. Returns the ids of the rows that changed.
    fn back_substitute(&mut self, row: &CodedSymbol, pivot: SymbolId) -> Vec<SymbolId> {
        let mut updated = Vec::new();
        for (&id, other) in self.pivots.range_mut(..pivot) {
            let c = other.coef(pivot);
            if c != 0 {
                other.add_scaled_assign(c, row);
                updated.push(id);
            }
        }
        updated
    }
}
