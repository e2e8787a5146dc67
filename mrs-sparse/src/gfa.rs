//! `SparseRow`: a packed, ascending-index sparse entry list — the Rust
//! counterpart of the original `GFA` container. Where the original packs
//! an index and a scalar into a single 32- or 64-bit word inside a
//! caller-managed arena (to keep a whole matrix's sparse rows in one
//! allocation), a plain `Vec` of `(u32, F)` pairs is used here: the
//! indices the workspace deals in fit comfortably in 32 bits, and a single
//! arena buys nothing in safe Rust that the allocator doesn't already give
//! us.

use mrs_field::FieldScalar;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SparseRow<F> {
    entries: Vec<(u32, F)>,
}

impl<F: FieldScalar> SparseRow<F> {
    pub fn with_capacity(cap: usize) -> Self {
        SparseRow {
            entries: Vec::with_capacity(cap),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends `(idx, v)`. Callers are responsible for keeping indices
    /// strictly ascending across a row, matching the invariant every
    /// sparse-matrix builder here relies on for fast lookups and for the
    /// two-pointer merges used during column/row selection.
    pub fn push(&mut self, idx: u32, v: F) {
        debug_assert!(
            self.entries.last().map(|&(last, _)| last < idx).unwrap_or(true),
            "SparseRow entries must be appended in strictly ascending index order"
        );
        self.entries.push((idx, v));
    }

    pub fn at(&self, i: usize) -> (u32, F) {
        self.entries[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, F)> + '_ {
        self.entries.iter().copied()
    }

    /// Linear scan that exploits ascending order to bail out early.
    pub fn get(&self, idx: u32) -> F {
        for &(i, v) in &self.entries {
            if i == idx {
                return v;
            }
            if i > idx {
                break;
            }
        }
        F::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrs_field::Gf16;

    #[test]
    fn get_returns_zero_for_absent_index() {
        let mut row: SparseRow<Gf16> = SparseRow::with_capacity(2);
        row.push(3, Gf16::from_u8(5));
        row.push(9, Gf16::from_u8(2));
        assert_eq!(row.get(3), Gf16::from_u8(5));
        assert_eq!(row.get(9), Gf16::from_u8(2));
        assert_eq!(row.get(4), Gf16::ZERO);
        assert_eq!(row.get(100), Gf16::ZERO);
    }
}
