//! Row-major sparse matrix: every row of the source matrix is kept, but
//! columns are restricted to a selected subset.

use mrs_field::{FieldScalar, Gf16};
use mrs_matrix::{RmGf16, RowGf16};
use mrs_maybe_rayon::prelude::*;

use crate::gfa::SparseRow;
use crate::{SparseError, SparseRowSource};

#[derive(Clone, Debug)]
pub struct RmsmGeneric<F> {
    rnum: u64,
    cnum: u64,
    rows: Vec<SparseRow<F>>,
}

impl<F: FieldScalar> RmsmGeneric<F> {
    /// Builds an `RmsmGeneric` keeping every row of `source` but only the
    /// columns named in `col_idxs` (ascending, full-matrix indices),
    /// remapped to their position in the selection. Mirrors
    /// `rmsm_generic_from_mdmac`'s two-pointer merge of a row's entries
    /// against the sorted column selection.
    pub fn from_source(source: &impl SparseRowSource<F>, col_idxs: &[u64]) -> Result<Self, SparseError> {
        if col_idxs.is_empty() {
            return Err(SparseError::EmptyColumnSelection);
        }

        let rnum = source.nrow();
        let mut rows = Vec::with_capacity(rnum as usize);
        for ridx in 0..rnum {
            let src_row = source.row(ridx);
            let mut out = SparseRow::with_capacity(4);
            let mut mapped_idx = 0usize;
            let mut next_cidx = col_idxs[0];
            let mut i = 0usize;
            while i < src_row.len() {
                let (idx, v) = src_row.at(i);
                let idx = idx as u64;
                if idx < next_cidx {
                    i += 1;
                    continue;
                }
                if idx == next_cidx {
                    out.push(mapped_idx as u32, v);
                    i += 1;
                }
                if mapped_idx + 1 >= col_idxs.len() {
                    break;
                }
                mapped_idx += 1;
                next_cidx = col_idxs[mapped_idx];
            }
            rows.push(out);
        }

        Ok(RmsmGeneric {
            rnum,
            cnum: col_idxs.len() as u64,
            rows,
        })
    }

    pub fn rnum(&self) -> u64 {
        self.rnum
    }

    pub fn cnum(&self) -> u64 {
        self.cnum
    }

    pub fn row(&self, i: u64) -> &SparseRow<F> {
        &self.rows[i as usize]
    }

    pub fn at(&self, ri: u64, ci: u64) -> F {
        self.row(ri).get(ci as u32)
    }
}

impl RmsmGeneric<Gf16> {
    /// `res = m * v`, walking each row's own entries independently.
    pub fn mul_rm(&self, res: &mut RmGf16, v: &RmGf16) {
        debug_assert_eq!(self.rnum() as usize, res.rnum());
        debug_assert_eq!(self.cnum() as usize, v.rnum());
        res.zero_out();
        for ri in 0..self.rnum() {
            let row = self.row(ri);
            let dst = res.row_mut(ri as usize);
            accumulate_row(dst, row, v);
        }
    }

    /// Parallel direct multiplication: rows are split into contiguous
    /// strips, one per worker; since each worker writes a disjoint set of
    /// output rows, no reduction step is needed, matching
    /// `rmsm_gf16_mul_rm_parallel`'s row-strip split.
    pub fn mul_rm_parallel(&self, res: &mut RmGf16, v: &RmGf16) {
        debug_assert_eq!(self.rnum() as usize, res.rnum());
        debug_assert_eq!(self.cnum() as usize, v.rnum());
        let rnum = self.rnum() as usize;
        let rows: Vec<RowGf16> = (0..rnum)
            .into_par_iter()
            .map(|ri| {
                let mut dst = RowGf16::zero();
                accumulate_row(&mut dst, self.row(ri as u64), v);
                dst
            })
            .collect();
        for (i, row) in rows.into_iter().enumerate() {
            *res.row_mut(i) = row;
        }
    }
}

fn accumulate_row(dst: &mut RowGf16, row: &SparseRow<Gf16>, v: &RmGf16) {
    let entries: Vec<(u32, Gf16)> = row.iter().collect();
    let head = entries.len() & !1;
    let mut j = 0;
    while j < head {
        let (r0, c0) = entries[j];
        let (r1, c1) = entries[j + 1];
        mrs_matrix::fmaddi_scalar_1x2(dst, v.row(r0 as usize), v.row(r1 as usize), c0, c1);
        j += 2;
    }
    if j < entries.len() {
        let (r, c) = entries[j];
        dst.fmaddi_scalar(v.row(r as usize), c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrs_matrix::Gfm;
    use rand::SeedableRng;

    struct DenseSource<'a>(&'a Gfm<Gf16>, Vec<SparseRow<Gf16>>);

    impl<'a> DenseSource<'a> {
        fn new(m: &'a Gfm<Gf16>) -> Self {
            let mut rows = Vec::with_capacity(m.nrow());
            for ri in 0..m.nrow() {
                let mut row = SparseRow::with_capacity(m.ncol());
                for ci in 0..m.ncol() {
                    let v = m.at(ri, ci);
                    if v != Gf16::ZERO {
                        row.push(ci as u32, v);
                    }
                }
                rows.push(row);
            }
            DenseSource(m, rows)
        }
    }

    impl<'a> SparseRowSource<Gf16> for DenseSource<'a> {
        fn nrow(&self) -> u64 {
            self.0.nrow() as u64
        }

        fn row(&self, idx: u64) -> &SparseRow<Gf16> {
            &self.1[idx as usize]
        }
    }

    #[test]
    fn selecting_every_column_matches_dense_multiply() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let dense: Gfm<Gf16> = Gfm::rand(12, 9, &mut rng);
        let source = DenseSource::new(&dense);
        let col_idxs: Vec<u64> = (0..9).collect();
        let rmsm = RmsmGeneric::from_source(&source, &col_idxs).unwrap();

        let v = RmGf16::rand(9, &mut rng);
        let mut res = RmGf16::zero(12);
        rmsm.mul_rm(&mut res, &v);

        for ri in 0..12 {
            let mut expected = [Gf16::ZERO; mrs_matrix::BLOCK_WIDTH];
            for ci in 0..9 {
                let coeff = dense.at(ri, ci);
                let v_row = v.row(ci).to_entries();
                for (e, &x) in expected.iter_mut().zip(v_row.iter()) {
                    *e = e.add(x.mul(coeff));
                }
            }
            assert_eq!(res.row(ri).to_entries(), expected);
        }
    }

    #[test]
    fn parallel_matches_serial() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        let dense: Gfm<Gf16> = Gfm::rand(40, 15, &mut rng);
        let source = DenseSource::new(&dense);
        let col_idxs: Vec<u64> = (0..15).collect();
        let rmsm = RmsmGeneric::from_source(&source, &col_idxs).unwrap();
        let v = RmGf16::rand(15, &mut rng);

        let mut serial = RmGf16::zero(40);
        rmsm.mul_rm(&mut serial, &v);
        let mut parallel = RmGf16::zero(40);
        rmsm.mul_rm_parallel(&mut parallel, &v);
        assert_eq!(serial, parallel);
    }
}
