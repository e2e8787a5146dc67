//! Column-major sparse matrix: each column holds the rows (remapped into
//! the sampled-row subset) where it has a non-zero entry.

use mrs_field::{FieldScalar, Gf16};
use mrs_matrix::{RmGf16, RowGf16};
use mrs_maybe_rayon::prelude::*;
use rand::Rng;
use std::collections::HashMap;

use crate::gfa::SparseRow;
use crate::{SparseError, SparseRowSource};

#[derive(Clone, Debug)]
pub struct CmsmGeneric<F> {
    rnum: u64,
    cnum: u64,
    columns: Vec<SparseRow<F>>,
}

impl<F: FieldScalar> CmsmGeneric<F> {
    /// Builds a `CmsmGeneric` from a subset of `source`'s columns
    /// (`col_idxs`, ascending, the original full-matrix indices) and a
    /// random sample of `nrow` of its rows, drawn via Floyd's algorithm.
    ///
    /// Mirrors `cmsm_generic_from_mdmac`: a reverse map from full column
    /// index to local column index is built once, then every sampled row
    /// is walked and its matching entries appended to their column,
    /// picking up the sampled-row index (`0..nrow`) as the new row index.
    pub fn from_source(
        source: &impl SparseRowSource<F>,
        col_idxs: &[u64],
        nrow: u64,
        rng: &mut impl Rng,
    ) -> Result<Self, SparseError> {
        if col_idxs.is_empty() {
            return Err(SparseError::EmptyColumnSelection);
        }

        let rmap: HashMap<u64, u32> = col_idxs
            .iter()
            .enumerate()
            .map(|(local, &full)| (full, local as u32))
            .collect();

        let mut columns: Vec<SparseRow<F>> = (0..col_idxs.len())
            .map(|_| SparseRow::with_capacity(8))
            .collect();

        mrs_util::iter_random_rows(source.nrow(), nrow, rng, |sample_num, ridx| {
            let row = source.row(ridx);
            for (cidx, v) in row.iter() {
                if let Some(&local) = rmap.get(&(cidx as u64)) {
                    columns[local as usize].push(sample_num as u32, v);
                }
            }
        })?;

        Ok(CmsmGeneric {
            rnum: nrow,
            cnum: col_idxs.len() as u64,
            columns,
        })
    }

    /// Builds a `CmsmGeneric` directly from a dense matrix, counting
    /// non-zero entries column by column. Has no counterpart among the
    /// primary solve-path operations; kept for property tests that check
    /// sparse/dense multiplication agreement, the same role
    /// `cmsm_generic_from_gf_arr` plays in the original.
    pub fn from_dense(dense: &mrs_matrix::Gfm<F>) -> Self {
        let rnum = dense.nrow() as u64;
        let cnum = dense.ncol() as u64;
        let mut columns = vec![SparseRow::with_capacity(4); cnum as usize];
        for ri in 0..dense.nrow() {
            for ci in 0..dense.ncol() {
                let v = dense.at(ri, ci);
                if v != F::ZERO {
                    columns[ci].push(ri as u32, v);
                }
            }
        }
        CmsmGeneric { rnum, cnum, columns }
    }

    pub fn rnum(&self) -> u64 {
        self.rnum
    }

    pub fn cnum(&self) -> u64 {
        self.cnum
    }

    pub fn col(&self, i: u64) -> &SparseRow<F> {
        &self.columns[i as usize]
    }

    pub fn at(&self, ri: u64, ci: u64) -> F {
        self.columns[ci as usize].get(ri as u32)
    }
}

impl CmsmGeneric<Gf16> {
    /// `res = m * v` (direct multiplication): each column's entries scale
    /// `v`'s row at that column and fan out into the corresponding rows of
    /// `res`.
    pub fn mul_rm(&self, res: &mut RmGf16, v: &RmGf16) {
        debug_assert_eq!(self.rnum() as usize, res.rnum());
        debug_assert_eq!(self.cnum() as usize, v.rnum());
        res.zero_out();
        for ci in 0..self.cnum() {
            let col = self.col(ci);
            let v_row = *v.row(ci as usize);
            let entries: Vec<(u32, Gf16)> = col.iter().collect();
            let head = entries.len() & !1;
            let mut j = 0;
            while j < head {
                let (r0, c0) = entries[j];
                let (r1, c1) = entries[j + 1];
                let (a, b) = two_rows_mut(res, r0 as usize, r1 as usize);
                mrs_matrix::fmaddi_scalar_2x1(a, b, &v_row, c0, c1);
                j += 2;
            }
            if j < entries.len() {
                let (r, c) = entries[j];
                res.row_mut(r as usize).fmaddi_scalar(&v_row, c);
            }
        }
    }

    /// `res = m^T * v` (transpose multiplication): each column produces one
    /// output row by summing its entries' source rows of `v`, scaled.
    pub fn tr_mul_rm(&self, res: &mut RmGf16, v: &RmGf16) {
        debug_assert_eq!(self.cnum() as usize, res.rnum());
        debug_assert_eq!(self.rnum() as usize, v.rnum());
        for ci in 0..self.cnum() {
            let col = self.col(ci);
            let dst = res.row_mut(ci as usize);
            *dst = RowGf16::zero();
            let entries: Vec<(u32, Gf16)> = col.iter().collect();
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
    }

    /// Parallel transpose multiplication: each output row is produced by a
    /// distinct column, so strips of columns can be handed to independent
    /// workers with no reduction step, the way `cmsm_gf16_tr_mul_rm_parallel`
    /// splits by output row.
    pub fn tr_mul_rm_parallel(&self, res: &mut RmGf16, v: &RmGf16) {
        debug_assert_eq!(self.cnum() as usize, res.rnum());
        let cnum = self.cnum() as usize;
        let rows: Vec<RowGf16> = (0..cnum)
            .into_par_iter()
            .map(|ci| {
                let col = self.col(ci as u64);
                let mut dst = RowGf16::zero();
                for (r, c) in col.iter() {
                    dst.fmaddi_scalar(v.row(r as usize), c);
                }
                dst
            })
            .collect();
        for (i, row) in rows.into_iter().enumerate() {
            *res.row_mut(i) = row;
        }
    }

    /// Parallel direct multiplication: columns are split into strips, each
    /// worker accumulates into its own zeroed partial result, and the
    /// partials are merged with `fold`/`reduce` — the same worker-strip
    /// partial-then-merge shape as the mutex-guarded C version, expressed
    /// with `rayon`'s combinators (as `p3_interpolation`'s
    /// `interpolate_coset` already does for its own row-sum reduction)
    /// instead of a manual lock.
    pub fn mul_rm_parallel(&self, res: &mut RmGf16, v: &RmGf16) {
        debug_assert_eq!(self.rnum() as usize, res.rnum());
        let rnum = self.rnum() as usize;
        let cnum = self.cnum();

        let sum_partials = |mut a: RmGf16, b: RmGf16| {
            a.add_in_place(&b);
            a
        };

        let merged = (0..cnum)
            .into_par_iter()
            .fold(
                || RmGf16::zero(rnum),
                |mut partial, ci| {
                    let col = self.col(ci);
                    let v_row = *v.row(ci as usize);
                    for (r, c) in col.iter() {
                        partial.row_mut(r as usize).fmaddi_scalar(&v_row, c);
                    }
                    partial
                },
            )
            .reduce(|| RmGf16::zero(rnum), sum_partials);

        *res = merged;
    }
}

/// Borrow two distinct rows of `m` mutably at once.
fn two_rows_mut(m: &mut RmGf16, i: usize, j: usize) -> (&mut RowGf16, &mut RowGf16) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = m.rows_split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = m.rows_split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrs_matrix::Gfm;
    use rand::SeedableRng;

    #[test]
    fn direct_mul_matches_dense_reference() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let dense: Gfm<Gf16> = Gfm::rand(20, 13, &mut rng);
        let cmsm = CmsmGeneric::from_dense(&dense);
        let v = RmGf16::rand(13, &mut rng);

        let mut res = RmGf16::zero(20);
        cmsm.mul_rm(&mut res, &v);

        for ri in 0..20 {
            let mut expected = [Gf16::ZERO; mrs_matrix::BLOCK_WIDTH];
            for ci in 0..13 {
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
    fn transpose_mul_matches_direct_mul_of_dense_transpose() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let dense: Gfm<Gf16> = Gfm::rand(9, 17, &mut rng);
        let cmsm = CmsmGeneric::from_dense(&dense);
        let v = RmGf16::rand(9, &mut rng);

        let mut res = RmGf16::zero(17);
        cmsm.tr_mul_rm(&mut res, &v);

        for ci in 0..17 {
            let mut expected = [Gf16::ZERO; mrs_matrix::BLOCK_WIDTH];
            for ri in 0..9 {
                let coeff = dense.at(ri, ci);
                let v_row = v.row(ri).to_entries();
                for (e, &x) in expected.iter_mut().zip(v_row.iter()) {
                    *e = e.add(x.mul(coeff));
                }
            }
            assert_eq!(res.row(ci).to_entries(), expected);
        }
    }

    #[test]
    fn parallel_direct_mul_agrees_with_serial() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(13);
        let dense: Gfm<Gf16> = Gfm::rand(30, 22, &mut rng);
        let cmsm = CmsmGeneric::from_dense(&dense);
        let v = RmGf16::rand(22, &mut rng);

        let mut serial = RmGf16::zero(30);
        cmsm.mul_rm(&mut serial, &v);
        let mut parallel = RmGf16::zero(30);
        cmsm.mul_rm_parallel(&mut parallel, &v);
        assert_eq!(serial, parallel);
    }

    #[test]
    fn parallel_transpose_mul_agrees_with_serial() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(17);
        let dense: Gfm<Gf16> = Gfm::rand(14, 26, &mut rng);
        let cmsm = CmsmGeneric::from_dense(&dense);
        let v = RmGf16::rand(14, &mut rng);

        let mut serial = RmGf16::zero(26);
        cmsm.tr_mul_rm(&mut serial, &v);
        let mut parallel = RmGf16::zero(26);
        cmsm.tr_mul_rm_parallel(&mut parallel, &v);
        assert_eq!(serial, parallel);
    }
}
