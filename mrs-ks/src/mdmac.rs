//! The multi-degree Macaulay matrix: every base Kipnis-Shamir equation,
//! multiplied by every monomial within a per-group degree budget, expressed
//! over a single dense monomial basis shared across the whole matrix.
//!
//! The column space is every monomial of multi-degree `<= target`, indexed
//! by a mixed-radix composition of each group's own combinations-with-
//! repetition rank (`Mono::rank_in_group`) prefixed by a running total over
//! every smaller multi-degree class, visited in the same mixed-radix order
//! `MDeg::next` walks. This replaces the original's direct recursive
//! variable-by-variable descent with an equivalent two-stage scheme (locate
//! the degree class, then rank within it) that falls out naturally once
//! monomials are split by variable group up front.

use std::collections::HashMap;

use mrs_field::FieldScalar;
use mrs_poly::{GroupLayout, MDeg, Mono};
use mrs_sparse::{SparseRow, SparseRowSource};
use tracing::debug;

use crate::ks::KsSystem;
use crate::KsError;

#[derive(Clone, Debug)]
pub struct Mdmac<F> {
    ncol: u64,
    rows: Vec<SparseRow<F>>,
    target_mdeg: MDeg,
    group_sizes: Vec<u32>,
    layout: GroupLayout,
}

impl<F: FieldScalar> Mdmac<F> {
    pub fn ncol(&self) -> u64 {
        self.ncol
    }

    pub fn target_mdeg(&self) -> &MDeg {
        &self.target_mdeg
    }

    /// Builds a histogram of non-zero entry counts per column, restricted to
    /// `sample_rows`. Mirrors `mdmac_nznum`'s role of guiding which columns
    /// are worth keeping when a dense rank-selection subset is chosen.
    pub fn sample_col_nnz(&self, sample_rows: &[u64]) -> Vec<u64> {
        let mut counts = vec![0u64; self.ncol as usize];
        for &ridx in sample_rows {
            for (c, _) in self.row(ridx).iter() {
                counts[c as usize] += 1;
            }
        }
        counts
    }

    /// Walks every column, constant term first, in increasing multi-degree
    /// order.
    pub fn col_iter(&self) -> MDMacColIterator {
        self.col_iter_filtered(|_| true)
    }

    /// Walks every column whose multi-degree class is accepted by `filter`,
    /// skipping whole classes it rejects.
    pub fn col_iter_filtered(&self, filter: impl Fn(&MDeg) -> bool) -> MDMacColIterator {
        let idxs = filtered_column_indices(&self.target_mdeg, &self.group_sizes, &self.layout, &filter);
        MDMacColIterator::new(idxs)
    }
}

/// Degree-filtered column walk: locates the next multi-degree class the
/// filter accepts via `MDeg::next`, then enumerates every column within that
/// class before moving to the next one. Column indices within a class come
/// out in the same order `column_index` assigns them, so this visits every
/// accepted column exactly once and in ascending order overall.
pub struct MDMacColIterator {
    idxs: std::vec::IntoIter<u64>,
    cur: Option<u64>,
    exhausted: bool,
}

impl MDMacColIterator {
    fn new(idxs: Vec<u64>) -> Self {
        MDMacColIterator {
            idxs: idxs.into_iter(),
            cur: None,
            exhausted: false,
        }
    }

    /// Resets to and returns the first column, if any.
    pub fn begin(&mut self) -> Option<u64> {
        self.next()
    }

    /// True once every accepted column has been visited.
    pub fn end(&self) -> bool {
        self.exhausted
    }

    /// The most recently visited column index.
    pub fn idx(&self) -> Option<u64> {
        self.cur
    }
}

impl Iterator for MDMacColIterator {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.cur = self.idxs.next();
        if self.cur.is_none() {
            self.exhausted = true;
        }
        self.cur
    }
}

fn filtered_column_indices(
    target: &MDeg,
    group_sizes: &[u32],
    layout: &GroupLayout,
    filter: &dyn Fn(&MDeg) -> bool,
) -> Vec<u64> {
    let offsets = build_offsets(target, group_sizes);
    let mut idxs = Vec::new();
    let mut cur = MDeg::zero(target.num_groups());
    loop {
        if filter(&cur) {
            for mono in monomials_of_exact_mdeg(&cur, group_sizes, layout) {
                if let Some(idx) = column_index(&mono, group_sizes, &offsets) {
                    idxs.push(idx);
                }
            }
        }
        if !cur.next(target) {
            break;
        }
    }
    idxs
}

impl<F: FieldScalar> SparseRowSource<F> for Mdmac<F> {
    fn nrow(&self) -> u64 {
        self.rows.len() as u64
    }

    fn row(&self, idx: u64) -> &SparseRow<F> {
        &self.rows[idx as usize]
    }
}

pub struct MdmacBuilder;

impl MdmacBuilder {
    /// Builds the matrix for a single multi-degree target.
    pub fn build<F: FieldScalar>(ks: &KsSystem<F>, target_mdeg: MDeg) -> Result<Mdmac<F>, KsError> {
        Self::from_combined_degrees(ks, &[target_mdeg])
    }

    /// Builds the matrix for the union of several multi-degree targets: the
    /// column space is sized to the component-wise maximum of `targets` (a
    /// superset of the minimal union of monomials actually touched, which
    /// only costs a handful of unused columns and keeps the indexing scheme
    /// a single shared offset table), and every target contributes its own
    /// rows independently.
    pub fn from_combined_degrees<F: FieldScalar>(ks: &KsSystem<F>, targets: &[MDeg]) -> Result<Mdmac<F>, KsError> {
        for t in targets {
            if t.degs().iter().any(|&d| d < 1) {
                return Err(KsError::DegreeTooSmall(t.degs().to_vec()));
            }
        }
        let group_sizes = ks.group_sizes();
        let layout = *ks.layout();
        let num_groups = layout.num_groups();

        let union = union_mdeg(targets, num_groups);
        let offsets = build_offsets(&union, &group_sizes);
        let ncol = union.total_mono_num(&group_sizes);

        debug!(ncol, targets = targets.len(), "building multi-degree Macaulay matrix");

        let mut rows = Vec::new();
        for target in targets {
            for g in 0..ks.c() {
                let mut mult_bound = target.clone();
                mult_bound.dec(0);
                mult_bound.dec(g + 1);

                let mut d = MDeg::zero(num_groups);
                loop {
                    let multipliers = monomials_of_exact_mdeg(&d, &group_sizes, &layout);
                    for mul in &multipliers {
                        for eq in ks.rows(g) {
                            rows.push(build_row(eq, mul, &group_sizes, &offsets));
                        }
                    }
                    if !d.next(&mult_bound) {
                        break;
                    }
                }
            }
        }

        Ok(Mdmac {
            ncol,
            rows,
            target_mdeg: union,
            group_sizes,
            layout,
        })
    }
}

fn build_row<F: FieldScalar>(
    eq: &[(Mono, F)],
    mul: &Mono,
    group_sizes: &[u32],
    offsets: &HashMap<Vec<u32>, u64>,
) -> SparseRow<F> {
    let mut cols: Vec<(u32, F)> = Vec::with_capacity(eq.len());
    for (term, coeff) in eq {
        let mut combined_vars = mul.vars().to_vec();
        combined_vars.extend_from_slice(term.vars());
        let combined = Mono::from_vars(combined_vars);
        if let Some(col) = column_index(&combined, group_sizes, offsets) {
            cols.push((col as u32, *coeff));
        }
    }
    cols.sort_unstable_by_key(|&(c, _)| c);
    let mut row = SparseRow::with_capacity(cols.len());
    for (c, v) in cols {
        row.push(c, v);
    }
    row
}

/// Global column index of `mono`: split its variables by group, look up the
/// running total for every smaller multi-degree class, then add this
/// monomial's rank within its own class (a mixed-radix composition of each
/// group's own combination rank).
fn column_index(mono: &Mono, group_sizes: &[u32], offsets: &HashMap<Vec<u32>, u64>) -> Option<u64> {
    let num_groups = group_sizes.len();
    let mut buckets: Vec<Vec<u32>> = vec![Vec::new(); num_groups];
    let k = group_sizes[0];
    let r = if num_groups > 1 { group_sizes[1] } else { 1 };
    for &v in mono.vars() {
        if v < k {
            buckets[0].push(v);
        } else {
            let g = 1 + (v - k) / r;
            let local = (v - k) % r;
            buckets[g as usize].push(local);
        }
    }

    let degs: Vec<u32> = buckets.iter().map(|b| b.len() as u32).collect();
    let offset = *offsets.get(&degs)?;

    let mut rank = 0u64;
    for (g, bucket) in buckets.iter().enumerate() {
        let n = group_sizes[g];
        let d = degs[g];
        let n_g = if d == 0 {
            1
        } else {
            mrs_util::binom((n as u64 + d as u64).saturating_sub(1), d as u64)
        };
        let rank_g = Mono::rank_in_group(bucket, n);
        rank = rank * n_g + rank_g;
    }

    Some(offset + rank)
}

/// Every monomial with multi-degree exactly `d`, as a combined `Mono` over
/// the full variable space: one group-local combination-with-repetition
/// draw per group, Cartesian-producted together.
fn monomials_of_exact_mdeg(d: &MDeg, group_sizes: &[u32], layout: &GroupLayout) -> Vec<Mono> {
    let mut acc: Vec<Vec<u32>> = vec![Vec::new()];
    for g in 0..d.num_groups() {
        let deg = d.deg(g);
        let nvars = group_sizes[g as usize];
        let offset = layout.group_offset(g);
        let n_g = if deg == 0 {
            1
        } else {
            mrs_util::binom((nvars as u64 + deg as u64).saturating_sub(1), deg as u64)
        };
        let locals: Vec<Vec<u32>> = if deg == 0 {
            vec![Vec::new()]
        } else {
            (0..n_g).map(|rank| Mono::unrank_in_group(rank, deg, nvars)).collect()
        };

        let mut next_acc = Vec::with_capacity(acc.len() * locals.len());
        for prefix in &acc {
            for local in &locals {
                let mut combined = prefix.clone();
                combined.extend(local.iter().map(|&x| x + offset));
                next_acc.push(combined);
            }
        }
        acc = next_acc;
    }
    acc.into_iter().map(Mono::from_vars).collect()
}

fn union_mdeg(targets: &[MDeg], num_groups: u32) -> MDeg {
    let mut degs = vec![0u32; num_groups as usize];
    for t in targets {
        for g in 0..num_groups {
            degs[g as usize] = degs[g as usize].max(t.deg(g));
        }
    }
    MDeg::new(degs)
}

fn build_offsets(union: &MDeg, group_sizes: &[u32]) -> HashMap<Vec<u32>, u64> {
    let mut offsets = HashMap::new();
    let mut acc = 0u64;
    let mut cur = MDeg::zero(union.num_groups());
    loop {
        offsets.insert(cur.degs().to_vec(), acc);
        acc += cur.mono_num(group_sizes);
        if !cur.next(union) {
            break;
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minrank::MinRank;
    use mrs_field::Gf16;
    use rand::SeedableRng;

    #[test]
    fn ncol_matches_total_mono_num_of_target() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        let matrices: Vec<mrs_matrix::Gfm<Gf16>> = (0..2).map(|_| mrs_matrix::Gfm::rand(3, 4, &mut rng)).collect();
        let mr = MinRank::new(3, 4, 1, None, matrices);
        let ks = mr.ks_equations(1, 2).unwrap();

        let target = MDeg::new(vec![2, 2, 2]);
        let mdmac = MdmacBuilder::build(&ks, target.clone()).unwrap();
        assert_eq!(mdmac.ncol(), target.total_mono_num(&ks.group_sizes()));
    }

    #[test]
    fn every_row_has_columns_within_bounds() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(4);
        let matrices: Vec<mrs_matrix::Gfm<Gf16>> = (0..2).map(|_| mrs_matrix::Gfm::rand(3, 4, &mut rng)).collect();
        let mr = MinRank::new(3, 4, 1, None, matrices);
        let ks = mr.ks_equations(1, 2).unwrap();

        let target = MDeg::new(vec![2, 2, 2]);
        let mdmac = MdmacBuilder::build(&ks, target).unwrap();
        for ridx in 0..mdmac.nrow() {
            for (c, _) in mdmac.row(ridx).iter() {
                assert!((c as u64) < mdmac.ncol());
            }
        }
    }

    #[test]
    fn col_iter_visits_every_column_exactly_once() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(8);
        let matrices: Vec<mrs_matrix::Gfm<Gf16>> = (0..2).map(|_| mrs_matrix::Gfm::rand(3, 4, &mut rng)).collect();
        let mr = MinRank::new(3, 4, 1, None, matrices);
        let ks = mr.ks_equations(1, 2).unwrap();

        let target = MDeg::new(vec![2, 2, 2]);
        let mdmac = MdmacBuilder::build(&ks, target).unwrap();

        let mut visited: Vec<u64> = mdmac.col_iter().collect();
        visited.sort_unstable();
        let expected: Vec<u64> = (0..mdmac.ncol()).collect();
        assert_eq!(visited, expected);
    }

    #[test]
    fn col_iter_filtered_drops_the_top_degree_class() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(9);
        let matrices: Vec<mrs_matrix::Gfm<Gf16>> = (0..2).map(|_| mrs_matrix::Gfm::rand(3, 4, &mut rng)).collect();
        let mr = MinRank::new(3, 4, 1, None, matrices);
        let ks = mr.ks_equations(1, 2).unwrap();

        let target = MDeg::new(vec![2, 2, 2]);
        let mdmac = MdmacBuilder::build(&ks, target.clone()).unwrap();

        let max_total_deg = target.total_deg();
        let filtered: Vec<u64> = mdmac.col_iter_filtered(|d| d.total_deg() < max_total_deg).collect();
        assert!(filtered.len() < mdmac.ncol() as usize);

        let mut seen = std::collections::HashSet::new();
        for idx in &filtered {
            assert!(seen.insert(*idx), "column {idx} visited twice");
        }
    }

    #[test]
    fn combined_degrees_is_at_least_as_large_as_any_single_target() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(6);
        let matrices: Vec<mrs_matrix::Gfm<Gf16>> = (0..2).map(|_| mrs_matrix::Gfm::rand(2, 3, &mut rng)).collect();
        let mr = MinRank::new(2, 3, 1, None, matrices);
        let ks = mr.ks_equations(1, 1).unwrap();

        let t1 = MDeg::new(vec![2, 1]);
        let t2 = MDeg::new(vec![1, 2]);
        let combined = MdmacBuilder::from_combined_degrees(&ks, &[t1.clone(), t2.clone()]).unwrap();
        let single1 = MdmacBuilder::build(&ks, t1).unwrap();
        let single2 = MdmacBuilder::build(&ks, t2).unwrap();
        assert!(combined.ncol() >= single1.ncol());
        assert!(combined.ncol() >= single2.ncol());
        assert_eq!(combined.nrow(), single1.nrow() + single2.nrow());
    }
}
