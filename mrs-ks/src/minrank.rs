//! A MinRank instance: `nmat` matrices `M_1..M_nmat` (and an optional
//! inhomogeneous term `M_0`), all `nrow x ncol`, for which a rank-`rank`
//! linear combination `M_0 + sum lambda_i M_i` is sought.

use mrs_field::FieldScalar;
use mrs_poly::{GroupLayout, Mono};
use tracing::debug;

use crate::ks::{KsRow, KsSystem};
use crate::KsError;

#[derive(Clone, Debug)]
pub struct MinRank<F> {
    nrow: usize,
    ncol: usize,
    rank: u32,
    m0: Option<mrs_matrix::Gfm<F>>,
    matrices: Vec<mrs_matrix::Gfm<F>>,
}

impl<F: FieldScalar> MinRank<F> {
    pub fn new(nrow: usize, ncol: usize, rank: u32, m0: Option<mrs_matrix::Gfm<F>>, matrices: Vec<mrs_matrix::Gfm<F>>) -> Self {
        for m in m0.iter().chain(matrices.iter()) {
            assert_eq!(m.nrow(), nrow);
            assert_eq!(m.ncol(), ncol);
        }
        MinRank {
            nrow,
            ncol,
            rank,
            m0,
            matrices,
        }
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn nmat(&self) -> u32 {
        self.matrices.len() as u32
    }

    pub fn matrix(&self, i: u32) -> &mrs_matrix::Gfm<F> {
        &self.matrices[i as usize]
    }

    pub fn has_m0(&self) -> bool {
        self.m0.is_some()
    }

    fn m0_at(&self, ri: usize, ci: usize) -> F {
        self.m0.as_ref().map(|m| m.at(ri, ci)).unwrap_or(F::ZERO)
    }

    /// The sum of every matrix's entry count, weighted by non-zero
    /// membership, as a rough structural fingerprint used when reporting
    /// instance statistics (column/row counts, density) to the user.
    pub fn sum_cnz(&self) -> usize {
        self.m0.iter().chain(self.matrices.iter()).map(|m| m.cnz()).sum()
    }

    /// Builds the base Kipnis-Shamir bilinear system for a guessed kernel
    /// rank `r`, independently repeated for `c` guessed kernel-basis
    /// columns: `c` groups of exactly `ncol` equations each (one per column
    /// position), mirroring `minrank_ks_nrow(mr,c) = c * minrank_ncol(mr)`.
    ///
    /// Group `g` plays the role of the `g`-th row of the `c x n`
    /// gauge-fixed identity-block left multiplier: its equations are read
    /// off row `g` of `M_0`/`M_l` directly (the "upper part of `I_{n-r}`"
    /// contribution), one per column `old_ci`. The kernel cross-terms pair
    /// this group's own `r` kernel variables against row `nrow - r + j` of
    /// the same column `old_ci` — the rows the guessed kernel basis's
    /// trailing `r x r` identity block multiplies against — not a
    /// column-shifted position.
    pub fn ks_equations(&self, r: u32, c: u32) -> Result<KsSystem<F>, KsError> {
        if r > self.ncol as u32 {
            return Err(KsError::RankExceedsColumns { r, ncol: self.ncol as u32 });
        }
        if r as usize > self.nrow {
            return Err(KsError::RankExceedsRows { r, nrow: self.nrow as u32 });
        }
        let available = self.nrow as u32 - r;
        if c > available {
            return Err(KsError::TooManyGuessGroups {
                c,
                r,
                nrow: self.nrow as u32,
                available,
            });
        }
        let k = self.nmat();
        let layout = GroupLayout::new(k, r, c);
        let row_shift = self.nrow - r as usize;

        debug!(nrow = self.nrow, ncol = self.ncol, k, r, c, "building base KS system");

        let mut groups = Vec::with_capacity(c as usize);
        for g in 0..c {
            let mut rows: Vec<KsRow<F>> = Vec::with_capacity(self.ncol);
            for old_ci in 0..self.ncol {
                let mut eq: KsRow<F> = Vec::new();

                let constant = self.m0_at(g as usize, old_ci);
                if constant != F::ZERO {
                    eq.push((Mono::constant(), constant));
                }
                for l in 0..k {
                    let v = self.matrix(l).at(g as usize, old_ci);
                    if v != F::ZERO {
                        eq.push((Mono::from_vars(vec![crate::ks::linear_var_idx(l)]), v));
                    }
                }

                for j in 0..r {
                    let kernel_global = crate::ks::kernel_var_idx(g, j, k, r);
                    let d1 = self.m0_at(row_shift + j as usize, old_ci);
                    if d1 != F::ZERO {
                        eq.push((Mono::from_vars(vec![kernel_global]), d1));
                    }
                    for l in 0..k {
                        let v = self.matrix(l).at(row_shift + j as usize, old_ci);
                        if v != F::ZERO {
                            eq.push((
                                Mono::from_vars(vec![crate::ks::linear_var_idx(l), kernel_global]),
                                v,
                            ));
                        }
                    }
                }

                rows.push(eq);
            }
            groups.push(rows);
        }

        Ok(KsSystem { k, r, c, layout, groups })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrs_field::Gf16;
    use rand::SeedableRng;

    #[test]
    fn ks_equations_matches_expected_row_and_group_counts() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let matrices: Vec<mrs_matrix::Gfm<Gf16>> = (0..3).map(|_| mrs_matrix::Gfm::rand(4, 6, &mut rng)).collect();
        let mr = MinRank::new(4, 6, 2, None, matrices);

        // c <= nrow - r = 2
        let ks = mr.ks_equations(2, 2).unwrap();
        assert_eq!(ks.c(), 2);
        assert_eq!(ks.r(), 2);
        assert_eq!(ks.k(), 3);
        for g in 0..2 {
            assert_eq!(ks.rows(g).len(), 6, "one equation per column position, not per (row, col) pair");
        }
    }

    #[test]
    fn rank_exceeding_columns_is_rejected() {
        let mr: MinRank<Gf16> = MinRank::new(2, 2, 1, None, vec![]);
        assert!(matches!(mr.ks_equations(5, 1), Err(KsError::RankExceedsColumns { .. })));
    }

    #[test]
    fn rank_exceeding_rows_is_rejected() {
        let mr: MinRank<Gf16> = MinRank::new(2, 3, 1, None, vec![]);
        assert!(matches!(mr.ks_equations(3, 1), Err(KsError::RankExceedsRows { .. })));
    }

    #[test]
    fn too_many_guess_groups_is_rejected() {
        let mr: MinRank<Gf16> = MinRank::new(4, 6, 2, None, vec![]);
        assert!(matches!(mr.ks_equations(2, 3), Err(KsError::TooManyGuessGroups { .. })));
    }
}
