//! Monomial-indexing arithmetic and the base Kipnis-Shamir equation system:
//! one bilinear equation per (guessed kernel column, matrix-entry position)
//! pair, in the variable space `x_0..x_{k-1}` (the unknown linear
//! combination of the instance's matrices) and `v_{g,0}..v_{g,r-1}` for each
//! of `c` independently-guessed kernel-basis columns `g`.

use mrs_field::FieldScalar;
use mrs_poly::{GroupLayout, Mono};

/// Global index of linear variable `i` (`i` in `0..k`). The linear group
/// always starts at variable 0, so this is the identity, but it exists as a
/// named entry point the way `ks_linear_var_idx` is one in the original
/// index-arithmetic surface.
pub fn linear_var_idx(i: u32) -> u32 {
    i
}

/// Global index of kernel variable `(group, local)` given a flat `r*c` grid
/// addressed row-major by group.
pub fn kernel_var_idx_from_2d(group: u32, local: u32, r: u32) -> u32 {
    group * r + local
}

/// Global variable index of kernel variable `local` in guess-group `group`,
/// within the full `k + r*c`-variable space.
pub fn kernel_var_idx(group: u32, local: u32, k: u32, r: u32) -> u32 {
    k + kernel_var_idx_from_2d(group, local, r)
}

/// Total number of variables in a Kipnis-Shamir system over `k` linear
/// unknowns and `c` guessed kernel columns of `r` entries each.
pub fn total_var_num(k: u32, r: u32, c: u32) -> u32 {
    k + r * c
}

/// Number of degree-2 monomials mixing one linear and one kernel variable
/// in the base (un-extended) system: each of the `r*c` kernel variables
/// pairs with each of the `k` linear variables.
pub fn base_total_d2_num(k: u32, r: u32, c: u32) -> u32 {
    k * r * c
}

/// Size of the base KS system's monomial basis: the constant term, every
/// linear-or-kernel variable singly, and every linear*kernel cross term.
pub fn base_total_mono_num(k: u32, r: u32, c: u32) -> u32 {
    1 + total_var_num(k, r, c) + base_total_d2_num(k, r, c)
}

/// One base Kipnis-Shamir equation, as a sparse list of `(monomial,
/// coefficient)` pairs over the constant/linear/kernel-cross monomial
/// basis. Kept this way (rather than immediately folding into a
/// `SparseRow`) because the multi-degree Macaulay builder needs to multiply
/// every term by many different "multiplier" monomials before a global
/// column index can even be assigned.
pub type KsRow<F> = Vec<(Mono, F)>;

/// The base Kipnis-Shamir system built from a MinRank instance for a given
/// guessed kernel rank `r` and column-guess count `c`: `c` independent
/// groups of equations, one group per guessed kernel-basis column.
#[derive(Clone, Debug)]
pub struct KsSystem<F> {
    pub(crate) k: u32,
    pub(crate) r: u32,
    pub(crate) c: u32,
    pub(crate) layout: GroupLayout,
    pub(crate) groups: Vec<Vec<KsRow<F>>>,
}

impl<F: FieldScalar> KsSystem<F> {
    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    pub fn c(&self) -> u32 {
        self.c
    }

    pub fn layout(&self) -> &GroupLayout {
        &self.layout
    }

    /// Per-group variable-group sizes in `GroupLayout` order: the linear
    /// group's size followed by each kernel group's size (always `r`).
    pub fn group_sizes(&self) -> Vec<u32> {
        let mut sizes = vec![self.k];
        sizes.extend(std::iter::repeat(self.r).take(self.c as usize));
        sizes
    }

    pub fn rows(&self, group: u32) -> &[KsRow<F>] {
        &self.groups[group as usize]
    }

    pub fn total_rows(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }

    /// A system over the same monomials with every coefficient replaced by
    /// a fresh random field element, keeping the sparsity pattern fixed.
    /// Backs `--ks-rand`: comparing the solver's behaviour against a
    /// structurally identical but semantically meaningless system is a
    /// useful sanity/timing check independent of any real instance.
    pub fn randomized(&self, rng: &mut impl rand::Rng) -> KsSystem<F> {
        let groups = self
            .groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|row| row.iter().map(|(mono, _)| (mono.clone(), F::rand(rng))).collect())
                    .collect()
            })
            .collect();
        KsSystem {
            k: self.k,
            r: self.r,
            c: self.c,
            layout: self.layout,
            groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_var_num_counts_linear_and_kernel_vars() {
        assert_eq!(total_var_num(3, 2, 4), 3 + 2 * 4);
    }

    #[test]
    fn base_total_mono_num_matches_constant_linear_and_cross_counts() {
        let (k, r, c) = (3u32, 2u32, 4u32);
        let expected = 1 + total_var_num(k, r, c) + base_total_d2_num(k, r, c);
        assert_eq!(base_total_mono_num(k, r, c), expected);
    }

    #[test]
    fn kernel_var_idx_starts_after_linear_block() {
        assert_eq!(kernel_var_idx(0, 0, 5, 3), 5);
        assert_eq!(kernel_var_idx(1, 0, 5, 3), 8);
        assert_eq!(kernel_var_idx(1, 2, 5, 3), 10);
    }
}
