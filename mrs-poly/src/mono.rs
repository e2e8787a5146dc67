//! A monomial is stored as its sorted list of variable indices (with
//! repetition for higher powers), analogous to the original `Mono`'s
//! fixed-capacity variable buffer plus explicit degree.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mono {
    /// Variable indices, ascending, one entry per factor (so `x_i^2 x_j`
    /// is stored as `[i, i, j]` with `i < j`).
    vars: Vec<u32>,
}

impl Mono {
    pub fn constant() -> Self {
        Mono { vars: Vec::new() }
    }

    pub fn from_vars(mut vars: Vec<u32>) -> Self {
        vars.sort_unstable();
        Mono { vars }
    }

    pub fn deg(&self) -> u32 {
        self.vars.len() as u32
    }

    pub fn vars(&self) -> &[u32] {
        &self.vars
    }

    /// Variable at position `i`, counting from the *largest* index first
    /// (position 0 is the most significant factor), matching the
    /// largest-to-smallest walk the column-index formulas use.
    pub fn var(&self, i: usize) -> u32 {
        self.vars[self.vars.len() - 1 - i]
    }

    pub fn set_vars(&mut self, vars: Vec<u32>) {
        self.vars = vars;
        self.vars.sort_unstable();
    }

    pub fn push_var(&mut self, v: u32) {
        let pos = self.vars.partition_point(|&x| x <= v);
        self.vars.insert(pos, v);
    }

    /// Multiset rank of this monomial's variables among all
    /// non-decreasing-index degree-`self.deg()` combinations drawn from
    /// `nvars` variables, via the standard combinatorial number system
    /// for combinations with repetition. Used to turn a group's monomial
    /// into a dense column offset the way `ks_midx`/`ks_mdmac_midx`
    /// compute column indices from variable positions.
    pub fn rank_in_group(vars_ascending: &[u32], nvars: u32) -> u64 {
        // Map each entry v_i (0-indexed, ascending, possibly repeating) to
        // a strictly increasing sequence u_i = v_i + i, then rank that as an
        // ordinary combination (n + d - 1 choose d) style colex rank.
        let d = vars_ascending.len();
        let mut rank = 0u64;
        for (i, &v) in vars_ascending.iter().enumerate() {
            let u = v as u64 + i as u64;
            rank += mrs_util::binom(u, (i + 1) as u64);
        }
        let _ = nvars;
        rank
    }

    /// Inverse of [`Mono::rank_in_group`]: recovers the ascending variable
    /// list of the `rank`-th degree-`deg` combination-with-repetition drawn
    /// from `nvars` variables.
    pub fn unrank_in_group(mut rank: u64, deg: u32, nvars: u32) -> Vec<u32> {
        let mut out = vec![0u32; deg as usize];
        for i in (0..deg as usize).rev() {
            // find the largest u such that binom(u, i+1) <= rank
            let mut u = (i as u64) + 1;
            let max_u = nvars as u64 + i as u64;
            while u + 1 <= max_u && mrs_util::binom(u + 1, (i + 1) as u64) <= rank {
                u += 1;
            }
            rank -= mrs_util::binom(u, (i + 1) as u64);
            out[i] = (u - i as u64) as u32;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_unrank_roundtrip() {
        let nvars = 5u32;
        for deg in 0..4u32 {
            let total = mrs_util::binom((nvars + deg).saturating_sub(1), deg as u64).max(1);
            for rank in 0..total {
                if deg == 0 {
                    continue;
                }
                let vars = Mono::unrank_in_group(rank, deg, nvars);
                assert_eq!(vars.len(), deg as usize);
                assert!(vars.windows(2).all(|w| w[0] <= w[1]));
                let back = Mono::rank_in_group(&vars, nvars);
                assert_eq!(back, rank);
            }
        }
    }

    #[test]
    fn var_reads_most_significant_first() {
        let m = Mono::from_vars(vec![1, 4, 4, 7]);
        assert_eq!(m.var(0), 7);
        assert_eq!(m.var(3), 1);
    }
}
