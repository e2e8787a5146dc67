//! Block Lanczos driver: solves the normal equations `A^T A x = A^T b` for
//! a `BLOCK_WIDTH`-wide batch of right-hand sides, checking each candidate
//! direction for degeneracy via the GF(2) kernel before committing to it.

use mrs_field::{FieldScalar, Gf16};
use mrs_matrix::{RmGf16, RowGf16, BLOCK_WIDTH};
use mrs_sparse::CmsmGeneric;
use rand::Rng;
use tracing::{debug, info};

use crate::gf2;

#[derive(Debug, thiserror::Error)]
pub enum LanczosError {
    #[error("block degenerated at iteration {iteration}: GF(2) pre-check found the Gram matrix singular")]
    DegenerateBlock { iteration: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanczosOutcome {
    Converged { solution: RmGf16, iterations: usize },
    Exhausted,
}

pub struct BlockLanczos<'a> {
    a: &'a CmsmGeneric<Gf16>,
}

impl<'a> BlockLanczos<'a> {
    pub fn new(a: &'a CmsmGeneric<Gf16>) -> Self {
        BlockLanczos { a }
    }

    /// Runs the block Lanczos recurrence against the normal equations. `b`
    /// must have `a.rnum()` rows; the returned solution (if any) has
    /// `a.cnum()` rows.
    ///
    /// Each step's candidate direction is projected down to its low bit
    /// plane (GF(16) is a degree-4 extension of GF(2), so a fixed nibble
    /// coordinate is an additive, hence GF(2)-linear, functional) and that
    /// plane's Gram matrix is fed to the real GF(2) solve-kernel contract
    /// ([`gf2::reduce_block`]) as a homogeneous system (no right-hand side
    /// of its own is available here — extracting one from the outer
    /// recurrence's own fingerprint is a separate concern this driver
    /// doesn't implement): a singular or inconsistent outcome rejects the
    /// block, matching how the original's per-width kernels guarded each
    /// block's own iteration.
    pub fn solve(&self, b: &RmGf16, rng: &mut impl Rng, max_iters: usize) -> Result<LanczosOutcome, LanczosError> {
        debug_assert_eq!(b.rnum(), self.a.rnum() as usize);
        let n = self.a.cnum() as usize;
        let mut x = RmGf16::zero(n);
        let mut v_cur = self.at_mul(b);
        let mut v_prev: Option<RmGf16> = None;
        // `rng` seeds nothing here yet (the recurrence is deterministic once
        // `b` is fixed); kept on the signature so a future restart-on-
        // degeneracy policy can re-randomize `b` without changing callers.
        let _ = &rng;

        for iter in 0..max_iters {
            let w = self.ata_mul(&v_cur);

            let mut gram_cols = bitplane_gram(&v_cur, &w);
            match gf2::reduce_block(&mut gram_cols, BLOCK_WIDTH) {
                gf2::GaussOutcome::Solved(_) => {}
                gf2::GaussOutcome::Singular | gf2::GaussOutcome::Inconsistent(_) => {
                    debug!(iter, "GF(2) pre-check found the block singular");
                    return Err(LanczosError::DegenerateBlock { iteration: iter });
                }
            }

            let alpha = diagonal_projection_coeffs(&v_cur, &w);
            let mut step = v_cur.clone();
            scale_columns(&mut step, &alpha);
            x.add_in_place(&step);

            let mut next = w;
            if let Some(prev) = &v_prev {
                let beta = diagonal_projection_coeffs(prev, &next);
                let mut correction = prev.clone();
                scale_columns(&mut correction, &beta);
                next.add_in_place(&correction);
            }

            if is_zero(&next) {
                info!(iterations = iter + 1, "block Lanczos converged");
                return Ok(LanczosOutcome::Converged {
                    solution: x,
                    iterations: iter + 1,
                });
            }

            v_prev = Some(v_cur);
            v_cur = next;
        }

        Ok(LanczosOutcome::Exhausted)
    }

    fn at_mul(&self, v: &RmGf16) -> RmGf16 {
        let mut out = RmGf16::zero(self.a.cnum() as usize);
        self.a.tr_mul_rm(&mut out, v);
        out
    }

    fn ata_mul(&self, v: &RmGf16) -> RmGf16 {
        let mut av = RmGf16::zero(self.a.rnum() as usize);
        self.a.mul_rm(&mut av, v);
        self.at_mul(&av)
    }
}

/// Per-entry Gram matrix of `v` and `w` (over the actual field, summing
/// `v_col_i * w_col_j` across every row), reduced to its lowest bit plane and
/// packed as [`gf2::reduce_block`]'s column array: index 0 is the constant
/// column (zero — this pre-check has no right-hand side of its own, so it
/// only ever asks whether the homogeneous system is singular), indices
/// `1..=BLOCK_WIDTH` are column `j`'s bits, one per Gram row `i`.
fn bitplane_gram(v: &RmGf16, w: &RmGf16) -> Vec<u64> {
    let mut acc = vec![Gf16::ZERO; BLOCK_WIDTH * BLOCK_WIDTH];
    for ridx in 0..v.rnum() {
        let vr = v.row(ridx).to_entries();
        let wr = w.row(ridx).to_entries();
        for i in 0..BLOCK_WIDTH {
            if vr[i] == Gf16::ZERO {
                continue;
            }
            for j in 0..BLOCK_WIDTH {
                if wr[j] == Gf16::ZERO {
                    continue;
                }
                acc[i * BLOCK_WIDTH + j] = acc[i * BLOCK_WIDTH + j].add(vr[i].mul(wr[j]));
            }
        }
    }

    let mut cols = vec![0u64; BLOCK_WIDTH + 1];
    for j in 0..BLOCK_WIDTH {
        let mut col = 0u64;
        for i in 0..BLOCK_WIDTH {
            if acc[i * BLOCK_WIDTH + j].to_u8() & 1 != 0 {
                col |= 1u64 << i;
            }
        }
        cols[j + 1] = col;
    }
    cols
}

/// Column-wise Lanczos scalar `<v_j, w_j> / <v_j, v_j>` — the diagonal of
/// the full `w x w` block coefficient matrix, used on its own as a
/// deliberate simplification of the three-term block recurrence down to an
/// independent-per-column scalar update.
fn diagonal_projection_coeffs(v: &RmGf16, w: &RmGf16) -> [Gf16; BLOCK_WIDTH] {
    let mut num = [Gf16::ZERO; BLOCK_WIDTH];
    let mut den = [Gf16::ZERO; BLOCK_WIDTH];
    for ridx in 0..v.rnum() {
        let vr = v.row(ridx).to_entries();
        let wr = w.row(ridx).to_entries();
        for j in 0..BLOCK_WIDTH {
            num[j] = num[j].add(vr[j].mul(wr[j]));
            den[j] = den[j].add(vr[j].mul(vr[j]));
        }
    }

    let mut coeffs = [Gf16::ZERO; BLOCK_WIDTH];
    for j in 0..BLOCK_WIDTH {
        if let Some(inv) = den[j].inv() {
            coeffs[j] = num[j].mul(inv);
        }
    }
    coeffs
}

fn scale_columns(m: &mut RmGf16, coeffs: &[Gf16; BLOCK_WIDTH]) {
    for ridx in 0..m.rnum() {
        let mut entries = m.row(ridx).to_entries();
        for (e, c) in entries.iter_mut().zip(coeffs.iter()) {
            *e = e.mul(*c);
        }
        *m.row_mut(ridx) = RowGf16::from_entries(&entries);
    }
}

fn is_zero(m: &RmGf16) -> bool {
    (0..m.rnum()).all(|i| *m.row(i) == RowGf16::zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrs_matrix::Gfm;
    use rand::SeedableRng;

    #[test]
    fn zero_rhs_converges_immediately_to_zero_solution() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(21);
        let dense: Gfm<Gf16> = Gfm::rand(10, 10, &mut rng);
        let a = CmsmGeneric::from_dense(&dense);
        let b = RmGf16::zero(10);

        let solver = BlockLanczos::new(&a);
        let outcome = solver.solve(&b, &mut rng, 20).unwrap();
        match outcome {
            LanczosOutcome::Converged { solution, .. } => assert!(is_zero(&solution)),
            LanczosOutcome::Exhausted => panic!("a zero right-hand side must converge immediately"),
        }
    }

    #[test]
    fn runs_to_completion_without_panicking_on_a_random_system() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(23);
        let dense: Gfm<Gf16> = Gfm::rand(15, 12, &mut rng);
        let a = CmsmGeneric::from_dense(&dense);
        let b = RmGf16::rand(15, &mut rng);

        let solver = BlockLanczos::new(&a);
        let _ = solver.solve(&b, &mut rng, 30);
    }
}
