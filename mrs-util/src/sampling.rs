//! Distinct random row sampling via Floyd's algorithm.
//!
//! The PRNG is threaded through explicitly: callers own an
//! `rand::rngs::StdRng` (or any `rand::Rng`) seeded however they like, and no
//! global state is touched, so sampling is safe to call from multiple worker
//! threads with independent RNGs.

use rand::Rng;

#[derive(Debug, thiserror::Error)]
pub enum SamplingError {
    #[error("requested {nrow} rows out of only {full_nrow} available")]
    NrowExceedsFullNrow { nrow: u64, full_nrow: u64 },
}

/// Draws `nrow` distinct indices out of `[0, full_nrow)` via Floyd's
/// algorithm, invoking `cb(sample_num, row_idx)` once per draw in the order
/// they're produced (`sample_num` runs 0..nrow).
pub fn iter_random_rows(
    full_nrow: u64,
    nrow: u64,
    rng: &mut impl Rng,
    mut cb: impl FnMut(u64, u64),
) -> Result<(), SamplingError> {
    if nrow > full_nrow {
        return Err(SamplingError::NrowExceedsFullNrow { nrow, full_nrow });
    }

    let mut seen = crate::Bitmap::zeroed(full_nrow as usize);
    let mut sample_num = 0u64;
    for inn in (full_nrow - nrow)..full_nrow {
        let mut ridx = rng.gen_range(0..=inn);
        if seen.at(ridx as usize) {
            ridx = inn;
        }
        debug_assert!(!seen.at(ridx as usize));
        seen.set_true_at(ridx as usize);
        cb(sample_num, ridx);
        sample_num += 1;
    }
    debug_assert_eq!(sample_num, nrow);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn samples_exactly_n_distinct_rows() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        let mut count = 0;
        iter_random_rows(100, 10, &mut rng, |i, ridx| {
            assert_eq!(i, count);
            count += 1;
            assert!(ridx < 100);
            assert!(seen.insert(ridx), "rows must be distinct");
        })
        .unwrap();
        assert_eq!(count, 10);
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn same_seed_reproduces_same_sequence() {
        let collect = |seed: u64| {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let mut out = Vec::new();
            iter_random_rows(50, 7, &mut rng, |_, ridx| out.push(ridx)).unwrap();
            out
        };
        assert_eq!(collect(42), collect(42));
    }

    #[test]
    fn rejects_oversized_request() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let err = iter_random_rows(5, 10, &mut rng, |_, _| {}).unwrap_err();
        assert!(matches!(err, SamplingError::NrowExceedsFullNrow { .. }));
    }
}
