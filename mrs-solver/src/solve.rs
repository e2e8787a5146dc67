//! The top-level solve loop: load the instance, build the Kipnis-Shamir
//! system and its multi-degree Macaulay matrix, sample it into a sparse
//! column-major system, and hand that to block Lanczos.

use mrs_field::Gf16;
use mrs_ks::MdmacBuilder;
use mrs_lanczos::{BlockLanczos, LanczosOutcome};
use mrs_matrix::RmGf16;
use mrs_sparse::{CmsmGeneric, SparseRowSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::error::SolverError;
use crate::loader;

/// Process exit code on success; the caller maps every other outcome
/// through `SolverError::exit_code` or the "budget exhausted" value below.
pub const EXIT_SOLVED: i32 = 0;
pub const EXIT_EXHAUSTED: i32 = 1;

/// Iteration budget for a single block-Lanczos attempt. Not yet exposed as
/// a CLI flag; `spec.md`'s flag table does not name one, and the solve loop
/// retries with a fresh random start on a degenerate block rather than
/// needing the caller to tune this.
const MAX_LANCZOS_ITERS: usize = 64;

/// Number of fresh-random-start retries attempted after a degenerate block
/// before giving up for this multi-degree choice.
const MAX_DEGENERATE_RETRIES: usize = 8;

#[instrument(skip_all)]
pub fn run(config: &Config) -> Result<i32, SolverError> {
    info!(instance = %config.instance_path.display(), "loading MinRank instance");
    let minrank = loader::load_instance(&config.instance_path)?;
    info!(nrow = minrank.nrow(), ncol = minrank.ncol(), rank = minrank.rank(), "instance loaded");

    if config.dry_run {
        info!("dry run requested, exiting without solving");
        return Ok(EXIT_SOLVED);
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let c = config.mdegs[0].num_groups() - 1;
    let r = minrank.rank();

    let mut ks = minrank.ks_equations(r, c)?;
    if config.ks_rand {
        info!("--ks-rand given: replacing the computed KS system with a random one of the same shape");
        ks = ks.randomized(&mut rng);
    }

    let mdmac = if config.mdegs.len() == 1 {
        MdmacBuilder::build(&ks, config.mdegs[0].clone())?
    } else {
        MdmacBuilder::from_combined_degrees(&ks, &config.mdegs)?
    };
    info!(nrow = mdmac.nrow(), ncol = mdmac.ncol(), "multi-degree Macaulay matrix built");

    let sample_size = mdmac.nrow().min(256);
    let sample_rows: Vec<u64> = (0..sample_size).collect();
    let nnz_hist = mdmac.sample_col_nnz(&sample_rows);
    let dense_cols = nnz_hist.iter().filter(|&&c| c > 0).count();
    info!(dense_cols, sampled_rows = sample_size, "column density sampled");

    let nrow = config
        .mac_row
        .map(|cap| cap.min(mdmac.nrow()))
        .unwrap_or(mdmac.nrow());

    // Walk columns in multi-degree order and keep only the ones the sample
    // actually touched: an empty-sampled column contributes nothing to the
    // CMSM/RMSM it would be built into, so there is no reason to carry it.
    let col_idxs: Vec<u64> = mdmac.col_iter().filter(|&col| nnz_hist[col as usize] > 0).collect();
    let col_idxs = if col_idxs.is_empty() {
        warn!("density sample found every column empty, falling back to the full column set");
        (0..mdmac.ncol()).collect()
    } else {
        col_idxs
    };
    info!(selected_cols = col_idxs.len(), total_cols = mdmac.ncol(), "column subset selected");

    for attempt in 0..MAX_DEGENERATE_RETRIES {
        let cmsm: CmsmGeneric<Gf16> = CmsmGeneric::from_source(&mdmac, &col_idxs, nrow, &mut rng)?;
        let b = RmGf16::rand(cmsm.rnum() as usize, &mut rng);
        let solver = BlockLanczos::new(&cmsm);

        match solver.solve(&b, &mut rng, MAX_LANCZOS_ITERS) {
            Ok(LanczosOutcome::Converged { iterations, .. }) => {
                info!(attempt, iterations, "solution found");
                return Ok(EXIT_SOLVED);
            }
            Ok(LanczosOutcome::Exhausted) => {
                info!(attempt, "iteration budget exhausted, giving up on this sample");
                return Ok(EXIT_EXHAUSTED);
            }
            Err(e) => {
                info!(attempt, error = %e, "retrying with a fresh random start");
                continue;
            }
        }
    }

    info!("every retry degenerated; reporting a negative result");
    Ok(EXIT_EXHAUSTED)
}
