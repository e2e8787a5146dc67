//! Kipnis-Shamir modeling of a MinRank instance: turning a guessed
//! right-kernel rank into a system of bilinear equations (`ks`), and
//! lowering that system into the rows of a multi-degree Macaulay matrix
//! (`mdmac`) whose column space is every monomial up to a chosen per-group
//! degree bound.

mod ks;
mod mdmac;
mod minrank;

pub use ks::{
    base_total_d2_num, base_total_mono_num, kernel_var_idx, kernel_var_idx_from_2d, linear_var_idx,
    total_var_num, KsRow, KsSystem,
};
pub use mdmac::{Mdmac, MdmacBuilder, MDMacColIterator};
pub use minrank::MinRank;

#[derive(Debug, thiserror::Error)]
pub enum KsError {
    #[error("multi-degree bound must be at least 1 in every group, got {0:?}")]
    DegreeTooSmall(Vec<u32>),
    #[error("kernel guess rank {r} exceeds instance column count {ncol}")]
    RankExceedsColumns { r: u32, ncol: u32 },
    #[error("kernel guess rank {r} exceeds instance row count {nrow}")]
    RankExceedsRows { r: u32, nrow: u32 },
    #[error("guess-group count {c} exceeds nrow - r = {available} (nrow={nrow}, r={r})")]
    TooManyGuessGroups { c: u32, r: u32, nrow: u32, available: u32 },
}
