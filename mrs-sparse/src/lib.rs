//! Sparse entry containers and the two sparse-matrix representations built
//! on top of them: column-major (`CmsmGeneric`) and row-major
//! (`RmsmGeneric`).

mod cmsm;
mod gfa;
mod rmsm;

pub use cmsm::CmsmGeneric;
pub use gfa::SparseRow;
pub use rmsm::RmsmGeneric;

/// Anything that can hand out its rows as sparse, ascending-column-index
/// entry lists by row index — the contract both `CmsmGeneric::from_source`
/// and `RmsmGeneric::from_source` build against, so this crate does not need
/// to depend on whatever produced the rows (the multi-degree Macaulay
/// matrix builder, in practice).
pub trait SparseRowSource<F> {
    fn nrow(&self) -> u64;
    fn row(&self, idx: u64) -> &SparseRow<F>;
}

#[derive(Debug, thiserror::Error)]
pub enum SparseError {
    #[error("column selection is empty")]
    EmptyColumnSelection,
    #[error(transparent)]
    Sampling(#[from] mrs_util::SamplingError),
}
