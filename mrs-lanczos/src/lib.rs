//! Block Lanczos over a sparse `CmsmGeneric<Gf16>` system, with a GF(2)
//! singular-check kernel used to detect degenerate blocks before they waste
//! an iteration.

mod gf2;
mod lanczos;

pub use gf2::{reduce_block, GaussOutcome};
pub use lanczos::{BlockLanczos, LanczosError, LanczosOutcome};
