//! Dense matrices over a `FieldScalar` (`Gfm`) and the GF(16)-specialised
//! packed block-vector type (`RmGf16`) the sparse multiplication kernels
//! and block-Lanczos iteration operate on.

mod gfm;
mod rmgf16;

pub use gfm::Gfm;
pub use rmgf16::{fmaddi_scalar_1x2, fmaddi_scalar_2x1, RmGf16, RowGf16, BLOCK_WIDTH};
