//! Small bit-twiddling and combinatorial helpers shared across the workspace.

mod bits;
mod math;
mod sampling;

pub use bits::{lsb, mask_from_nonzero, toggle_at, Bitmap};
pub use math::{binom, binom2, binom3, binom4, binom5, is_power_of_2, next_power_of_2};
pub use sampling::iter_random_rows;
