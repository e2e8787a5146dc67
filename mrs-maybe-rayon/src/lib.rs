//! Feature-gated wrapper around `rayon`.
//!
//! The rest of the workspace's worker-pool code (CMSM/RMSM multiplication,
//! block-Lanczos iteration) goes through the re-exports here instead of
//! depending on `rayon` directly, so the `parallel` feature can be turned off
//! to get a deterministic single-threaded run without touching call sites.

#![no_std]

#[cfg(feature = "parallel")]
mod parallel {
    pub use rayon::current_num_threads;
    pub use rayon::iter::{
        IndexedParallelIterator, IntoParallelIterator, IntoParallelRefIterator,
        IntoParallelRefMutIterator, ParallelIterator,
    };
    pub use rayon::prelude::ParallelSlice;
    pub use rayon::slice::{ParallelSlice as _, ParallelSliceMut};
}

#[cfg(feature = "parallel")]
pub use parallel::*;

#[cfg(not(feature = "parallel"))]
mod serial;
#[cfg(not(feature = "parallel"))]
pub use serial::*;

pub mod prelude {
    #[cfg(feature = "parallel")]
    pub use rayon::prelude::*;

    #[cfg(not(feature = "parallel"))]
    pub use crate::serial::*;
}
