//! Monomials (`Mono`) and group-wise multi-degrees (`MDeg`) over the
//! variable layout a Kipnis-Shamir system induces: one group of `k` linear
//! variables followed by `c` groups of `r` kernel variables each.

mod mdeg;
mod mono;

pub use mdeg::MDeg;
pub use mono::Mono;

/// The grouped variable layout shared by `Mono` and `MDeg`: variable 0..k
/// are the linear variables, and variables `k + g*r .. k + (g+1)*r` are the
/// kernel variables of group `g` (`g` in `0..c`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GroupLayout {
    pub k: u32,
    pub r: u32,
    pub c: u32,
}

impl GroupLayout {
    pub fn new(k: u32, r: u32, c: u32) -> Self {
        GroupLayout { k, r, c }
    }

    pub fn num_groups(&self) -> u32 {
        1 + self.c
    }

    /// Number of variables in group `g` (0 = linear group, 1..=c = kernel
    /// groups).
    pub fn group_size(&self, g: u32) -> u32 {
        if g == 0 {
            self.k
        } else {
            self.r
        }
    }

    /// Global variable-index offset of group `g`'s first variable.
    pub fn group_offset(&self, g: u32) -> u32 {
        if g == 0 {
            0
        } else {
            self.k + (g - 1) * self.r
        }
    }

    pub fn total_vars(&self) -> u32 {
        self.k + self.r * self.c
    }
}
