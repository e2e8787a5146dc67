//! GF(31), standard modular arithmetic. Inversion uses exponentiation to the
//! 29th power (since `|GF(31)*| = 30`, `a^30 = 1`, so `a^-1 = a^29`),
//! matching `gf31_t_inv_by_squaring`'s repeated-squaring chain.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::FieldScalar;

pub const GF31_MIN: u8 = 0;
pub const GF31_MAX: u8 = 30;

#[derive(Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gf31(u8);

impl core::fmt::Debug for Gf31 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Gf31({})", self.0)
    }
}

#[inline]
fn reduc(v: u32) -> u8 {
    (v % 31) as u8
}

impl FieldScalar for Gf31 {
    const ORDER: u32 = 31;
    const ZERO: Self = Gf31(0);
    const ONE: Self = Gf31(1);

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Gf31(reduc(self.0 as u32 + rhs.0 as u32))
    }

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Gf31(reduc(self.0 as u32 + 31 - rhs.0 as u32))
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Gf31(reduc(self.0 as u32 * rhs.0 as u32))
    }

    fn inv(self) -> Option<Self> {
        if self.0 == 0 {
            return None;
        }
        if self.0 == 1 {
            return Some(Gf31(1));
        }
        let a = self.0 as u32;
        let p2 = reduc(a * a) as u32; // a^2
        let p4 = reduc(p2 * p2) as u32; // a^4
        let p8 = reduc(p4 * p4) as u32; // a^8
        let p16 = reduc(p8 * p8) as u32; // a^16
        let p24 = reduc(p16 * p8) as u32; // a^24
        let p28 = reduc(p24 * p4) as u32; // a^28
        let p29 = reduc(p28 * a); // a^29 = a^-1
        Some(Gf31(p29))
    }

    #[inline]
    fn to_u8(self) -> u8 {
        self.0
    }

    #[inline]
    fn from_u8(v: u8) -> Self {
        debug_assert!(v <= GF31_MAX);
        Gf31(v % 31)
    }

    fn rand(rng: &mut impl Rng) -> Self {
        Gf31(rng.gen_range(0..=GF31_MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverses_match_table() {
        for a in 1..31u8 {
            let inv = Gf31::from_u8(a).inv().unwrap();
            assert_eq!(Gf31::from_u8(a).mul(inv), Gf31::ONE);
        }
    }
}
