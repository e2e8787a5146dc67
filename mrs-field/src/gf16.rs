//! GF(16) = GF(2)\[x\] / (x^4 + x + 1). Values fit in the low nibble of a
//! byte; addition is XOR, multiplication uses the carryless-multiply-then-
//! reduce trick (same shape as `mul_f` in the MAYO reference implementation).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::FieldScalar;

pub const GF16_MIN: u8 = 0;
pub const GF16_MAX: u8 = 15;

#[derive(Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gf16(u8);

impl core::fmt::Debug for Gf16 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Gf16({})", self.0)
    }
}

#[inline]
fn mul_raw(a: u8, b: u8) -> u8 {
    // carryless multiply of two nibbles, widened into a byte
    let mut p = 0u8;
    for i in 0..4 {
        if (a >> i) & 1 != 0 {
            p ^= b << i;
        }
    }
    // reduce mod x^4 + x + 1
    let top = p & 0xf0;
    p ^= top >> 4;
    p ^= top >> 3;
    p & 0x0f
}

impl FieldScalar for Gf16 {
    const ORDER: u32 = 16;
    const ZERO: Self = Gf16(0);
    const ONE: Self = Gf16(1);

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Gf16(self.0 ^ rhs.0)
    }

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        // char 2: subtraction is addition
        Gf16(self.0 ^ rhs.0)
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Gf16(mul_raw(self.0, rhs.0))
    }

    fn inv(self) -> Option<Self> {
        if self.0 == 0 {
            return None;
        }
        // GF(16)* has order 15, so a^14 = a^-1
        let a2 = self.mul(self);
        let a4 = a2.mul(a2);
        let a8 = a4.mul(a4);
        let a6 = a2.mul(a4);
        Some(a8.mul(a6))
    }

    #[inline]
    fn to_u8(self) -> u8 {
        self.0
    }

    #[inline]
    fn from_u8(v: u8) -> Self {
        debug_assert!(v <= GF16_MAX);
        Gf16(v & 0x0f)
    }

    fn rand(rng: &mut impl Rng) -> Self {
        Gf16(rng.gen_range(0..=GF16_MAX))
    }
}

impl Gf16 {
    /// Pack 16 GF(16) scalars (the width of one "block row" group inside an
    /// `RmGf16` block) into a `u64`, 4 bits each, least-significant nibble
    /// first. Used to build the 64-wide packed rows described in the
    /// dense-matrix component.
    pub fn pack16(vals: &[Gf16; 16]) -> u64 {
        let mut out = 0u64;
        for (i, v) in vals.iter().enumerate() {
            out |= (v.0 as u64) << (4 * i);
        }
        out
    }

    pub fn unpack16(word: u64) -> [Gf16; 16] {
        let mut out = [Gf16::ZERO; 16];
        for (i, o) in out.iter_mut().enumerate() {
            *o = Gf16(((word >> (4 * i)) & 0x0f) as u8);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_roundtrip() {
        let mut rng = rand::thread_rng();
        let vals: [Gf16; 16] = core::array::from_fn(|_| Gf16::rand(&mut rng));
        let packed = Gf16::pack16(&vals);
        assert_eq!(Gf16::unpack16(packed), vals);
    }

    #[test]
    fn known_products() {
        // x * x = x^2
        assert_eq!(Gf16::from_u8(2).mul(Gf16::from_u8(2)), Gf16::from_u8(4));
        // generator check: alpha^15 = 1 where alpha = x (0b0010)
        let alpha = Gf16::from_u8(2);
        let mut acc = Gf16::ONE;
        for _ in 0..15 {
            acc = acc.mul(alpha);
        }
        assert_eq!(acc, Gf16::ONE);
    }
}
