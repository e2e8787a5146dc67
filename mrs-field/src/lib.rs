//! Scalar and array arithmetic over the two finite fields the solver runs
//! its Kipnis-Shamir systems over: GF(16) (the primary field) and GF(31).

mod gf16;
mod gf31;

pub use gf16::Gf16;
pub use gf31::Gf31;

/// Common contract for a small finite field scalar used throughout the
/// sparse-matrix and block-Lanczos machinery: a fully-reduced value in
/// `[0, Self::ORDER)`, closed under addition, multiplication and inversion.
pub trait FieldScalar: Copy + Clone + Default + PartialEq + Eq + core::fmt::Debug {
    const ORDER: u32;
    const ZERO: Self;
    const ONE: Self;

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    fn inv(self) -> Option<Self>;
    fn to_u8(self) -> u8;
    fn from_u8(v: u8) -> Self;
    fn rand(rng: &mut impl rand::Rng) -> Self;

    fn arr_fmaddi_scalar(dst: &mut [Self], src: &[Self], c: Self) {
        if c == Self::ZERO {
            return;
        }
        for (d, s) in dst.iter_mut().zip(src) {
            *d = d.add(s.mul(c));
        }
    }

    fn arr_fmsubi_scalar(dst: &mut [Self], src: &[Self], c: Self) {
        if c == Self::ZERO {
            return;
        }
        for (d, s) in dst.iter_mut().zip(src) {
            *d = d.sub(s.mul(c));
        }
    }

    fn arr_muli_scalar(arr: &mut [Self], c: Self) {
        for a in arr.iter_mut() {
            *a = a.mul(c);
        }
    }

    fn arr_nzc(arr: &[Self]) -> usize {
        arr.iter().filter(|&&x| x != Self::ZERO).count()
    }

    fn arr_zc(arr: &[Self]) -> usize {
        arr.len() - Self::arr_nzc(arr)
    }

    fn arr_rand(sz: usize, rng: &mut impl rand::Rng) -> Vec<Self> {
        (0..sz).map(|_| Self::rand(rng)).collect()
    }
}
