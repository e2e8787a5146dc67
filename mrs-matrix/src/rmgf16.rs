//! The GF(16)-specialised dense "block vector": an `nrow x 64` matrix where
//! each row packs 64 GF(16) entries into 32 bytes (4 `u64` words, 16
//! nibbles each). This is the representation the sparse-matrix
//! multiplication kernels and block-Lanczos iterate over.

use mrs_field::{FieldScalar, Gf16};
use rand::Rng;

pub const BLOCK_WIDTH: usize = 64;
const WORDS_PER_ROW: usize = BLOCK_WIDTH / 16;

/// One 64-wide packed row, 4 nibbles per byte... 16 nibbles per `u64` word.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct RowGf16([u64; WORDS_PER_ROW]);

/// Multiply every nibble of a packed word by `x` (the field generator) and
/// reduce mod `x^4 + x + 1`, applied lane-wise across all 16 nibbles at
/// once. The bit-serial building block for [`mulc_word`].
#[inline]
fn mul_x(a: u64) -> u64 {
    const TOP_BIT: u64 = 0x8888_8888_8888_8888;
    const LOW3_BITS: u64 = 0xEEEE_EEEE_EEEE_EEEE; // clears bit0 of every nibble after the shift
    let carry = a & TOP_BIT;
    let shifted = (a << 1) & LOW3_BITS;
    // x^4 = x + 1, so an overflowing top bit folds back in at bit0 and bit1.
    let fold = (carry >> 3) | (carry >> 2);
    shifted ^ fold
}

/// Multiply every nibble of a packed word by the scalar `c`, nibble-wise,
/// via the shift-and-reduce construction (the per-nibble analogue of
/// `gf16v_mul_u64`'s bit-serial packed-array-times-scalar multiply).
#[inline]
fn mulc_word(a: u64, c: Gf16) -> u64 {
    let c = c.to_u8();
    let mut acc = 0u64;
    let mut t = a;
    for i in 0..4 {
        if (c >> i) & 1 != 0 {
            acc ^= t;
        }
        t = mul_x(t);
    }
    acc
}

impl RowGf16 {
    pub fn zero() -> Self {
        RowGf16([0; WORDS_PER_ROW])
    }

    pub fn from_entries(vals: &[Gf16; BLOCK_WIDTH]) -> Self {
        let mut words = [0u64; WORDS_PER_ROW];
        for (w, chunk) in words.iter_mut().zip(vals.chunks_exact(16)) {
            let arr: [Gf16; 16] = chunk.try_into().unwrap();
            *w = Gf16::pack16(&arr);
        }
        RowGf16(words)
    }

    pub fn to_entries(self) -> [Gf16; BLOCK_WIDTH] {
        let mut out = [Gf16::ZERO; BLOCK_WIDTH];
        for (w, chunk) in self.0.iter().zip(out.chunks_exact_mut(16)) {
            chunk.copy_from_slice(&Gf16::unpack16(*w));
        }
        out
    }

    pub fn at(&self, i: usize) -> Gf16 {
        Gf16::unpack16(self.0[i / 16])[i % 16]
    }

    pub fn rand(rng: &mut impl Rng) -> Self {
        RowGf16(core::array::from_fn(|_| rng.gen::<u64>()))
    }

    /// `self ^= other`.
    #[inline]
    pub fn add_in_place(&mut self, other: &RowGf16) {
        for (a, b) in self.0.iter_mut().zip(&other.0) {
            *a ^= b;
        }
    }

    /// `self += src * c`, early-returning when `c == 0` since the product
    /// contributes nothing.
    #[inline]
    pub fn fmaddi_scalar(&mut self, src: &RowGf16, c: Gf16) {
        if c == Gf16::ZERO {
            return;
        }
        for (d, s) in self.0.iter_mut().zip(&src.0) {
            *d ^= mulc_word(*s, c);
        }
    }
}

/// `dst0 += src*c0; dst1 += src*c1` — the fused 2-destination/1-source form
/// used by the CMSM column-major direct-multiplication kernel, where a
/// column's shared source row is fused against two destination rows at a
/// time.
#[inline]
pub fn fmaddi_scalar_2x1(dst0: &mut RowGf16, dst1: &mut RowGf16, src: &RowGf16, c0: Gf16, c1: Gf16) {
    dst0.fmaddi_scalar(src, c0);
    dst1.fmaddi_scalar(src, c1);
}

/// `dst += src0*c0 + src1*c1` — the fused 1-destination/2-source form used
/// by the CMSM transpose-multiplication kernel.
#[inline]
pub fn fmaddi_scalar_1x2(dst: &mut RowGf16, src0: &RowGf16, src1: &RowGf16, c0: Gf16, c1: Gf16) {
    dst.fmaddi_scalar(src0, c0);
    dst.fmaddi_scalar(src1, c1);
}

/// An `nrow x 64` dense GF(16) matrix, stored as one packed [`RowGf16`]
/// per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RmGf16 {
    rows: Vec<RowGf16>,
}

impl RmGf16 {
    pub fn zero(rnum: usize) -> Self {
        RmGf16 {
            rows: vec![RowGf16::zero(); rnum],
        }
    }

    pub fn rand(rnum: usize, rng: &mut impl Rng) -> Self {
        RmGf16 {
            rows: (0..rnum).map(|_| RowGf16::rand(rng)).collect(),
        }
    }

    pub fn rnum(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, i: usize) -> &RowGf16 {
        &self.rows[i]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut RowGf16 {
        &mut self.rows[i]
    }

    pub fn zero_out(&mut self) {
        for r in &mut self.rows {
            *r = RowGf16::zero();
        }
    }

    pub fn add_in_place(&mut self, other: &RmGf16) {
        debug_assert_eq!(self.rnum(), other.rnum());
        for (a, b) in self.rows.iter_mut().zip(&other.rows) {
            a.add_in_place(b);
        }
    }

    /// Split the row storage at index `mid`, mirroring `[T]::split_at_mut`,
    /// so two distinct rows can be borrowed mutably at once.
    pub fn rows_split_at_mut(&mut self, mid: usize) -> (&mut [RowGf16], &mut [RowGf16]) {
        self.rows.split_at_mut(mid)
    }
}
