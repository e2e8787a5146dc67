//! Dense, row-major matrix over any [`FieldScalar`].

use mrs_field::FieldScalar;
use rand::Rng;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gfm<F> {
    nrow: usize,
    ncol: usize,
    data: Vec<F>,
}

impl<F: FieldScalar> Gfm<F> {
    pub fn zero(nrow: usize, ncol: usize) -> Self {
        Gfm {
            nrow,
            ncol,
            data: vec![F::ZERO; nrow * ncol],
        }
    }

    pub fn from_row_major(nrow: usize, ncol: usize, vals: Vec<F>) -> Self {
        assert_eq!(vals.len(), nrow * ncol);
        Gfm { nrow, ncol, data: vals }
    }

    pub fn rand(nrow: usize, ncol: usize, rng: &mut impl Rng) -> Self {
        Gfm {
            nrow,
            ncol,
            data: F::arr_rand(nrow * ncol, rng),
        }
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    pub fn row(&self, ri: usize) -> &[F] {
        &self.data[ri * self.ncol..(ri + 1) * self.ncol]
    }

    pub fn row_mut(&mut self, ri: usize) -> &mut [F] {
        &mut self.data[ri * self.ncol..(ri + 1) * self.ncol]
    }

    pub fn row_copy_from(&mut self, ri: usize, row: &[F]) {
        self.row_mut(ri).copy_from_slice(row);
    }

    pub fn at(&self, ri: usize, ci: usize) -> F {
        self.data[ri * self.ncol + ci]
    }

    pub fn set_at(&mut self, ri: usize, ci: usize, v: F) {
        self.data[ri * self.ncol + ci] = v;
    }

    pub fn cnz(&self) -> usize {
        F::arr_nzc(&self.data)
    }

    pub fn cz(&self) -> usize {
        F::arr_zc(&self.data)
    }

    /// Largest number of non-zero entries in any single row; used to size
    /// the uniform-capacity sparse rows the Macaulay matrix builder
    /// allocates.
    pub fn find_max_nz_per_row(&self) -> usize {
        (0..self.nrow)
            .map(|ri| F::arr_nzc(self.row(ri)))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrs_field::Gf16;

    #[test]
    fn zero_matrix_has_no_nonzero_entries() {
        let m: Gfm<Gf16> = Gfm::zero(4, 5);
        assert_eq!(m.cnz(), 0);
        assert_eq!(m.cz(), 20);
    }

    #[test]
    fn row_copy_roundtrips() {
        let mut m: Gfm<Gf16> = Gfm::zero(2, 3);
        let row = [Gf16::from_u8(1), Gf16::from_u8(2), Gf16::from_u8(3)];
        m.row_copy_from(1, &row);
        assert_eq!(m.row(1), &row);
        assert_eq!(m.at(1, 2), Gf16::from_u8(3));
    }
}
