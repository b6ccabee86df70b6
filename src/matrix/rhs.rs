//! Right-hand operand of `A · B`.

use super::MatrixRef;

/// B as the engine reads it: stored either as B itself or as Bᵀ.
///
/// `rows()` and `cols()` always describe B (N × O), whatever the storage.
/// A plain `MatrixRef` converts into [`Rhs::Plain`], so every entry point
/// accepts `b.view()` directly.
#[derive(Debug, Clone, Copy)]
pub enum Rhs<'a, T> {
    /// B, N × O.
    Plain(MatrixRef<'a, T>),
    /// Bᵀ, O × N. Column k of B is row k of the view.
    Transposed(MatrixRef<'a, T>),
}

impl<'a, T: Copy> Rhs<'a, T> {
    /// N
    pub fn rows(&self) -> usize {
        match self {
            Self::Plain(b) => b.rows(),
            Self::Transposed(bt) => bt.cols(),
        }
    }

    /// O
    pub fn cols(&self) -> usize {
        match self {
            Self::Plain(b) => b.cols(),
            Self::Transposed(bt) => bt.rows(),
        }
    }

    pub fn is_transposed(&self) -> bool {
        matches!(self, Self::Transposed(_))
    }

    /// `B[j][k]`
    #[inline(always)]
    pub fn get(&self, j: usize, k: usize) -> T {
        match self {
            Self::Plain(b) => b.get(j, k),
            Self::Transposed(bt) => bt.get(k, j),
        }
    }

    /// Copies `B[0..dst.len()][k]` into `dst`.
    pub fn copy_column(&self, k: usize, dst: &mut [T]) {
        match self {
            Self::Plain(b) => {
                for (j, slot) in dst.iter_mut().enumerate() {
                    *slot = b.get(j, k);
                }
            }
            Self::Transposed(bt) => dst.copy_from_slice(&bt.row(k)[..dst.len()]),
        }
    }
}

impl<'a, T> From<MatrixRef<'a, T>> for Rhs<'a, T> {
    fn from(b: MatrixRef<'a, T>) -> Self {
        Self::Plain(b)
    }
}
