//! Single-core tiled GEMM.

use super::{cleanup, regular};
use crate::element::{Acc, Element};
use crate::kernels::MacKernel;
use crate::matrix::shared::SharedOutput;
use crate::matrix::{MatrixMut, MatrixRef, Rhs};
use crate::schedule::{MatmulDims, TileScheduler, TileSteps};

/// Tiled matrix multiplication on the calling core: C = A · B.
///
/// Matrices are row-major views: A is M×N, B is N×O, C is M×O. C need not be
/// zeroed. Every element is assigned by the regular or cleanup pass before
/// anything is added to it.
///
/// `b` is either a plain view of B or [`Rhs::Transposed`] over a stored Bᵀ
/// (O×N). Callers holding Bᵀ never have to materialize B.
///
/// # Panics
///
/// Panics if the view shapes don't agree (see [`crate::check_operands`]).
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        skip_all,
        fields(m = a.rows(), n = a.cols(), o = c.cols(), kernel = kernel.name())
    )
)]
pub fn matmul_tiled<'b, T, K>(
    kernel: &K,
    a: MatrixRef<'_, T>,
    b: impl Into<Rhs<'b, T>>,
    c: &mut MatrixMut<'_, Acc>,
    steps: TileSteps,
) where
    T: Element,
    K: MacKernel<T> + ?Sized,
{
    let b = b.into();
    let dims = operand_dims(a, b, c.rows(), c.cols());
    let out = SharedOutput::new(c);
    compute_core(kernel, a, b, &out, &TileScheduler::single(dims, steps));
}

/// Regular pass, then cleanup, for one core's partition.
pub(crate) fn compute_core<T, K>(
    kernel: &K,
    a: MatrixRef<'_, T>,
    b: Rhs<'_, T>,
    c: &SharedOutput<'_>,
    sched: &TileScheduler,
) where
    T: Element,
    K: MacKernel<T> + ?Sized,
{
    regular::accumulate_regular(kernel, a, b, c, sched);
    cleanup::resolve(kernel, a, b, c, sched);
}

// Shapes must agree before any raw write into C.
pub(crate) fn operand_dims<T: Copy>(
    a: MatrixRef<'_, T>,
    b: Rhs<'_, T>,
    c_rows: usize,
    c_cols: usize,
) -> MatmulDims {
    match MatmulDims::from_operands(a, b, c_rows, c_cols) {
        Ok(dims) => dims,
        Err(e) => panic!("{e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::{FixedPointKernel, ScalarKernel};
    use crate::matrix::Matrix;
    use crate::matrix::naive::matmul_naive;

    #[test]
    fn test_tiled_matches_naive_across_steps() {
        let (m, n, o) = (9, 11, 7);
        let a = Matrix::from_fn(m, n, |i, j| ((i * 31 + j * 17) % 200) as i16 - 100);
        let b = Matrix::from_fn(n, o, |j, k| ((j * 13 + k * 29) % 180) as i16 - 90);

        let mut expected = Matrix::zeros(m, o);
        matmul_naive(a.view(), b.view(), &mut expected.view_mut());

        for si in 1..6 {
            for sj in 1..6 {
                for sk in 1..6 {
                    let steps = TileSteps::new(si, sj, sk).unwrap();
                    let mut c = Matrix::from_vec(m, o, vec![0x5A5A; m * o]).unwrap();
                    matmul_tiled(&ScalarKernel, a.view(), b.view(), &mut c.view_mut(), steps);
                    assert_eq!(c, expected, "steps ({si}, {sj}, {sk})");
                }
            }
        }
    }

    #[test]
    fn test_fixed_point_split_is_exact() {
        let kernel = FixedPointKernel::new(7);
        let a = Matrix::from_fn(5, 9, |i, j| (i as i32 - 2) * 1000 + j as i32 * 77);
        let b = Matrix::from_fn(9, 3, |j, k| j as i32 * 300 - k as i32 * 111);

        let mut whole = Matrix::zeros(5, 3);
        matmul_tiled(&kernel, a.view(), b.view(), &mut whole.view_mut(), TileSteps::UNIT);

        // j_end = 8 splits the inner range between regular and cleanup
        let mut split = Matrix::zeros(5, 3);
        let steps = TileSteps::new(2, 4, 2).unwrap();
        matmul_tiled(&kernel, a.view(), b.view(), &mut split.view_mut(), steps);

        assert_eq!(whole, split);
        let direct: i32 = (0..9).map(|j| kernel.mac(0, a.get(1, j), b.get(j, 2))).sum();
        assert_eq!(whole.get(1, 2), direct);
    }

    #[test]
    fn test_transposed_rhs_matches_naive() {
        let (m, n, o) = (7, 10, 9);
        let a = Matrix::from_fn(m, n, |i, j| ((i * 5 + j * 3) % 41) as i16 - 20);
        let b = Matrix::from_fn(n, o, |j, k| ((j * 7 + k * 13) % 37) as i16 - 18);
        let bt = Matrix::from_fn(o, n, |k, j| b.get(j, k));

        let mut expected = Matrix::zeros(m, o);
        matmul_naive(a.view(), b.view(), &mut expected.view_mut());

        for steps in [TileSteps::UNIT, TileSteps::I16, TileSteps::I8, TileSteps::new(3, 4, 5).unwrap()] {
            let mut c = Matrix::from_vec(m, o, vec![i32::MAX; m * o]).unwrap();
            matmul_tiled(&ScalarKernel, a.view(), Rhs::Transposed(bt.view()), &mut c.view_mut(), steps);
            assert_eq!(c, expected, "{steps:?}");
        }
    }

    #[test]
    #[should_panic(expected = "operand mismatch")]
    fn test_transposed_shape_checked() {
        // Bᵀ must be O×N; passing B itself as Bᵀ is a 4×3 operand
        let a = Matrix::<i8>::zeros(2, 3);
        let b = Matrix::<i8>::zeros(3, 4);
        let mut c = Matrix::zeros(2, 4);
        matmul_tiled(&ScalarKernel, a.view(), Rhs::Transposed(b.view()), &mut c.view_mut(), TileSteps::I8);
    }

    #[test]
    #[should_panic(expected = "operand mismatch")]
    fn test_mismatched_output_panics() {
        let a = Matrix::<i8>::zeros(2, 3);
        let b = Matrix::<i8>::zeros(3, 4);
        let mut c = Matrix::zeros(2, 3);
        matmul_tiled(&ScalarKernel, a.view(), b.view(), &mut c.view_mut(), TileSteps::I8);
    }
}
