//! Regular (fast-path) pass over the tile grid.

use crate::element::{Acc, Element};
use crate::kernels::MacKernel;
use crate::matrix::{MatrixRef, Rhs};
use crate::matrix::shared::SharedOutput;
use crate::schedule::TileScheduler;

/// Writes `C[i][k] = sum(A[i][j] * B[j][k] for j < j_end)` for every element
/// of every regular tile this core owns.
///
/// Each (i, k) is stored exactly once. Terms with `j >= j_end` are left for
/// the cleanup pass, which adds them on top.
pub(crate) fn accumulate_regular<T, K>(
    kernel: &K,
    a: MatrixRef<'_, T>,
    b: Rhs<'_, T>,
    c: &SharedOutput<'_>,
    sched: &TileScheduler,
) where
    T: Element,
    K: MacKernel<T> + ?Sized,
{
    let bounds = sched.bounds();
    if bounds.i_end == 0 || sched.partition().column_blocks().next().is_none() {
        return;
    }
    // from here on a full column block exists, so k_step <= O
    let j_end = bounds.j_end;
    let steps = sched.steps();
    let (i_step, j_step, k_step) = (steps.i(), steps.j(), steps.k());

    // kSTEP columns of B, each packed contiguously over [0, j_end)
    let mut panel = vec![T::default(); k_step * j_end];
    let mut packed_col = None;

    for tile in sched.tiles() {
        if packed_col != Some(tile.col) {
            pack_b_panel(b, &mut panel, tile.col, k_step, j_end);
            packed_col = Some(tile.col);
        }

        for i in tile.row..tile.row + i_step {
            let a_row = &a.row(i)[..j_end];
            for dk in 0..k_step {
                let b_col = &panel[dk * j_end..(dk + 1) * j_end];
                let sum = multiply_accumulate(kernel, a_row, b_col, j_step);
                // Safety: tiles() only yields columns this core owns
                unsafe { c.store(i, tile.col + dk, sum) };
            }
        }
    }
}

/// One output element over the regular inner range, one j-tile at a time.
#[inline]
pub(crate) fn multiply_accumulate<T, K>(kernel: &K, a_row: &[T], b_col: &[T], j_step: usize) -> Acc
where
    T: Element,
    K: MacKernel<T> + ?Sized,
{
    a_row
        .chunks_exact(j_step)
        .zip(b_col.chunks_exact(j_step))
        .fold(0, |acc, (a, b)| kernel.dot(a, b, acc))
}

// Copy kSTEP columns of B into a column-major panel so the kernel can stream
// both operands sequentially.
fn pack_b_panel<T: Element>(
    b: Rhs<'_, T>,
    panel: &mut [T],
    col: usize,
    k_step: usize,
    j_end: usize,
) {
    for dk in 0..k_step {
        b.copy_column(col + dk, &mut panel[dk * j_end..(dk + 1) * j_end]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::ScalarKernel;
    use crate::matrix::Matrix;
    use crate::schedule::{MatmulDims, TileSteps};

    #[test]
    fn test_multiply_accumulate_walks_j_tiles() {
        let a = [1i16, 2, 3, 4, 5, 6];
        let b = [1i16, 1, 1, 1, 1, 1];
        assert_eq!(multiply_accumulate(&ScalarKernel, &a[..], &b[..], 2), 21);
        assert_eq!(multiply_accumulate(&ScalarKernel, &a[..], &b[..], 3), 21);
        // empty regular range
        assert_eq!(multiply_accumulate(&ScalarKernel, &a[..0], &b[..0], 4), 0);
    }

    #[test]
    fn test_regular_pass_only_touches_grid() {
        // 3x5 @ 5x3 with steps (2, 2, 2): grid is rows 0..2, inner 0..4, cols 0..2
        let a = Matrix::from_fn(3, 5, |i, j| (i * 5 + j) as i16);
        let b = Matrix::from_fn(5, 3, |j, k| (j + k) as i16);
        let mut c = Matrix::from_vec(3, 3, vec![-1; 9]).unwrap();
        let dims = MatmulDims { m: 3, n: 5, o: 3 };
        let sched = TileScheduler::single(dims, TileSteps::new(2, 2, 2).unwrap());

        {
            let mut view = c.view_mut();
            let out = SharedOutput::new(&mut view);
            accumulate_regular(&ScalarKernel, a.view(), b.view().into(), &out, &sched);
        }

        for i in 0..3 {
            for k in 0..3 {
                if i < 2 && k < 2 {
                    let partial: i32 = (0..4).map(|j| a.get(i, j) as i32 * b.get(j, k) as i32).sum();
                    assert_eq!(c.get(i, k), partial, "C[{i}][{k}]");
                } else {
                    assert_eq!(c.get(i, k), -1, "C[{i}][{k}] outside the grid was written");
                }
            }
        }
    }

    #[test]
    fn test_oversized_steps_leave_output_alone() {
        let a = Matrix::from_fn(4, 3, |i, j| (i + j) as i16);
        let b = Matrix::from_fn(3, 4, |j, k| (j * k) as i16);
        let dims = MatmulDims { m: 4, n: 3, o: 4 };

        for steps in [(1, 1, usize::MAX), (1, 1, 1 << 40), (usize::MAX, 1, 1), (5, 1, 5)] {
            let steps = TileSteps::new(steps.0, steps.1, steps.2).unwrap();
            let sched = TileScheduler::single(dims, steps);
            let mut c = Matrix::from_vec(4, 4, vec![-3; 16]).unwrap();
            {
                let mut view = c.view_mut();
                let out = SharedOutput::new(&mut view);
                accumulate_regular(&ScalarKernel, a.view(), b.view().into(), &out, &sched);
            }
            assert!(c.as_slice().iter().all(|&x| x == -3), "{steps:?}");
        }
    }

    #[test]
    fn test_transposed_panel_matches_plain() {
        let a = Matrix::from_fn(4, 6, |i, j| (i * 6 + j) as i8 - 10);
        let b = Matrix::from_fn(6, 4, |j, k| (j * 3) as i8 - k as i8);
        let bt = Matrix::from_fn(4, 6, |k, j| b.get(j, k));
        let dims = MatmulDims { m: 4, n: 6, o: 4 };
        let sched = TileScheduler::single(dims, TileSteps::I8);

        let mut plain = Matrix::zeros(4, 4);
        let mut trans = Matrix::zeros(4, 4);
        {
            let mut view = plain.view_mut();
            let out = SharedOutput::new(&mut view);
            accumulate_regular(&ScalarKernel, a.view(), b.view().into(), &out, &sched);
        }
        {
            let mut view = trans.view_mut();
            let out = SharedOutput::new(&mut view);
            accumulate_regular(&ScalarKernel, a.view(), Rhs::Transposed(bt.view()), &out, &sched);
        }
        assert_eq!(trans, plain);
    }
}
