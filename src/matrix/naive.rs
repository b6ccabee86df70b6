use super::{MatrixMut, MatrixRef};
use crate::element::{Acc, Element};

/// Naive matrix multiplication using i-j-k loop order.
///
/// This is the textbook triple loop: one full dot product per output element,
/// assigned (not accumulated) into C. It never tiles and never splits the
/// inner dimension, so it's the correctness baseline every tiled path is
/// compared against.
///
/// # Arguments
///
/// * `a` - Matrix A (M × N)
/// * `b` - Matrix B (N × O)
/// * `c` - Matrix C (M × O), overwritten with A · B
pub fn matmul_naive<T: Element>(a: MatrixRef<'_, T>, b: MatrixRef<'_, T>, c: &mut MatrixMut<'_, Acc>) {
    assert_eq!(a.cols(), b.rows(), "A cols must match B rows");
    assert_eq!(c.rows(), a.rows(), "C rows must match A rows");
    assert_eq!(c.cols(), b.cols(), "C cols must match B cols");

    for i in 0..a.rows() {
        for k in 0..b.cols() {
            let mut sum: Acc = 0;
            for j in 0..a.cols() {
                sum = sum.wrapping_add(a.get(i, j).widen().wrapping_mul(b.get(j, k).widen()));
            }
            c.set(i, k, sum);
        }
    }
}
