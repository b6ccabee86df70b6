//! Remainder cleanup after the regular pass.
//!
//! Three disjoint regions are left over, resolved in this order:
//!
//! 1. inner remainder: `i < i_end`, regular columns, terms `j in [j_end, N)`.
//!    The regular pass already stored the `j < j_end` part, so this adds.
//! 2. row remainder: `i in [i_end, M)`, regular columns. Never touched,
//!    full dot product assigned.
//! 3. column remainder: `k in [k_end, O)`, all rows. Never touched, full dot
//!    product assigned. Only the core owning the trailing column block runs it.
//!
//! Together with the regular pass every element of C receives exactly one
//! complete accumulation.

use std::ops::Range;

use crate::element::{Acc, Element};
use crate::kernels::MacKernel;
use crate::matrix::{MatrixRef, Rhs};
use crate::matrix::shared::SharedOutput;
use crate::schedule::TileScheduler;

/// Runs every cleanup case that applies to this core's columns.
pub(crate) fn resolve<T, K>(
    kernel: &K,
    a: MatrixRef<'_, T>,
    b: Rhs<'_, T>,
    c: &SharedOutput<'_>,
    sched: &TileScheduler,
) where
    T: Element,
    K: MacKernel<T> + ?Sized,
{
    let dims = sched.dims();
    let bounds = sched.bounds();
    if bounds.is_exact(dims) {
        return;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        core = sched.partition().core(),
        i_end = bounds.i_end,
        j_end = bounds.j_end,
        k_end = bounds.k_end,
        "resolving remainder"
    );

    if bounds.j_end < dims.n {
        top_up_inner(kernel, a, b, c, sched);
    }
    if bounds.i_end < dims.m {
        fill_rows(kernel, a, b, c, sched);
    }
    fill_columns(kernel, a, b, c, sched);
}

/// Case 1: `C[i][k] += sum(A[i][j] * B[j][k] for j in [j_end, N))`.
pub(crate) fn top_up_inner<T, K>(
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
    let inner = bounds.j_end..sched.dims().n;
    for k in sched.partition().regular_columns() {
        for i in 0..bounds.i_end {
            let sum = column_dot(kernel, a, b, i, k, inner.clone());
            // Safety: regular_columns() are owned by this core
            unsafe { c.accumulate(i, k, sum) };
        }
    }
}

/// Case 2: rows past `i_end` in the regular columns, computed in full.
pub(crate) fn fill_rows<T, K>(
    kernel: &K,
    a: MatrixRef<'_, T>,
    b: Rhs<'_, T>,
    c: &SharedOutput<'_>,
    sched: &TileScheduler,
) where
    T: Element,
    K: MacKernel<T> + ?Sized,
{
    let dims = sched.dims();
    for k in sched.partition().regular_columns() {
        for i in sched.bounds().i_end..dims.m {
            let sum = column_dot(kernel, a, b, i, k, 0..dims.n);
            // Safety: regular_columns() are owned by this core
            unsafe { c.store(i, k, sum) };
        }
    }
}

/// Case 3: columns past `k_end`, every row, computed in full.
pub(crate) fn fill_columns<T, K>(
    kernel: &K,
    a: MatrixRef<'_, T>,
    b: Rhs<'_, T>,
    c: &SharedOutput<'_>,
    sched: &TileScheduler,
) where
    T: Element,
    K: MacKernel<T> + ?Sized,
{
    let dims = sched.dims();
    for k in sched.partition().remainder_columns() {
        for i in 0..dims.m {
            let sum = column_dot(kernel, a, b, i, k, 0..dims.n);
            // Safety: remainder_columns() is empty unless this core owns them
            unsafe { c.store(i, k, sum) };
        }
    }
}

// Strided fallback: walks column k of B directly, no packing.
#[inline]
fn column_dot<T, K>(
    kernel: &K,
    a: MatrixRef<'_, T>,
    b: Rhs<'_, T>,
    i: usize,
    k: usize,
    inner: Range<usize>,
) -> Acc
where
    T: Element,
    K: MacKernel<T> + ?Sized,
{
    let a_row = a.row(i);
    inner.fold(0, |acc, j| kernel.mac(acc, a_row[j], b.get(j, k)))
}
