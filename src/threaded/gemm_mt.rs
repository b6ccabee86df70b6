//! Multi-core tiled GEMM.

use super::cluster::{CoreContext, ThreadCluster};
use crate::blocked::gemm::{compute_core, operand_dims};
use crate::element::{Acc, Element};
use crate::kernels::MacKernel;
use crate::matrix::shared::SharedOutput;
use crate::matrix::{MatrixMut, MatrixRef, Rhs};
use crate::schedule::{TileScheduler, TileSteps};

/// One core's part of C = A · B, followed by the team barrier.
///
/// Must be called by every core in `ctx` with identical operands, steps and
/// output. Core `c` computes the column blocks `c, c + cores, ...` of width
/// `steps.k()`, including their row and inner remainders; the owner of the
/// trailing partial column block also computes those columns. When this
/// returns on any core, all of C is complete.
///
/// # Safety
///
/// Every call sharing `c` must come from a distinct core of one team: the
/// ordinals `0..num_cores()` each used exactly once, with the same
/// `num_cores()` everywhere. Two calls claiming the same ordinal write the
/// same elements of C concurrently.
///
/// # Panics
///
/// Panics if the view shapes don't agree.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        skip_all,
        fields(core = ctx.core_id(), cores = ctx.num_cores(), m = a.rows(), n = a.cols(), o = c.cols())
    )
)]
pub unsafe fn matmul_tiled_mt<'b, T, K, C>(
    ctx: &C,
    kernel: &K,
    a: MatrixRef<'_, T>,
    b: impl Into<Rhs<'b, T>>,
    c: &SharedOutput<'_>,
    steps: TileSteps,
) where
    T: Element,
    K: MacKernel<T> + ?Sized,
    C: CoreContext + ?Sized,
{
    let b = b.into();
    let dims = operand_dims(a, b, c.rows(), c.cols());
    let sched = TileScheduler::new(dims, steps, ctx.core_id(), ctx.num_cores());
    compute_core(kernel, a, b, c, &sched);
    ctx.barrier();
}

/// Runs [`matmul_tiled_mt`] on every core of `cluster`.
pub fn matmul_tiled_on<'b, T, K>(
    cluster: &ThreadCluster,
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
    let out = SharedOutput::new(c);
    // Safety: the cluster hands out each ordinal exactly once
    cluster.run(|core| unsafe { matmul_tiled_mt(core, kernel, a, b, &out, steps) });
}
