//! Tiled fixed-point matrix multiplication for small multi-core targets.
//!
//! Computes C = A · B for 8/16/32-bit integer matrices into a 32-bit
//! accumulator matrix. The work is cut into a regular grid of
//! `iSTEP × jSTEP × kSTEP` tiles, handled by an unrolled fast path, and a
//! cleanup pass finishes whatever the grid didn't cover, so no dimension has
//! to be a multiple of its step. On several cores the output columns are
//! split statically by core ordinal; the cores never share an element of C
//! and synchronize only once, at the end.
//!
//! ## Usage
//!
//! ```
//! use tilemac::{Matrix, TileSteps, multiply};
//!
//! let a = Matrix::from_vec(2, 2, vec![1i16, 2, 3, 4]).unwrap();
//! let b = Matrix::from_vec(2, 2, vec![5i16, 6, 7, 8]).unwrap();
//! let mut c = Matrix::zeros(2, 2);
//!
//! multiply(a.view(), b.view(), &mut c.view_mut(), TileSteps::I16);
//! assert_eq!(c.as_slice(), &[19, 22, 43, 50]);
//! ```
//!
//! Spread over a team of threads:
//!
//! ```
//! use tilemac::{Matrix, ThreadCluster, TileSteps, multiply_parallel};
//!
//! let a = Matrix::from_fn(64, 48, |i, j| ((i + j) % 7) as i8);
//! let b = Matrix::from_fn(48, 30, |j, k| ((j * k) % 5) as i8);
//! let mut c = Matrix::zeros(64, 30);
//!
//! let cluster = ThreadCluster::new(4).unwrap();
//! multiply_parallel(a.view(), b.view(), &mut c.view_mut(), TileSteps::I8, &cluster);
//! ```
//!
//! When B is stored transposed (O × N), wrap it in [`Rhs::Transposed`]:
//!
//! ```
//! use tilemac::{Matrix, Rhs, TileSteps, multiply};
//!
//! let a = Matrix::from_vec(2, 2, vec![1i16, 2, 3, 4]).unwrap();
//! let bt = Matrix::from_vec(2, 2, vec![5i16, 7, 6, 8]).unwrap();
//! let mut c = Matrix::zeros(2, 2);
//!
//! multiply(a.view(), Rhs::Transposed(bt.view()), &mut c.view_mut(), TileSteps::I16);
//! assert_eq!(c.as_slice(), &[19, 22, 43, 50]);
//! ```
//!
//! Hosts with their own core runtime implement [`CoreContext`] and call
//! [`threaded::gemm_mt::matmul_tiled_mt`] on every core.
//!
//! ## What's inside
//!
//! - Scalar, AVX2 and Q-format multiply-accumulate kernels
//! - Packed-panel regular pass, remainder cleanup for all three dimensions
//! - Plain or transposed B operands, strided views of either
//! - Interleaved static column partitioning across cores

pub mod blocked;
pub mod element;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod schedule;
pub mod threaded;

pub use blocked::gemm::matmul_tiled;
pub use element::{Acc, Element};
pub use error::{MatmulError, Result};
pub use kernels::{DispatchKernel, FixedPointKernel, KernelStrategy, MacKernel, ScalarKernel};
pub use matrix::naive::matmul_naive;
pub use matrix::shared::SharedOutput;
pub use matrix::{Matrix, MatrixMut, MatrixRef, Rhs};
pub use schedule::{CorePartition, GridBounds, MatmulDims, TileScheduler, TileSteps};
pub use threaded::cluster::{CoreContext, SingleCore, ThreadCluster};
pub use threaded::gemm_mt::{matmul_tiled_mt, matmul_tiled_on};

/// Checks that `A · B -> C` shapes agree.
///
/// The multiply entry points assume this holds; call it first when the
/// shapes come from outside.
pub fn check_operands<'b, T: Copy + 'b>(
    a: MatrixRef<'_, T>,
    b: impl Into<Rhs<'b, T>>,
    c: &MatrixMut<'_, Acc>,
) -> Result<MatmulDims> {
    MatmulDims::from_operands(a, b, c.rows(), c.cols())
}

/// Matrix multiply: C = A * B
///
/// Picks the fastest available kernel for your CPU (AVX2 > scalar).
///
/// # Panics
///
/// Panics if the view shapes don't agree.
pub fn multiply<'b, T>(
    a: MatrixRef<'_, T>,
    b: impl Into<Rhs<'b, T>>,
    c: &mut MatrixMut<'_, Acc>,
    steps: TileSteps,
) where
    T: Element,
    DispatchKernel: MacKernel<T>,
{
    matmul_tiled(&DispatchKernel::detect(), a, b, c, steps);
}

/// Same as [`multiply`] but runs on every core of `cluster`.
///
/// The result is bit-identical to [`multiply`] for any core count.
pub fn multiply_parallel<'b, T>(
    a: MatrixRef<'_, T>,
    b: impl Into<Rhs<'b, T>>,
    c: &mut MatrixMut<'_, Acc>,
    steps: TileSteps,
    cluster: &ThreadCluster,
) where
    T: Element,
    DispatchKernel: MacKernel<T>,
{
    matmul_tiled_on(cluster, &DispatchKernel::detect(), a, b, c, steps);
}
