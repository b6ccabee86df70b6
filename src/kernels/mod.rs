//! Multiply-accumulate kernels for the inner loop of matrix multiplication.
//!
//! A kernel is a strategy object: the tiled engine decides *which* elements
//! to combine, the kernel decides *how* a product is formed and summed. The
//! regular pass feeds it contiguous j-tiles (A row segment and a packed B
//! column segment) through [`MacKernel::dot`]; the cleanup pass uses the
//! single-step [`MacKernel::mac`] in its strided fallback loops.
//!
//! Available kernels:
//! - `scalar`: portable baseline, always available
//! - `avx2`: AVX2 dot products for 8, 16 and 32-bit elements (feature `simd`, x86_64)
//! - `fixed_point`: Q-format products with a rounding right shift

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub mod avx2;
pub mod fixed_point;
pub mod scalar;

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub use avx2::SimdKernel;
pub use fixed_point::FixedPointKernel;
pub use scalar::ScalarKernel;

use crate::element::{Acc, Element};

/// Multiply-accumulate primitive used by the tiled engine.
///
/// Implementations must keep `dot` consistent with folding `mac` over the
/// pairs, so the regular pass and the cleanup pass agree bit for bit.
pub trait MacKernel<T: Element>: Sync {
    fn name(&self) -> &'static str;

    /// `acc + a * b` at full accumulator width.
    fn mac(&self, acc: Acc, a: T, b: T) -> Acc;

    /// `acc + sum(a[j] * b[j])` over two equal-length contiguous slices.
    #[inline]
    fn dot(&self, a: &[T], b: &[T], acc: Acc) -> Acc {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b)
            .fold(acc, |acc, (&x, &y)| self.mac(acc, x, y))
    }
}

/// Which plain-integer kernel to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelStrategy {
    Scalar,
    /// AVX2 dot products. Only selectable when built with `simd` on x86_64.
    Simd,
}

impl KernelStrategy {
    /// Picks the fastest kernel this build and CPU support.
    pub fn detect() -> Self {
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        {
            if is_x86_feature_detected!("avx2") {
                return Self::Simd;
            }
        }
        Self::Scalar
    }
}

/// Enum dispatch over [`KernelStrategy`].
#[derive(Debug, Clone, Copy)]
pub enum DispatchKernel {
    Scalar(ScalarKernel),
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    Simd(SimdKernel),
}

impl DispatchKernel {
    pub fn new(strategy: KernelStrategy) -> Self {
        match strategy {
            #[cfg(all(feature = "simd", target_arch = "x86_64"))]
            KernelStrategy::Simd => Self::Simd(SimdKernel::new()),
            _ => Self::Scalar(ScalarKernel),
        }
    }

    pub fn detect() -> Self {
        Self::new(KernelStrategy::detect())
    }
}

macro_rules! impl_dispatch {
    ($($t:ty),*) => {$(
        impl MacKernel<$t> for DispatchKernel {
            fn name(&self) -> &'static str {
                match self {
                    Self::Scalar(k) => <ScalarKernel as MacKernel<$t>>::name(k),
                    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
                    Self::Simd(k) => <SimdKernel as MacKernel<$t>>::name(k),
                }
            }

            #[inline(always)]
            fn mac(&self, acc: Acc, a: $t, b: $t) -> Acc {
                // every strategy shares the scalar product
                ScalarKernel.mac(acc, a, b)
            }

            #[inline]
            fn dot(&self, a: &[$t], b: &[$t], acc: Acc) -> Acc {
                match self {
                    Self::Scalar(k) => k.dot(a, b, acc),
                    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
                    Self::Simd(k) => k.dot(a, b, acc),
                }
            }
        }
    )*};
}

impl_dispatch!(i8, i16, i32);
