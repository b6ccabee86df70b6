//! AVX2 dot-product kernel.
//!
//! 8- and 16-bit elements go through `vpmaddwd`: 16 lanes of i16 products,
//! adjacent pairs summed into 8 lanes of i32. 32-bit elements use
//! `vpmulld` + `vpaddd`. All of it wraps exactly like the scalar
//! accumulator, so results are bit-identical to [`ScalarKernel`].

use std::arch::x86_64::*;

use super::{MacKernel, ScalarKernel};
use crate::element::Acc;

/// Vectorized kernel. Falls back to the scalar path when the CPU lacks AVX2.
#[derive(Debug, Clone, Copy)]
pub struct SimdKernel {
    has_avx2: bool,
}

impl SimdKernel {
    pub fn new() -> Self {
        Self {
            has_avx2: is_x86_feature_detected!("avx2"),
        }
    }

    pub fn is_accelerated(&self) -> bool {
        self.has_avx2
    }
}

impl Default for SimdKernel {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! impl_simd {
    ($t:ty, $dot:ident) => {
        impl MacKernel<$t> for SimdKernel {
            fn name(&self) -> &'static str {
                if self.has_avx2 { "avx2" } else { "scalar" }
            }

            #[inline(always)]
            fn mac(&self, acc: Acc, a: $t, b: $t) -> Acc {
                ScalarKernel.mac(acc, a, b)
            }

            #[inline]
            fn dot(&self, a: &[$t], b: &[$t], acc: Acc) -> Acc {
                debug_assert_eq!(a.len(), b.len());
                if self.has_avx2 {
                    unsafe { $dot(a, b, acc) }
                } else {
                    ScalarKernel.dot(a, b, acc)
                }
            }
        }
    };
}

impl_simd!(i8, dot_i8_avx2);
impl_simd!(i16, dot_i16_avx2);
impl_simd!(i32, dot_i32_avx2);

/// Sum of the 8 i32 lanes, wrapping.
#[target_feature(enable = "avx2")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn horizontal_sum(v: __m256i) -> Acc {
    let mut lanes = [0i32; 8];
    _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, v);
    lanes.iter().fold(0, |s, &x| s.wrapping_add(x))
}

/// # Safety
///
/// CPU must support AVX2 and `a.len() == b.len()`.
#[target_feature(enable = "avx2")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn dot_i16_avx2(a: &[i16], b: &[i16], acc: Acc) -> Acc {
    let len = a.len().min(b.len());
    let chunks = len / 16;
    let mut sum = _mm256_setzero_si256();

    for c in 0..chunks {
        let va = _mm256_loadu_si256(a.as_ptr().add(c * 16) as *const __m256i);
        let vb = _mm256_loadu_si256(b.as_ptr().add(c * 16) as *const __m256i);
        sum = _mm256_add_epi32(sum, _mm256_madd_epi16(va, vb));
    }

    let mut total = acc.wrapping_add(horizontal_sum(sum));
    for j in chunks * 16..len {
        total = ScalarKernel.mac(total, a[j], b[j]);
    }
    total
}

/// # Safety
///
/// CPU must support AVX2 and `a.len() == b.len()`.
#[target_feature(enable = "avx2")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn dot_i8_avx2(a: &[i8], b: &[i8], acc: Acc) -> Acc {
    let len = a.len().min(b.len());
    let chunks = len / 16;
    let mut sum = _mm256_setzero_si256();

    for c in 0..chunks {
        // sign-extend 16 bytes to 16 words, then reuse the 16-bit path
        let va = _mm256_cvtepi8_epi16(_mm_loadu_si128(a.as_ptr().add(c * 16) as *const __m128i));
        let vb = _mm256_cvtepi8_epi16(_mm_loadu_si128(b.as_ptr().add(c * 16) as *const __m128i));
        sum = _mm256_add_epi32(sum, _mm256_madd_epi16(va, vb));
    }

    let mut total = acc.wrapping_add(horizontal_sum(sum));
    for j in chunks * 16..len {
        total = ScalarKernel.mac(total, a[j], b[j]);
    }
    total
}

/// # Safety
///
/// CPU must support AVX2 and `a.len() == b.len()`.
#[target_feature(enable = "avx2")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn dot_i32_avx2(a: &[i32], b: &[i32], acc: Acc) -> Acc {
    let len = a.len().min(b.len());
    let chunks = len / 8;
    let mut sum = _mm256_setzero_si256();

    for c in 0..chunks {
        let va = _mm256_loadu_si256(a.as_ptr().add(c * 8) as *const __m256i);
        let vb = _mm256_loadu_si256(b.as_ptr().add(c * 8) as *const __m256i);
        sum = _mm256_add_epi32(sum, _mm256_mullo_epi32(va, vb));
    }

    let mut total = acc.wrapping_add(horizontal_sum(sum));
    for j in chunks * 8..len {
        total = ScalarKernel.mac(total, a[j], b[j]);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lengths() -> impl Iterator<Item = usize> {
        [0, 1, 7, 15, 16, 17, 31, 32, 33, 100].into_iter()
    }

    #[test]
    fn test_i16_matches_scalar() {
        let kernel = SimdKernel::new();
        if !kernel.is_accelerated() {
            println!("Skipping - AVX2 not available");
            return;
        }

        for len in lengths() {
            let a: Vec<i16> = (0..len).map(|x| (x as i32 * 977 - 20000) as i16).collect();
            let b: Vec<i16> = (0..len).map(|x| (15000 - x as i32 * 331) as i16).collect();
            assert_eq!(
                kernel.dot(&a[..], &b[..], 3),
                ScalarKernel.dot(&a[..], &b[..], 3),
                "len {len}"
            );
        }
    }

    #[test]
    fn test_i16_extreme_pair_wraps_like_scalar() {
        let kernel = SimdKernel::new();
        if !kernel.is_accelerated() {
            println!("Skipping - AVX2 not available");
            return;
        }

        let a = [i16::MIN; 16];
        assert_eq!(
            kernel.dot(&a[..], &a[..], 0),
            ScalarKernel.dot(&a[..], &a[..], 0)
        );
    }

    #[test]
    fn test_i8_and_i32_match_scalar() {
        let kernel = SimdKernel::new();
        if !kernel.is_accelerated() {
            println!("Skipping - AVX2 not available");
            return;
        }

        for len in lengths() {
            let a: Vec<i8> = (0..len).map(|x| (x as i32 * 37 - 128) as i8).collect();
            let b: Vec<i8> = (0..len).map(|x| (x as i32 * -53 + 90) as i8).collect();
            assert_eq!(kernel.dot(&a[..], &b[..], -1), ScalarKernel.dot(&a[..], &b[..], -1));

            let a: Vec<i32> = (0..len).map(|x| x as i32 * 123_457 - 7).collect();
            let b: Vec<i32> = (0..len).map(|x| 99_991 - x as i32 * 13).collect();
            assert_eq!(kernel.dot(&a[..], &b[..], 0), ScalarKernel.dot(&a[..], &b[..], 0));
        }
    }
}
