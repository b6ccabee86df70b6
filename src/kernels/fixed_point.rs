//! Fixed-point (Q-format) kernel.

use super::MacKernel;
use crate::element::{Acc, Element};

/// Multiplies Q-format values and rescales every product.
///
/// With A holding `x` fractional bits and B holding `y`, each product carries
/// `x + y` fractional bits. The kernel rounds it to nearest and shifts right
/// by `shift`, so C holds `x + y - shift` fractional bits:
///
/// `acc += (a * b + 2^(shift - 1)) >> shift`
///
/// Rescaling per product (rather than once per sum) keeps partial sums over
/// disjoint inner ranges exactly additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPointKernel {
    shift: u32,
    round: Acc,
}

impl FixedPointKernel {
    /// # Panics
    ///
    /// Panics if `shift >= 32`.
    pub fn new(shift: u32) -> Self {
        assert!(shift < Acc::BITS, "shift {shift} out of range");
        let round = if shift == 0 { 0 } else { 1 << (shift - 1) };
        Self { shift, round }
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }
}

impl<T: Element> MacKernel<T> for FixedPointKernel {
    fn name(&self) -> &'static str {
        "fixed-point"
    }

    #[inline(always)]
    fn mac(&self, acc: Acc, a: T, b: T) -> Acc {
        let product = a.widen().wrapping_mul(b.widen()).wrapping_add(self.round);
        acc.wrapping_add(product >> self.shift)
    }
}
