//! Portable scalar kernel.

use super::MacKernel;
use crate::element::{Acc, Element};

/// Widen both operands, multiply, add. Wraps on overflow like the native
/// 32-bit accumulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarKernel;

impl<T: Element> MacKernel<T> for ScalarKernel {
    fn name(&self) -> &'static str {
        "scalar"
    }

    #[inline(always)]
    fn mac(&self, acc: Acc, a: T, b: T) -> Acc {
        acc.wrapping_add(a.widen().wrapping_mul(b.widen()))
    }

    #[inline]
    fn dot(&self, a: &[T], b: &[T], acc: Acc) -> Acc {
        debug_assert_eq!(a.len(), b.len());
        // two independent partial sums, like a 2-lane dot product
        let pairs = a.len() / 2;
        let mut s0: Acc = 0;
        let mut s1: Acc = 0;
        for p in 0..pairs {
            s0 = self.mac(s0, a[2 * p], b[2 * p]);
            s1 = self.mac(s1, a[2 * p + 1], b[2 * p + 1]);
        }
        let mut sum = acc.wrapping_add(s0).wrapping_add(s1);
        if a.len() % 2 == 1 {
            let last = a.len() - 1;
            sum = self.mac(sum, a[last], b[last]);
        }
        sum
    }
}
