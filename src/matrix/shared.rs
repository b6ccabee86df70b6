//! Destination matrix shared by all cores of one multiply call.

use std::marker::PhantomData;

use super::MatrixMut;
use crate::element::Acc;

/// C as seen by every participating core.
///
/// Built from an exclusive borrow of the destination, so nothing outside the
/// multiply call can read or write C until every core is done with it.
/// Cores write through raw element accesses; the column partition guarantees
/// that no two cores ever address the same element.
#[derive(Debug)]
pub struct SharedOutput<'a> {
    ptr: *mut Acc,
    rows: usize,
    cols: usize,
    stride: usize,
    _borrow: PhantomData<&'a mut [Acc]>,
}

// Safety: element writes are confined to disjoint column sets per core.
unsafe impl Send for SharedOutput<'_> {}
unsafe impl Sync for SharedOutput<'_> {}

impl<'a> SharedOutput<'a> {
    pub fn new(c: &'a mut MatrixMut<'_, Acc>) -> Self {
        Self {
            ptr: c.as_mut_ptr(),
            rows: c.rows(),
            cols: c.cols(),
            stride: c.stride(),
            _borrow: PhantomData,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `C[i][k] = value`
    ///
    /// # Safety
    ///
    /// The calling core must own column `k` and no other core may touch it
    /// for the duration of the call.
    #[inline(always)]
    pub(crate) unsafe fn store(&self, i: usize, k: usize, value: Acc) {
        debug_assert!(i < self.rows && k < self.cols);
        unsafe { *self.ptr.add(i * self.stride + k) = value };
    }

    /// `C[i][k] += value`, wrapping like the native accumulator.
    ///
    /// # Safety
    ///
    /// Same contract as [`SharedOutput::store`].
    #[inline(always)]
    pub(crate) unsafe fn accumulate(&self, i: usize, k: usize, value: Acc) {
        debug_assert!(i < self.rows && k < self.cols);
        unsafe {
            let slot = self.ptr.add(i * self.stride + k);
            *slot = (*slot).wrapping_add(value);
        }
    }
}
