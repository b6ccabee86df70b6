//! Row-major matrix storage and views.
//!
//! The engine never allocates or resizes operands. Callers own the buffers
//! and hand in views carrying explicit (rows, cols, stride), so a view can
//! address a sub-block of a larger buffer.

pub mod naive;
pub mod rhs;
pub mod shared;

pub use rhs::Rhs;

use crate::error::{MatmulError, Result};

fn check_layout(len: usize, rows: usize, cols: usize, stride: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(MatmulError::EmptyMatrix { rows, cols });
    }
    if stride < cols {
        return Err(MatmulError::StrideTooSmall { stride, cols });
    }
    let needed = (rows - 1) * stride + cols;
    if len < needed {
        return Err(MatmulError::BufferTooSmall {
            rows,
            cols,
            stride,
            needed,
            got: len,
        });
    }
    Ok(())
}

/// Owned, contiguous row-major matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy + Default> Matrix<T> {
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "matrix dimensions must be non-zero, got {rows}x{cols}");
        Self {
            data: vec![T::default(); rows * cols],
            rows,
            cols,
        }
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        check_layout(data.len(), rows, cols, cols)?;
        if data.len() != rows * cols {
            return Err(MatmulError::BufferTooSmall {
                rows,
                cols,
                stride: cols,
                needed: rows * cols,
                got: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Builds a matrix by evaluating `f(row, col)` for every element.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        assert!(rows > 0 && cols > 0, "matrix dimensions must be non-zero, got {rows}x{cols}");
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { data, rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.cols + j]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn view(&self) -> MatrixRef<'_, T> {
        MatrixRef {
            data: &self.data,
            rows: self.rows,
            cols: self.cols,
            stride: self.cols,
        }
    }

    pub fn view_mut(&mut self) -> MatrixMut<'_, T> {
        MatrixMut {
            data: &mut self.data,
            rows: self.rows,
            cols: self.cols,
            stride: self.cols,
        }
    }
}

/// Read-only strided view.
#[derive(Debug, Clone, Copy)]
pub struct MatrixRef<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
    stride: usize,
}

impl<'a, T: Copy> MatrixRef<'a, T> {
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Result<Self> {
        Self::with_stride(data, rows, cols, cols)
    }

    /// View whose consecutive rows start `stride` elements apart.
    pub fn with_stride(data: &'a [T], rows: usize, cols: usize, stride: usize) -> Result<Self> {
        check_layout(data.len(), rows, cols, stride)?;
        Ok(Self {
            data,
            rows,
            cols,
            stride,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> T {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.stride + j]
    }

    #[inline(always)]
    pub fn row(&self, i: usize) -> &'a [T] {
        debug_assert!(i < self.rows);
        let start = i * self.stride;
        &self.data[start..start + self.cols]
    }
}

/// Mutable strided view.
#[derive(Debug)]
pub struct MatrixMut<'a, T> {
    data: &'a mut [T],
    rows: usize,
    cols: usize,
    stride: usize,
}

impl<'a, T: Copy> MatrixMut<'a, T> {
    pub fn new(data: &'a mut [T], rows: usize, cols: usize) -> Result<Self> {
        Self::with_stride(data, rows, cols, cols)
    }

    pub fn with_stride(
        data: &'a mut [T],
        rows: usize,
        cols: usize,
        stride: usize,
    ) -> Result<Self> {
        check_layout(data.len(), rows, cols, stride)?;
        Ok(Self {
            data,
            rows,
            cols,
            stride,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn get(&self, i: usize, j: usize) -> T {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.stride + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: T) {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.stride + j] = value;
    }

    pub fn view(&self) -> MatrixRef<'_, T> {
        MatrixRef {
            data: &*self.data,
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
        }
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strided_view_reads_sub_block() {
        // 3x4 buffer, view the right 3x2 block
        let buf: Vec<i16> = (0..12).collect();
        let view = MatrixRef::with_stride(&buf[2..], 3, 2, 4).unwrap();
        assert_eq!(view.row(0), &[2, 3]);
        assert_eq!(view.row(2), &[10, 11]);
        assert_eq!(view.get(1, 1), 7);
    }

    #[test]
    fn test_layout_validation() {
        let buf = [0i32; 6];
        assert_eq!(
            MatrixRef::with_stride(&buf, 2, 3, 2).unwrap_err(),
            MatmulError::StrideTooSmall { stride: 2, cols: 3 }
        );
        assert!(matches!(
            MatrixRef::new(&buf, 3, 3),
            Err(MatmulError::BufferTooSmall { needed: 9, got: 6, .. })
        ));
        assert!(matches!(
            MatrixRef::new(&buf, 0, 3),
            Err(MatmulError::EmptyMatrix { .. })
        ));
        // last row does not need the full stride
        assert!(MatrixRef::with_stride(&buf, 2, 2, 4).is_ok());
    }

    #[test]
    #[should_panic(expected = "must be non-zero")]
    fn test_zeros_rejects_empty_shape() {
        let _ = Matrix::<i16>::zeros(0, 3);
    }

    #[test]
    #[should_panic(expected = "must be non-zero")]
    fn test_from_fn_rejects_empty_shape() {
        let _ = Matrix::from_fn(4, 0, |i, j| (i + j) as i8);
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(Matrix::from_vec(2, 2, vec![1i8, 2, 3]).is_err());
        let m = Matrix::from_vec(2, 2, vec![1i8, 2, 3, 4]).unwrap();
        assert_eq!(m.get(1, 0), 3);
    }
}
