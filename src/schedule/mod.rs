//! Tile grid and per-core work assignment.
//!
//! The output space (M × O, with inner dimension N) is cut into a regular
//! grid of `iSTEP × jSTEP × kSTEP` tiles. Everything past the last full tile
//! along any dimension is left for the cleanup pass. Work is split across
//! cores purely by index arithmetic on the column dimension: no shared
//! scheduling state, nothing to lock.

pub mod partition;

pub use partition::CorePartition;

use crate::error::{MatmulError, Result};
use crate::matrix::{MatrixRef, Rhs};

/// Unrolling granularity along (rows, inner, columns).
///
/// Steps need not divide the matrix dimensions. Whatever doesn't fit is
/// handled by the cleanup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSteps {
    i: usize,
    j: usize,
    k: usize,
}

impl TileSteps {
    /// No unrolling: every element goes through the regular pass.
    pub const UNIT: Self = Self { i: 1, j: 1, k: 1 };

    /// 4 rows × 2 inner × 2 columns, sized for packed 16-bit pairs.
    pub const I16: Self = Self { i: 4, j: 2, k: 2 };

    /// 2 rows × 4 inner × 4 columns, sized for packed 8-bit quads.
    pub const I8: Self = Self { i: 2, j: 4, k: 4 };

    pub fn new(i: usize, j: usize, k: usize) -> Result<Self> {
        for (axis, step) in [('i', i), ('j', j), ('k', k)] {
            if step == 0 {
                return Err(MatmulError::ZeroStep { axis });
            }
        }
        Ok(Self { i, j, k })
    }

    pub fn i(&self) -> usize {
        self.i
    }

    pub fn j(&self) -> usize {
        self.j
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

impl Default for TileSteps {
    fn default() -> Self {
        Self::I16
    }
}

/// Problem size: A is M × N, B is N × O, C is M × O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatmulDims {
    pub m: usize,
    pub n: usize,
    pub o: usize,
}

impl MatmulDims {
    /// Dimensions of `A · B -> C`, checking that the three shapes agree.
    pub fn from_operands<'b, T: Copy + 'b>(
        a: MatrixRef<'_, T>,
        b: impl Into<Rhs<'b, T>>,
        c_rows: usize,
        c_cols: usize,
    ) -> Result<Self> {
        let b = b.into();
        if a.cols() != b.rows() || c_rows != a.rows() || c_cols != b.cols() {
            return Err(MatmulError::DimensionMismatch {
                m: a.rows(),
                n: a.cols(),
                n2: b.rows(),
                o: b.cols(),
                c_rows,
                c_cols,
            });
        }
        Ok(Self {
            m: a.rows(),
            n: a.cols(),
            o: b.cols(),
        })
    }
}

/// Where the regular grid stops along each dimension.
///
/// Each `x_end` is the largest multiple of its step not exceeding the
/// dimension, so `0 <= x_end <= X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub i_end: usize,
    pub j_end: usize,
    pub k_end: usize,
}

impl GridBounds {
    pub fn new(dims: MatmulDims, steps: TileSteps) -> Self {
        Self {
            i_end: dims.m - dims.m % steps.i,
            j_end: dims.n - dims.n % steps.j,
            k_end: dims.o - dims.o % steps.k,
        }
    }

    /// True when every dimension is an exact multiple of its step.
    pub fn is_exact(&self, dims: MatmulDims) -> bool {
        self.i_end == dims.m && self.j_end == dims.n && self.k_end == dims.o
    }
}

/// One `iSTEP × kSTEP` block of C in the regular grid. The regular pass
/// sums the whole `[0, j_end)` inner range into it, one j-tile at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegularTile {
    pub row: usize,
    pub col: usize,
}

/// Iteration bounds for one core's slice of the regular grid.
#[derive(Debug, Clone, Copy)]
pub struct TileScheduler {
    dims: MatmulDims,
    steps: TileSteps,
    bounds: GridBounds,
    partition: CorePartition,
}

impl TileScheduler {
    pub fn new(dims: MatmulDims, steps: TileSteps, core: usize, cores: usize) -> Self {
        Self {
            dims,
            steps,
            bounds: GridBounds::new(dims, steps),
            partition: CorePartition::new(core, cores, steps.k, dims.o),
        }
    }

    pub fn single(dims: MatmulDims, steps: TileSteps) -> Self {
        Self::new(dims, steps, 0, 1)
    }

    pub fn dims(&self) -> MatmulDims {
        self.dims
    }

    pub fn steps(&self) -> TileSteps {
        self.steps
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn partition(&self) -> &CorePartition {
        &self.partition
    }

    /// This core's regular tiles: owned column strides outermost, then
    /// row tiles. Yields nothing when M or O is below its step.
    pub fn tiles(&self) -> impl Iterator<Item = RegularTile> + use<> {
        let i_end = self.bounds.i_end;
        let i_step = self.steps.i;
        // tiles are still visited when j_end == 0: the regular pass assigns
        // an empty partial sum and cleanup adds the whole inner range
        self.partition.column_blocks().flat_map(move |col| {
            (0..i_end)
                .step_by(i_step)
                .map(move |row| RegularTile { row, col })
        })
    }
}
