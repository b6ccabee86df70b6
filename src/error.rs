use thiserror::Error;

/// Configuration errors caught before a multiply call.
///
/// The compute entry points never return these. Hosts validate operands and
/// steps up front with the constructors and [`crate::check_operands`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatmulError {
    #[error("tile step along {axis} must be non-zero")]
    ZeroStep { axis: char },
    #[error("matrix dimensions must be non-zero, got {rows}x{cols}")]
    EmptyMatrix { rows: usize, cols: usize },
    #[error("stride {stride} is smaller than column count {cols}")]
    StrideTooSmall { stride: usize, cols: usize },
    #[error("buffer holds {got} elements but a {rows}x{cols} view with stride {stride} needs {needed}")]
    BufferTooSmall {
        rows: usize,
        cols: usize,
        stride: usize,
        needed: usize,
        got: usize,
    },
    #[error("operand mismatch: [{m}x{n}] @ [{n2}x{o}] -> [{c_rows}x{c_cols}]")]
    DimensionMismatch {
        m: usize,
        n: usize,
        n2: usize,
        o: usize,
        c_rows: usize,
        c_cols: usize,
    },
    #[error("core count must be non-zero")]
    NoCores,
}

pub type Result<T> = std::result::Result<T, MatmulError>;
