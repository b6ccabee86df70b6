//! Element types accepted by the engine.

use std::fmt::Debug;

/// Native accumulator. Every element type widens to this and C is stored in it.
pub type Acc = i32;

/// An integer element that widens losslessly into [`Acc`].
pub trait Element: Copy + Default + Debug + Send + Sync + 'static {
    fn widen(self) -> Acc;
}

impl Element for i8 {
    #[inline(always)]
    fn widen(self) -> Acc {
        self as Acc
    }
}

impl Element for i16 {
    #[inline(always)]
    fn widen(self) -> Acc {
        self as Acc
    }
}

impl Element for i32 {
    #[inline(always)]
    fn widen(self) -> Acc {
        self
    }
}
