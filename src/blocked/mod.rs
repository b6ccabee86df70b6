//! Tiled integer GEMM for one core's share of the output.
//!
//! The work for a core is split in two phases that always run in order:
//! the regular pass over full `iSTEP × jSTEP × kSTEP` tiles, then the
//! cleanup pass for whatever the grid didn't cover. The single-core entry
//! point lives here; the multi-core one in [`crate::threaded`] runs the very
//! same phases on a narrower column partition.
//!
//! - `regular`: packed-panel fast path, calls the kernel per j-tile
//! - `cleanup`: inner, row and column remainders
//! - `gemm`: phase ordering and the single-core entry point

pub mod cleanup;
pub mod gemm;
pub mod regular;
