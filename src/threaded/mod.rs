//! Multi-core GEMM.
//!
//! Every participating core runs the same call with its own ordinal. Columns
//! are split statically (see [`crate::schedule::CorePartition`]), so the
//! cores never contend for C and the only synchronization is one barrier at
//! the end of the call.
//!
//! - `cluster`: the core-identity/barrier capability and a thread-backed host
//! - `gemm_mt`: the per-core entry point

pub mod cluster;
pub mod gemm_mt;
