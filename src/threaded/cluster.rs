//! Core identity and barrier, supplied by the host.

use std::sync::Barrier;
use std::thread;

use crate::error::{MatmulError, Result};

/// What the engine needs from the platform to run on several cores.
///
/// `num_cores` must be the same on every core and fixed for the whole call.
/// A core that never reaches [`CoreContext::barrier`] stalls the others
/// forever; there is no timeout.
pub trait CoreContext {
    /// This core's ordinal in `0..num_cores()`.
    fn core_id(&self) -> usize;

    fn num_cores(&self) -> usize;

    /// Blocks until all `num_cores()` cores have called it.
    fn barrier(&self);
}

/// The calling thread alone. The barrier is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleCore;

impl CoreContext for SingleCore {
    fn core_id(&self) -> usize {
        0
    }

    fn num_cores(&self) -> usize {
        1
    }

    fn barrier(&self) {}
}

/// One thread of a [`ThreadCluster`].
#[derive(Debug)]
pub struct ThreadCore<'a> {
    id: usize,
    cores: usize,
    barrier: &'a Barrier,
}

impl CoreContext for ThreadCore<'_> {
    fn core_id(&self) -> usize {
        self.id
    }

    fn num_cores(&self) -> usize {
        self.cores
    }

    fn barrier(&self) {
        self.barrier.wait();
    }
}

/// A fixed team of scoped threads sharing one barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadCluster {
    cores: usize,
}

impl ThreadCluster {
    pub fn new(cores: usize) -> Result<Self> {
        if cores == 0 {
            return Err(MatmulError::NoCores);
        }
        Ok(Self { cores })
    }

    /// One core per hardware thread.
    pub fn available() -> Self {
        let cores = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self { cores }
    }

    pub fn cores(&self) -> usize {
        self.cores
    }

    /// Runs `f` once per core, concurrently, and returns when all are done.
    ///
    /// The calling thread acts as core 0; the other cores are spawned. A core
    /// that panics before the barrier leaves the rest waiting on it.
    pub fn run<F>(&self, f: F)
    where
        F: Fn(&ThreadCore<'_>) + Sync,
    {
        let barrier = Barrier::new(self.cores);
        let cores = self.cores;
        let f = &f;
        let barrier = &barrier;

        thread::scope(|s| {
            for id in 1..cores {
                s.spawn(move || f(&ThreadCore { id, cores, barrier }));
            }
            f(&ThreadCore {
                id: 0,
                cores,
                barrier,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_zero_cores_rejected() {
        assert_eq!(ThreadCluster::new(0), Err(MatmulError::NoCores));
    }

    #[test]
    fn test_every_ordinal_runs_once() {
        let cluster = ThreadCluster::new(4).unwrap();
        let seen: Vec<AtomicUsize> = (0..4).map(|_| AtomicUsize::new(0)).collect();

        cluster.run(|core| {
            assert_eq!(core.num_cores(), 4);
            seen[core.core_id()].fetch_add(1, Ordering::Relaxed);
        });

        assert!(seen.iter().all(|n| n.load(Ordering::Relaxed) == 1));
    }

    #[test]
    fn test_barrier_orders_phases() {
        let cluster = ThreadCluster::new(3).unwrap();
        let arrived = AtomicUsize::new(0);

        cluster.run(|core| {
            arrived.fetch_add(1, Ordering::SeqCst);
            core.barrier();
            // nobody gets past the barrier before everyone arrived
            assert_eq!(arrived.load(Ordering::SeqCst), 3);
        });
    }
}
