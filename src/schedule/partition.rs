//! Static column ownership across cores.

use std::ops::Range;

/// Which output columns one core owns.
///
/// Columns are grouped into blocks of `k_step`. Block `b` belongs to core
/// `b % cores`, so each core owns an interleaved stride of blocks
/// `core, core + cores, core + 2 * cores, ...`. The trailing partial block
/// (present when `k_step` doesn't divide O) follows the same rule, which
/// means exactly one core runs the column cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorePartition {
    core: usize,
    cores: usize,
    k_step: usize,
    o: usize,
}

impl CorePartition {
    pub fn new(core: usize, cores: usize, k_step: usize, o: usize) -> Self {
        debug_assert!(cores > 0 && core < cores, "core {core} not in 0..{cores}");
        debug_assert!(k_step > 0);
        Self {
            core,
            cores,
            k_step,
            o,
        }
    }

    /// Partition for a single core that owns everything.
    pub fn whole(k_step: usize, o: usize) -> Self {
        Self::new(0, 1, k_step, o)
    }

    pub fn core(&self) -> usize {
        self.core
    }

    pub fn cores(&self) -> usize {
        self.cores
    }

    /// Number of complete column blocks in the whole output.
    fn full_blocks(&self) -> usize {
        self.o / self.k_step
    }

    /// End of the regular column grid (shared by all cores).
    pub fn k_end(&self) -> usize {
        self.full_blocks() * self.k_step
    }

    /// First column of every complete block this core owns, ascending.
    pub fn column_blocks(&self) -> impl Iterator<Item = usize> + use<> {
        let k_step = self.k_step;
        (self.core..self.full_blocks())
            .step_by(self.cores)
            .map(move |block| block * k_step)
    }

    /// Regular-grid columns this core owns, ascending.
    pub fn regular_columns(&self) -> impl Iterator<Item = usize> + use<> {
        let k_step = self.k_step;
        self.column_blocks().flat_map(move |k0| k0..k0 + k_step)
    }

    /// Columns past `k_end` this core owns. Empty unless this core owns the
    /// trailing partial block.
    pub fn remainder_columns(&self) -> Range<usize> {
        let k_end = self.k_end();
        if k_end < self.o && self.full_blocks() % self.cores == self.core {
            k_end..self.o
        } else {
            self.o..self.o
        }
    }

    /// Every column this core writes: regular blocks, then the remainder.
    pub fn owned_columns(&self) -> impl Iterator<Item = usize> + use<> {
        self.regular_columns().chain(self.remainder_columns())
    }

    pub fn owns_column(&self, k: usize) -> bool {
        k < self.o && (k / self.k_step) % self.cores == self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interleaved_blocks() {
        // O = 11, kSTEP = 2, 3 cores: blocks 0..5 full, block 5 partial (col 10)
        let p0 = CorePartition::new(0, 3, 2, 11);
        let p1 = CorePartition::new(1, 3, 2, 11);
        let p2 = CorePartition::new(2, 3, 2, 11);

        assert_eq!(p0.column_blocks().collect::<Vec<_>>(), vec![0, 6]);
        assert_eq!(p1.column_blocks().collect::<Vec<_>>(), vec![2, 8]);
        assert_eq!(p2.column_blocks().collect::<Vec<_>>(), vec![4]);

        assert!(p0.remainder_columns().is_empty());
        assert!(p1.remainder_columns().is_empty());
        assert_eq!(p2.remainder_columns(), 10..11);

        assert_eq!(
            p2.owned_columns().collect::<Vec<_>>(),
            vec![4, 5, 10]
        );
    }

    #[test]
    fn test_owns_column_agrees_with_enumeration() {
        for cores in 1..6 {
            for k_step in 1..5 {
                for o in 1..20 {
                    for core in 0..cores {
                        let p = CorePartition::new(core, cores, k_step, o);
                        let listed: Vec<usize> = p.owned_columns().collect();
                        let by_test: Vec<usize> = (0..o).filter(|&k| p.owns_column(k)).collect();
                        assert_eq!(listed, by_test, "core {core}/{cores} k_step {k_step} o {o}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_more_cores_than_blocks() {
        // O = 3, kSTEP = 4: no full block, partial block 0 goes to core 0
        let p0 = CorePartition::new(0, 8, 4, 3);
        let p5 = CorePartition::new(5, 8, 4, 3);
        assert_eq!(p0.k_end(), 0);
        assert_eq!(p0.remainder_columns(), 0..3);
        assert_eq!(p5.owned_columns().count(), 0);
    }

    #[test]
    fn test_whole_owns_everything() {
        let p = CorePartition::whole(3, 10);
        assert_eq!(p.owned_columns().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
    }
}
