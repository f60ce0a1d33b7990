/// A 'snapshot' of the allocator's page usage and running totals.
///
/// Obtained by calling [`crate::PageAllocator::metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocMetrics {
    pub page_size: usize,
    pub page_count: usize,

    /// Pages sitting in the free pool.
    pub free_pages: usize,

    /// Pages cut into size class blocks.
    pub divided_pages: usize,

    /// Pages owned by multi-page allocations.
    pub chain_pages: usize,

    /// Occupied blocks across every divided page.
    pub live_blocks: usize,

    /// Number of successful allocations since the allocator was built.
    pub total_allocs: u64,

    /// Number of successful reallocations, no-ops included.
    pub total_reallocs: u64,

    /// Number of successful frees.
    pub total_frees: u64,

    /// Number of requests that were refused with an error.
    pub failed_requests: u64,
}

impl AllocMetrics {
    /// Fraction of the arena's pages committed to allocations.
    pub fn utilization(&self) -> f64 {
        if self.page_count == 0 {
            0.0
        } else {
            (self.page_count - self.free_pages) as f64 / self.page_count as f64
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub allocs: u64,
    pub reallocs: u64,
    pub frees: u64,
    pub failures: u64,
}

impl Counters {
    pub fn record<T, E>(&mut self, result: &Result<T, E>, hit: fn(&mut Counters)) {
        match result {
            Ok(_) => hit(self),
            Err(_) => self.failures += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utilization_of_half_used_arena() {
        let metrics = AllocMetrics {
            page_count: 8,
            free_pages: 4,
            ..Default::default()
        };

        assert_eq!(metrics.utilization(), 0.5);
    }

    #[test]
    fn counters_split_success_and_failure() {
        let mut counters = Counters::default();

        counters.record(&Ok::<(), ()>(()), |c| c.allocs += 1);
        counters.record(&Err::<(), ()>(()), |c| c.allocs += 1);

        assert_eq!(counters.allocs, 1);
        assert_eq!(counters.failures, 1);
    }
}
