use super::arena::PageIndex;
use std::collections::BTreeSet;

/// Pages not committed to any allocation, kept in address order.
pub struct PagePool {
    free: BTreeSet<PageIndex>,
    page_count: usize,
}

impl PagePool {
    /// A pool holding every page of the arena.
    pub fn new(page_count: usize) -> Self {
        Self {
            free: (0..page_count).collect(),
            page_count,
        }
    }

    /// Removes the lowest-address free page.
    pub fn take(&mut self) -> Option<PageIndex> {
        self.free.pop_first()
    }

    pub fn give(&mut self, page: PageIndex) {
        debug_assert!(page < self.page_count);

        let inserted = self.free.insert(page);

        debug_assert!(inserted, "page {page} returned to the pool twice");
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// True when every page of the arena is in the pool.
    pub fn is_full(&self) -> bool {
        self.free.len() == self.page_count
    }

    pub fn iter(&self) -> impl Iterator<Item = PageIndex> + '_ {
        self.free.iter().copied()
    }
}
