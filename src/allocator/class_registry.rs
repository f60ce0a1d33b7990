use super::arena::PageIndex;
use super::size_class::SizeClass;
use std::collections::BTreeSet;

/// One bucket per size class, each listing the divided pages of that class
/// which still have a free block, lowest address first.
pub struct ClassRegistry {
    buckets: Vec<BTreeSet<PageIndex>>,
}

impl ClassRegistry {
    pub fn new(page_size: usize) -> Self {
        Self {
            buckets: SizeClass::all(page_size).map(|_| BTreeSet::new()).collect(),
        }
    }

    pub fn first(&self, class: SizeClass) -> Option<PageIndex> {
        self.buckets[class.index()].first().copied()
    }

    pub fn insert(&mut self, class: SizeClass, page: PageIndex) {
        self.buckets[class.index()].insert(page);
    }

    pub fn remove(&mut self, class: SizeClass, page: PageIndex) -> bool {
        self.buckets[class.index()].remove(&page)
    }

    pub fn is_empty(&self, class: SizeClass) -> bool {
        self.buckets[class.index()].is_empty()
    }

    #[cfg(test)]
    pub fn pages(&self, class: SizeClass) -> impl Iterator<Item = PageIndex> + '_ {
        self.buckets[class.index()].iter().copied()
    }

    #[cfg(test)]
    pub fn all_empty(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_are_per_class() {
        let mut registry = ClassRegistry::new(4096);
        let small = SizeClass::for_size(10, 4096).unwrap();
        let big = SizeClass::for_size(1000, 4096).unwrap();

        registry.insert(small, 5);
        registry.insert(small, 2);

        assert_eq!(registry.first(small), Some(2));
        assert!(registry.is_empty(big));
        assert!(!registry.all_empty());

        assert!(registry.remove(small, 2));
        assert!(!registry.remove(small, 2));
        assert_eq!(registry.pages(small).collect::<Vec<_>>(), vec![5]);
    }
}
