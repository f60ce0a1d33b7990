use super::arena::PageIndex;
use super::size_class::SizeClass;

/// What a page is currently being used for.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub enum PageState {
    #[default]
    Free,

    /// The page is cut into equal blocks of one size class.
    Divided {
        class: SizeClass,
        free_blocks: usize,
        // lowest free block index, None when the page is full
        next_free: Option<usize>,
    },

    /// The page is one link of a multi-page allocation.
    Chain {
        total_size: usize,
        // pages after this one in the chain
        remaining: usize,
        next: Option<PageIndex>,
    },
}

impl PageState {
    pub fn name(&self) -> &'static str {
        match self {
            PageState::Free => "Free",
            PageState::Divided { .. } => "DividedIntoBlocks",
            PageState::Chain { .. } => "MultiPageBlock",
        }
    }

    pub fn is_free(&self) -> bool {
        *self == PageState::Free
    }
}

/// The page directory: one header per page, indexed by page number.
pub struct PageDirectory {
    headers: Vec<PageState>,
}

impl PageDirectory {
    pub fn new(page_count: usize) -> Self {
        Self {
            headers: vec![PageState::Free; page_count],
        }
    }

    pub fn get(&self, page: PageIndex) -> PageState {
        self.headers[page]
    }

    pub fn set(&mut self, page: PageIndex, state: PageState) {
        self.headers[page] = state;
    }

    pub fn reset(&mut self, page: PageIndex) {
        self.headers[page] = PageState::Free;
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PageIndex, &PageState)> {
        self.headers.iter().enumerate()
    }

    /// Pages of the chain starting at `head`, in link order.
    pub fn chain(&self, head: PageIndex) -> ChainIter<'_> {
        ChainIter {
            directory: self,
            current: Some(head),
        }
    }
}

pub struct ChainIter<'a> {
    directory: &'a PageDirectory,
    current: Option<PageIndex>,
}

impl Iterator for ChainIter<'_> {
    type Item = PageIndex;

    fn next(&mut self) -> Option<PageIndex> {
        let page = self.current?;

        self.current = match self.directory.get(page) {
            PageState::Chain { next, .. } => next,
            _ => None,
        };

        Some(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_directory_is_all_free() {
        let directory = PageDirectory::new(8);

        assert_eq!(directory.len(), 8);
        assert!(directory.iter().all(|(_, state)| state.is_free()));
    }

    #[test]
    fn chain_follows_links_not_adjacency() {
        let mut directory = PageDirectory::new(4);

        directory.set(3, PageState::Chain { total_size: 3 * 64, remaining: 2, next: Some(0) });
        directory.set(0, PageState::Chain { total_size: 3 * 64, remaining: 1, next: Some(2) });
        directory.set(2, PageState::Chain { total_size: 3 * 64, remaining: 0, next: None });

        assert_eq!(directory.chain(3).collect::<Vec<_>>(), vec![3, 0, 2]);
    }

    #[test]
    fn state_names() {
        assert_eq!(PageState::Free.name(), "Free");
        assert_eq!(
            PageState::Chain { total_size: 1, remaining: 0, next: None }.name(),
            "MultiPageBlock"
        );
    }
}
