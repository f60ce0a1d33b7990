use super::allocator::PageAllocator;
use super::arena::{Address, PageIndex};
use super::header::PageState;
use log::trace;

// Multi-page allocations. A chain is a list of whole pages linked through
// their headers; the head page's base address is the allocation's address.
impl PageAllocator {
    /// Draws `pages` pages from the pool and links them. The pool is left
    /// untouched when it cannot cover the whole request.
    pub(super) fn alloc_chain(&mut self, pages: usize) -> Option<Address> {
        if self.pool.len() < pages {
            return None;
        }

        let links: Vec<PageIndex> = (0..pages).map_while(|_| self.pool.take()).collect();
        let head = *links.first()?;

        self.link_chain(&links);

        Some(self.arena.page_base(head))
    }

    /// Frees every page of the chain starting at `head`, returning how many
    /// there were.
    pub(super) fn release_chain(&mut self, head: PageIndex) -> usize {
        let links: Vec<PageIndex> = self.directory.chain(head).collect();

        for page in &links {
            self.directory.reset(*page);
            self.pool.give(*page);
        }

        trace!("released chain at page {head}: {links:?}");

        links.len()
    }

    /// Keeps the first `new_pages` links and frees the rest.
    pub(super) fn shrink_chain(&mut self, head: PageIndex, new_pages: usize) {
        let links: Vec<PageIndex> = self.directory.chain(head).collect();
        let (kept, released) = links.split_at(new_pages.min(links.len()));

        for page in released {
            self.directory.reset(*page);
            self.pool.give(*page);
        }

        self.link_chain(kept);
    }

    /// Appends pages until the chain is `new_pages` long. Returns false,
    /// without touching anything, if the pool is too small.
    pub(super) fn grow_chain(&mut self, head: PageIndex, new_pages: usize) -> bool {
        let mut links: Vec<PageIndex> = self.directory.chain(head).collect();
        let extra = new_pages.saturating_sub(links.len());

        if self.pool.len() < extra {
            return false;
        }

        links.extend((0..extra).map_while(|_| self.pool.take()));
        self.link_chain(&links);

        true
    }

    pub(super) fn is_chain_head(&self, page: PageIndex, addr: Address) -> bool {
        match self.directory.get(page) {
            PageState::Chain {
                total_size,
                remaining,
                ..
            } => {
                addr == self.arena.page_base(page)
                    && remaining + 1 == total_size / self.config.page_size
            }
            _ => false,
        }
    }

    /// Rewrites the headers of `links` to describe one chain in that order.
    fn link_chain(&mut self, links: &[PageIndex]) {
        let total_size = links.len() * self.config.page_size;

        for (i, page) in links.iter().enumerate() {
            self.directory.set(
                *page,
                PageState::Chain {
                    total_size,
                    remaining: links.len() - i - 1,
                    next: links.get(i + 1).copied(),
                },
            );
        }
    }
}
