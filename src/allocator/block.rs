use super::allocator::PageAllocator;
use super::arena::{Address, PageIndex};
use super::constants::{FREE_MARK, USED_MARK};
use super::header::PageState;
use super::size_class::SizeClass;
use crate::error::AllocError;
use log::trace;

// Block bookkeeping for divided pages. Every block starts with a flag byte
// that reads FREE_MARK or USED_MARK.
impl PageAllocator {
    /// Takes a page from the pool, cuts it into blocks of `class` and
    /// registers it in the class bucket. None when the pool is empty.
    pub(super) fn divide(&mut self, class: SizeClass) -> Option<PageIndex> {
        let page = self.pool.take()?;
        let blocks = class.blocks_per_page(self.config.page_size);

        for block in self.arena.page_mut(page).chunks_exact_mut(class.size()) {
            block[0] = FREE_MARK;
        }

        self.directory.set(
            page,
            PageState::Divided {
                class,
                free_blocks: blocks,
                next_free: Some(0),
            },
        );
        self.registry.insert(class, page);

        trace!("divided page {page} into {blocks} blocks of {class}");

        Some(page)
    }

    pub(super) fn alloc_block(&mut self, class: SizeClass) -> Option<Address> {
        if self.registry.is_empty(class) {
            self.divide(class)?;
        }

        let page = self.registry.first(class)?;

        let PageState::Divided {
            free_blocks,
            next_free: Some(block),
            ..
        } = self.directory.get(page)
        else {
            unreachable!("page {page} is in the {class} bucket without a free block");
        };

        let addr = self.block_address(page, class, block);
        let free_blocks = free_blocks - 1;

        self.arena.set_byte(addr, USED_MARK);

        let next_free = if free_blocks > 0 {
            self.find_free_block(page, class)
        } else {
            self.registry.remove(class, page);
            None
        };

        self.directory.set(
            page,
            PageState::Divided {
                class,
                free_blocks,
                next_free,
            },
        );

        Some(addr)
    }

    /// Returns the block at `addr` to its page. A page that ends up with
    /// every block free goes back to the pool.
    pub(super) fn free_block(&mut self, page: PageIndex, addr: Address) -> Result<(), AllocError> {
        let PageState::Divided {
            class,
            free_blocks,
            next_free,
        } = self.directory.get(page)
        else {
            return Err(AllocError::InvalidAddress(addr));
        };

        let block = self
            .block_index(page, class, addr)
            .ok_or(AllocError::InvalidAddress(addr))?;

        if !self.block_in_use(page, class, block) {
            return Err(AllocError::AlreadyFree(addr));
        }

        self.arena.set_byte(addr, FREE_MARK);

        let free_blocks = free_blocks + 1;

        if free_blocks == class.blocks_per_page(self.config.page_size) {
            self.directory.reset(page);
            self.pool.give(page);
            self.registry.remove(class, page);

            trace!("page {page} of class {class} is empty again");

            return Ok(());
        }

        self.directory.set(
            page,
            PageState::Divided {
                class,
                free_blocks,
                next_free: Some(next_free.map_or(block, |next| next.min(block))),
            },
        );

        // a full page is out of its bucket until one block frees up
        if free_blocks == 1 {
            self.registry.insert(class, page);
        }

        Ok(())
    }

    /// Index of the block starting exactly at `addr`.
    pub(super) fn block_index(&self, page: PageIndex, class: SizeClass, addr: Address) -> Option<usize> {
        let offset = addr.offset().checked_sub(self.arena.page_base(page).offset())?;

        if offset < self.config.page_size && offset % class.size() == 0 {
            Some(offset / class.size())
        } else {
            None
        }
    }

    pub(super) fn block_address(&self, page: PageIndex, class: SizeClass, block: usize) -> Address {
        Address::new(self.arena.page_base(page).offset() + block * class.size())
    }

    pub(super) fn block_in_use(&self, page: PageIndex, class: SizeClass, block: usize) -> bool {
        self.arena.byte(self.block_address(page, class, block)) == USED_MARK
    }

    /// Scans the page from its start for the first free block.
    fn find_free_block(&self, page: PageIndex, class: SizeClass) -> Option<usize> {
        self.arena
            .page(page)
            .chunks_exact(class.size())
            .position(|block| block[0] == FREE_MARK)
    }
}
