use super::arena::{Address, Arena, PageIndex};
use super::class_registry::ClassRegistry;
use super::constants::FLAG_SIZE;
use super::header::{PageDirectory, PageState};
use super::page_pool::PagePool;
use super::size_class::{Request, SizeClass};
use crate::config::AllocatorConfig;
use crate::error::AllocError;
use crate::metrics::{AllocMetrics, Counters};
use log::{debug, warn};

/// A page-based allocator over one fixed-size arena.
///
/// Requests of up to half a page are served from pages cut into power-of-two
/// blocks, anything larger gets a chain of whole pages. All bookkeeping lives
/// in this value, so independent allocators never share state.
///
/// The allocator is not synchronized. Every mutating operation takes
/// `&mut self`; share it between threads by wrapping it in a single `Mutex`.
///
/// # Examples
///
/// ```
/// use pagealloc::{AllocatorConfig, PageAllocator};
///
/// let mut alloc = PageAllocator::new(AllocatorConfig::new(4096, 4 * 4096)).unwrap();
///
/// let small = alloc.allocate(10).unwrap();
/// let large = alloc.allocate(5000).unwrap();
///
/// alloc.write(small, 0, b"hello").unwrap();
///
/// let mut buf = [0u8; 5];
/// alloc.read(small, 0, &mut buf).unwrap();
/// assert_eq!(&buf, b"hello");
///
/// alloc.free(small);
/// alloc.free(large);
/// assert_eq!(alloc.free_page_count(), 4);
/// ```
pub struct PageAllocator {
    pub(super) config: AllocatorConfig,
    pub(super) arena: Arena,
    pub(super) directory: PageDirectory,
    pub(super) pool: PagePool,
    pub(super) registry: ClassRegistry,
    pub(super) counters: Counters,
}

impl PageAllocator {
    pub fn new(config: AllocatorConfig) -> Result<Self, AllocError> {
        config.validate()?;

        Ok(Self::build(config))
    }

    fn build(config: AllocatorConfig) -> Self {
        let page_count = config.page_count();

        debug!(
            "page allocator: {} pages of {} bytes",
            page_count, config.page_size
        );

        Self {
            config,
            arena: Arena::new(config.page_size, page_count),
            directory: PageDirectory::new(page_count),
            pool: PagePool::new(page_count),
            registry: ClassRegistry::new(config.page_size),
            counters: Counters::default(),
        }
    }

    pub fn config(&self) -> AllocatorConfig {
        self.config
    }

    pub fn page_count(&self) -> usize {
        self.directory.len()
    }

    pub fn free_page_count(&self) -> usize {
        self.pool.len()
    }

    /// Free pages in ascending address order.
    pub fn free_pages(&self) -> impl Iterator<Item = PageIndex> + '_ {
        self.pool.iter()
    }

    pub fn page_state(&self, page: PageIndex) -> Option<PageState> {
        (page < self.directory.len()).then(|| self.directory.get(page))
    }

    /// Allocates `size` bytes, returning None when the arena has no room.
    pub fn allocate(&mut self, size: usize) -> Option<Address> {
        match self.try_allocate(size) {
            Ok(addr) => Some(addr),
            Err(err) => {
                warn!("allocate({size}): {err}");
                None
            }
        }
    }

    pub fn try_allocate(&mut self, size: usize) -> Result<Address, AllocError> {
        let result = self.allocate_inner(size);

        self.counters.record(&result, |c| c.allocs += 1);
        result
    }

    /// Resizes an allocation. On failure the error is logged and the input
    /// address is handed back unchanged, still owning its old contents.
    pub fn reallocate(&mut self, addr: Option<Address>, size: usize) -> Option<Address> {
        match self.try_reallocate(addr, size) {
            Ok(new_addr) => Some(new_addr),
            Err(err) => {
                warn!("reallocate({addr:?}, {size}): {err}");
                addr
            }
        }
    }

    pub fn try_reallocate(
        &mut self,
        addr: Option<Address>,
        size: usize,
    ) -> Result<Address, AllocError> {
        let Some(addr) = addr else {
            return self.try_allocate(size);
        };

        let result = self.reallocate_inner(addr, size);

        self.counters.record(&result, |c| c.reallocs += 1);
        result
    }

    /// Releases an allocation. Problems are logged and otherwise ignored.
    pub fn free(&mut self, addr: Address) {
        if let Err(err) = self.try_free(addr) {
            warn!("free({addr}): {err}");
        }
    }

    pub fn try_free(&mut self, addr: Address) -> Result<(), AllocError> {
        let result = self.free_inner(addr);

        self.counters.record(&result, |c| c.frees += 1);
        result
    }

    /// True when `addr` is the start of a live block or the head of a live
    /// chain.
    pub fn is_valid(&self, addr: Address) -> bool {
        let Some(page) = self.arena.page_of(addr) else {
            return false;
        };

        match self.directory.get(page) {
            PageState::Free => false,
            PageState::Divided { class, .. } => self
                .block_index(page, class, addr)
                .is_some_and(|block| self.block_in_use(page, class, block)),
            PageState::Chain { .. } => self.is_chain_head(page, addr),
        }
    }

    /// Bytes the caller may use at `addr`.
    pub fn capacity(&self, addr: Address) -> Result<usize, AllocError> {
        let page = self.live_page(addr)?;

        match self.directory.get(page) {
            PageState::Divided { class, .. } => Ok(class.payload()),
            PageState::Chain { total_size, .. } => Ok(total_size),
            PageState::Free => Err(AllocError::InvalidAddress(addr)),
        }
    }

    /// Copies `buf.len()` payload bytes starting at `offset` out of the
    /// allocation at `addr`.
    pub fn read(&self, addr: Address, offset: usize, buf: &mut [u8]) -> Result<(), AllocError> {
        let mut copied = 0;

        for (at, len) in self.segments(addr, offset, buf.len())? {
            buf[copied..copied + len].copy_from_slice(self.arena.slice(at, len));
            copied += len;
        }

        Ok(())
    }

    /// Copies `data` into the allocation at `addr`, starting at payload
    /// `offset`.
    pub fn write(&mut self, addr: Address, offset: usize, data: &[u8]) -> Result<(), AllocError> {
        let mut copied = 0;

        for (at, len) in self.segments(addr, offset, data.len())? {
            self.arena
                .slice_mut(at, len)
                .copy_from_slice(&data[copied..copied + len]);
            copied += len;
        }

        Ok(())
    }

    pub fn metrics(&self) -> AllocMetrics {
        let mut metrics = AllocMetrics {
            page_size: self.config.page_size,
            page_count: self.page_count(),
            free_pages: self.pool.len(),
            total_allocs: self.counters.allocs,
            total_reallocs: self.counters.reallocs,
            total_frees: self.counters.frees,
            failed_requests: self.counters.failures,
            ..Default::default()
        };

        for (_, state) in self.directory.iter() {
            match state {
                PageState::Free => {}
                PageState::Divided { class, free_blocks, .. } => {
                    metrics.divided_pages += 1;
                    metrics.live_blocks += class.blocks_per_page(self.config.page_size) - free_blocks;
                }
                PageState::Chain { .. } => metrics.chain_pages += 1,
            }
        }

        metrics
    }

    fn allocate_inner(&mut self, size: usize) -> Result<Address, AllocError> {
        let addr = match Request::classify(size, self.config.page_size) {
            Request::Small(class) => {
                let addr = self.alloc_block(class);

                if let Some(addr) = addr {
                    debug!("allocate({size}) -> {addr}, block of class {class}");
                }

                addr
            }
            Request::Pages(pages) => {
                let addr = self.alloc_chain(pages);

                if let Some(addr) = addr {
                    debug!("allocate({size}) -> {addr}, {pages} page(s)");
                }

                addr
            }
        };

        addr.ok_or(AllocError::OutOfMemory { requested: size })
    }

    fn reallocate_inner(&mut self, addr: Address, size: usize) -> Result<Address, AllocError> {
        let page = self.live_page(addr)?;

        match self.directory.get(page) {
            PageState::Chain { remaining, .. } => self.realloc_chain(page, remaining + 1, size),
            PageState::Divided { class, .. } => self.realloc_block(addr, class, size),
            PageState::Free => Err(AllocError::InvalidAddress(addr)),
        }
    }

    fn realloc_chain(
        &mut self,
        head: PageIndex,
        old_pages: usize,
        size: usize,
    ) -> Result<Address, AllocError> {
        let addr = self.arena.page_base(head);

        match Request::classify(size, self.config.page_size) {
            Request::Small(class) => {
                // The payload moves into a block, the whole chain goes back to the pool.
                let mut saved = vec![0u8; size];

                self.read(addr, 0, &mut saved)?;
                self.release_chain(head);

                let block = self
                    .alloc_block(class)
                    .ok_or(AllocError::OutOfMemory { requested: size })?;

                self.write(block, 0, &saved)?;
                debug!("reallocate({addr}, {size}) -> {block}, moved into class {class}");

                Ok(block)
            }
            Request::Pages(new_pages) if new_pages == old_pages => Ok(addr),
            Request::Pages(new_pages) if new_pages < old_pages => {
                self.shrink_chain(head, new_pages);
                debug!("reallocate({addr}, {size}): chain shrunk to {new_pages} page(s)");

                Ok(addr)
            }
            Request::Pages(new_pages) => {
                if !self.grow_chain(head, new_pages) {
                    return Err(AllocError::OutOfMemory { requested: size });
                }

                debug!("reallocate({addr}, {size}): chain grown to {new_pages} page(s)");

                Ok(addr)
            }
        }
    }

    fn realloc_block(
        &mut self,
        addr: Address,
        class: SizeClass,
        size: usize,
    ) -> Result<Address, AllocError> {
        if Request::classify(size, self.config.page_size) == Request::Small(class) {
            return Ok(addr);
        }

        let new_addr = self.allocate_inner(size)?;
        let len = class.payload().min(self.capacity(new_addr)?);
        let data = self.arena.slice(Address::new(addr.offset() + FLAG_SIZE), len).to_vec();

        self.write(new_addr, 0, &data)?;
        self.free_inner(addr)?;
        debug!("reallocate({addr}, {size}) -> {new_addr}");

        Ok(new_addr)
    }

    fn free_inner(&mut self, addr: Address) -> Result<(), AllocError> {
        let page = self
            .arena
            .page_of(addr)
            .ok_or(AllocError::InvalidAddress(addr))?;

        if self.pool.is_full() {
            return Err(AllocError::AlreadyAllFree);
        }

        match self.directory.get(page) {
            PageState::Free => Err(AllocError::AlreadyFree(addr)),
            PageState::Divided { .. } => {
                self.free_block(page, addr)?;
                debug!("free({addr}): block released");

                Ok(())
            }
            PageState::Chain { .. } => {
                if !self.is_chain_head(page, addr) {
                    return Err(AllocError::InvalidAddress(addr));
                }

                let pages = self.release_chain(page);
                debug!("free({addr}): {pages} page(s) released");

                Ok(())
            }
        }
    }

    /// The page of a live allocation, or InvalidAddress.
    fn live_page(&self, addr: Address) -> Result<PageIndex, AllocError> {
        if !self.is_valid(addr) {
            return Err(AllocError::InvalidAddress(addr));
        }

        self.arena
            .page_of(addr)
            .ok_or(AllocError::InvalidAddress(addr))
    }

    /// Arena pieces covering `len` payload bytes at `offset`, in payload order.
    fn segments(
        &self,
        addr: Address,
        offset: usize,
        len: usize,
    ) -> Result<Vec<(Address, usize)>, AllocError> {
        let capacity = self.capacity(addr)?;
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= capacity)
            .ok_or(AllocError::AccessOutOfRange {
                address: addr,
                offset,
                len,
                capacity,
            })?;
        let page = self.live_page(addr)?;

        if let PageState::Divided { .. } = self.directory.get(page) {
            return Ok(vec![(Address::new(addr.offset() + FLAG_SIZE + offset), len)]);
        }

        let page_size = self.config.page_size;
        let mut pieces = vec![];
        let mut start = 0;

        for link in self.directory.chain(page) {
            if start >= end {
                break;
            }

            let from = offset.max(start);
            let to = end.min(start + page_size);

            if from < to {
                pieces.push((Address::new(link * page_size + from - start), to - from));
            }

            start += page_size;
        }

        Ok(pieces)
    }
}

impl Default for PageAllocator {
    fn default() -> Self {
        Self::build(AllocatorConfig::default())
    }
}
