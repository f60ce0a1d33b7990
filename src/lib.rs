//! A page-based memory allocator over a single fixed-size byte arena.
//!
//! The arena is cut into equal pages. Requests of up to half a page are
//! rounded to a power-of-two size class and served from a page divided into
//! blocks of that class; every block spends its first byte on a free/used
//! flag, so a request of `n` bytes lands in the class `next_power_of_two(n + 1)`.
//! Larger requests take a chain of whole pages linked through the page
//! directory, which need not be adjacent in the arena.
//! ```rust
//! use pagealloc::{AllocatorConfig, PageAllocator};
//!
//! let mut alloc = PageAllocator::new(AllocatorConfig::new(4096, 4 * 4096)).unwrap();
//!
//! let a = alloc.allocate(10).unwrap();      // one page of 16 byte blocks
//! let b = alloc.allocate(3000).unwrap();    // a single page chain
//! let c = alloc.allocate(5000).unwrap();    // a two page chain
//!
//! assert_eq!(alloc.free_page_count(), 0);
//! assert!(alloc.allocate(1).is_none());     // nothing left for class 8
//!
//! let c = alloc.reallocate(Some(c), 100).unwrap(); // moves into a block
//! assert_eq!(alloc.free_page_count(), 1);
//!
//! for addr in [a, b, c] {
//!     alloc.free(addr);
//! }
//! assert_eq!(alloc.free_page_count(), 4);
//! ```
//!
//! The allocator has no internal locking. Errors never panic: the sentinel
//! operations ([`PageAllocator::allocate`], [`PageAllocator::reallocate`],
//! [`PageAllocator::free`]) report problems through the `log` facade, and the
//! `try_*` variants return an [`AllocError`].

mod allocator;
mod config;
mod error;
mod metrics;

pub use allocator::{Address, PageAllocator, PageIndex, PageState, SizeClass};
pub use config::{AllocatorConfig, DEFAULT_ARENA_SIZE, DEFAULT_PAGE_COUNT, DEFAULT_PAGE_SIZE};
pub use error::AllocError;
pub use metrics::AllocMetrics;
