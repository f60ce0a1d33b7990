mod allocator;
mod arena;
mod block;
mod chain;
mod class_registry;
pub(crate) mod constants;
mod dump;
mod header;
mod page_pool;
mod size_class;


pub use allocator::PageAllocator;
pub use arena::{Address, PageIndex};
pub use header::PageState;
pub use size_class::SizeClass;
