use super::allocator::Address;
use thiserror::Error;

/// Errors reported by a [`crate::PageAllocator`].
///
/// None of these are fatal. The sentinel operations (`allocate`, `reallocate`,
/// `free`) log them and hand back a sentinel value, the `try_*` variants
/// return them to the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// Neither a class bucket nor the free page pool can satisfy the request.
    #[error("out of memory: no capacity left for a request of {requested} bytes")]
    OutOfMemory { requested: usize },

    /// The address is not the start of a live block or the head of a chain.
    #[error("invalid address {0}")]
    InvalidAddress(Address),

    /// The address belongs to a page or block that is already free.
    #[error("address {0} is already free")]
    AlreadyFree(Address),

    /// A free was requested while nothing in the arena is allocated.
    #[error("all memory is already free")]
    AlreadyAllFree,

    /// A payload read or write would run past the end of the allocation.
    #[error("access of {len} bytes at offset {offset} overruns {address} (capacity {capacity})")]
    AccessOutOfRange {
        address: Address,
        offset: usize,
        len: usize,
        capacity: usize,
    },

    #[error("invalid allocator configuration: {0}")]
    InvalidConfig(&'static str),
}
