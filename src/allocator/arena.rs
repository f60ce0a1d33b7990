use std::fmt;

/// A location inside the arena, stored as a byte offset from its start.
///
/// Addresses are only meaningful to the allocator that produced them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(usize);

impl Address {
    pub fn new(offset: usize) -> Self {
        Self(offset)
    }

    pub fn offset(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#08x}", self.0)
    }
}

pub type PageIndex = usize;

/// The fixed-size byte buffer every allocation lives in.
pub struct Arena {
    memory: Box<[u8]>,
    page_size: usize,
}

impl Arena {
    pub fn new(page_size: usize, page_count: usize) -> Self {
        Self {
            memory: vec![0u8; page_size * page_count].into_boxed_slice(),
            page_size,
        }
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr.offset() < self.memory.len()
    }

    /// The page an in-bounds address falls in.
    pub fn page_of(&self, addr: Address) -> Option<PageIndex> {
        if self.contains(addr) {
            Some(addr.offset() / self.page_size)
        } else {
            None
        }
    }

    pub fn page_base(&self, page: PageIndex) -> Address {
        Address(page * self.page_size)
    }

    pub fn page(&self, page: PageIndex) -> &[u8] {
        let start = page * self.page_size;

        &self.memory[start..start + self.page_size]
    }

    pub fn page_mut(&mut self, page: PageIndex) -> &mut [u8] {
        let start = page * self.page_size;

        &mut self.memory[start..start + self.page_size]
    }

    pub fn byte(&self, addr: Address) -> u8 {
        self.memory[addr.offset()]
    }

    pub fn set_byte(&mut self, addr: Address, value: u8) {
        self.memory[addr.offset()] = value;
    }

    pub fn slice(&self, addr: Address, len: usize) -> &[u8] {
        &self.memory[addr.offset()..addr.offset() + len]
    }

    pub fn slice_mut(&mut self, addr: Address, len: usize) -> &mut [u8] {
        &mut self.memory[addr.offset()..addr.offset() + len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_lookup() {
        let arena = Arena::new(4096, 4);

        assert_eq!(arena.page_of(Address::new(0)), Some(0));
        assert_eq!(arena.page_of(Address::new(4095)), Some(0));
        assert_eq!(arena.page_of(Address::new(4096)), Some(1));
        assert_eq!(arena.page_of(Address::new(4 * 4096 - 1)), Some(3));
        assert_eq!(arena.page_of(Address::new(4 * 4096)), None);
        assert_eq!(arena.page_base(2), Address::new(8192));
    }

    #[test]
    fn pages_are_disjoint() {
        let mut arena = Arena::new(64, 2);

        arena.page_mut(1).fill(7);

        assert!(arena.page(0).iter().all(|b| *b == 0));
        assert!(arena.page(1).iter().all(|b| *b == 7));
        assert_eq!(arena.byte(Address::new(64)), 7);
    }
}
