// Leading byte of every block inside a divided page.
pub const FREE_MARK: u8 = 1;
pub const USED_MARK: u8 = 0;

// Bytes of a block taken by the free/used flag; the payload starts after it.
pub const FLAG_SIZE: usize = 1;

pub const MIN_CLASS_SIZE: usize = 8;
