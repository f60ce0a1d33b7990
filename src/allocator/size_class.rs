use super::constants::{FLAG_SIZE, MIN_CLASS_SIZE};
use std::fmt;

/// A power-of-two block size between 8 and half a page.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SizeClass(usize);

/// How a request of a given size is going to be served.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Request {
    Small(SizeClass),
    Pages(usize),
}

impl SizeClass {
    /// Every class for the given page size, smallest first.
    pub fn all(page_size: usize) -> impl Iterator<Item = SizeClass> {
        let max = page_size / 2;

        std::iter::successors(Some(MIN_CLASS_SIZE), |size| Some(size << 1))
            .take_while(move |size| *size <= max)
            .map(SizeClass)
    }

    /// Rounds a request up to its class. The extra byte holds the block's
    /// free flag. Returns None once the rounded size no longer fits a class.
    pub fn for_size(size: usize, page_size: usize) -> Option<SizeClass> {
        let rounded = size
            .checked_add(FLAG_SIZE)?
            .checked_next_power_of_two()?
            .max(MIN_CLASS_SIZE);

        if rounded <= page_size / 2 {
            Some(SizeClass(rounded))
        } else {
            None
        }
    }

    pub fn size(&self) -> usize {
        self.0
    }

    /// Bytes a caller may use inside one block.
    pub fn payload(&self) -> usize {
        self.0 - FLAG_SIZE
    }

    pub fn blocks_per_page(&self, page_size: usize) -> usize {
        page_size / self.0
    }

    /// Position of this class in the registry's bucket table.
    pub fn index(&self) -> usize {
        (self.0.trailing_zeros() - MIN_CLASS_SIZE.trailing_zeros()) as usize
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Request {
    pub fn classify(size: usize, page_size: usize) -> Request {
        if size <= page_size / 2 {
            if let Some(class) = SizeClass::for_size(size, page_size) {
                return Request::Small(class);
            }
        }

        Request::Pages(pages_for(size, page_size))
    }
}

/// Whole pages needed to hold `size` bytes; never less than one.
pub fn pages_for(size: usize, page_size: usize) -> usize {
    size.div_ceil(page_size).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: usize = 4096;

    #[test]
    fn classes_span_eight_to_half_page() {
        let sizes: Vec<usize> = SizeClass::all(PAGE).map(|c| c.size()).collect();

        assert_eq!(sizes, vec![8, 16, 32, 64, 128, 256, 512, 1024, 2048]);
    }

    #[test]
    fn rounding_reserves_flag_byte() {
        assert_eq!(SizeClass::for_size(0, PAGE).unwrap().size(), 8);
        assert_eq!(SizeClass::for_size(1, PAGE).unwrap().size(), 8);
        assert_eq!(SizeClass::for_size(7, PAGE).unwrap().size(), 8);
        assert_eq!(SizeClass::for_size(8, PAGE).unwrap().size(), 16);
        assert_eq!(SizeClass::for_size(10, PAGE).unwrap().size(), 16);
        assert_eq!(SizeClass::for_size(1023, PAGE).unwrap().size(), 1024);
        assert_eq!(SizeClass::for_size(1024, PAGE).unwrap().size(), 2048);
    }

    #[test]
    fn half_page_request_needs_a_page() {
        assert_eq!(SizeClass::for_size(2048, PAGE), None);
        assert_eq!(Request::classify(2048, PAGE), Request::Pages(1));
        assert_eq!(
            Request::classify(2047, PAGE),
            Request::Small(SizeClass::for_size(2047, PAGE).unwrap())
        );
    }

    #[test]
    fn large_requests_round_up_to_pages() {
        assert_eq!(Request::classify(3000, PAGE), Request::Pages(1));
        assert_eq!(Request::classify(4096, PAGE), Request::Pages(1));
        assert_eq!(Request::classify(4097, PAGE), Request::Pages(2));
        assert_eq!(Request::classify(5000, PAGE), Request::Pages(2));
    }

    #[test]
    fn class_indices_are_dense() {
        for (i, class) in SizeClass::all(PAGE).enumerate() {
            assert_eq!(class.index(), i);
        }
    }

    #[test]
    fn huge_request_does_not_overflow() {
        assert_eq!(SizeClass::for_size(usize::MAX, PAGE), None);
        assert_eq!(Request::classify(usize::MAX, PAGE), Request::Pages(usize::MAX / PAGE + 1));
    }
}
