use super::allocator::constants::MIN_CLASS_SIZE;
use super::error::AllocError;

/// This structure contains the configuration settings for a page allocator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Size of a single page in bytes. Must be a power of two large enough
    /// to hold two blocks of the smallest size class.
    pub page_size: usize,
    /// Total size of the arena in bytes. Must be a non-zero multiple of
    /// `page_size`; the page count is derived as `arena_size / page_size`.
    pub arena_size: usize,
}

pub const DEFAULT_PAGE_SIZE: usize = 4096;
pub const DEFAULT_PAGE_COUNT: usize = 16;
pub const DEFAULT_ARENA_SIZE: usize = DEFAULT_PAGE_SIZE * DEFAULT_PAGE_COUNT;

impl AllocatorConfig {
    pub fn new(page_size: usize, arena_size: usize) -> Self {
        Self {
            page_size,
            arena_size,
        }
    }

    /// Number of pages the arena is divided into.
    pub fn page_count(&self) -> usize {
        self.arena_size / self.page_size
    }

    /// Largest request still served from a size class.
    pub fn small_limit(&self) -> usize {
        self.page_size / 2
    }

    pub fn validate(&self) -> Result<(), AllocError> {
        if !self.page_size.is_power_of_two() {
            return Err(AllocError::InvalidConfig("page size must be a power of two"));
        }

        if self.page_size < MIN_CLASS_SIZE * 2 {
            return Err(AllocError::InvalidConfig(
                "page size must fit two blocks of the smallest class",
            ));
        }

        if self.arena_size == 0 || self.arena_size % self.page_size != 0 {
            return Err(AllocError::InvalidConfig(
                "arena size must be a non-zero multiple of the page size",
            ));
        }

        Ok(())
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_ARENA_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AllocatorConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.page_count(), DEFAULT_PAGE_COUNT);
        assert_eq!(config.small_limit(), 2048);
    }

    #[test]
    fn rejects_odd_page_size() {
        let config = AllocatorConfig::new(3000, 3000 * 4);

        assert!(matches!(config.validate(), Err(AllocError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_tiny_page_size() {
        let config = AllocatorConfig::new(8, 64);

        assert!(matches!(config.validate(), Err(AllocError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_ragged_arena() {
        assert!(AllocatorConfig::new(4096, 4096 * 2 + 1).validate().is_err());
        assert!(AllocatorConfig::new(4096, 0).validate().is_err());
    }
}
