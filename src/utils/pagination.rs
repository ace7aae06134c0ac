use derive_more::Display;

/// A validated, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
    size: u32,
}

#[derive(Debug, Display, PartialEq, Eq)]
pub enum PageError {
    #[display(fmt = "pageNumber must be at least 1")]
    ZeroPageNumber,
    #[display(fmt = "pageSize must be at least 1")]
    ZeroPageSize,
    #[display(fmt = "pageSize must not exceed {}", max)]
    PageSizeTooLarge { max: u32 },
}

impl std::error::Error for PageError {}

impl PageRequest {
    pub fn new(number: u32, size: u32, max_size: u32) -> Result<Self, PageError> {
        if number == 0 {
            return Err(PageError::ZeroPageNumber);
        }
        if size == 0 {
            return Err(PageError::ZeroPageSize);
        }
        if size > max_size {
            return Err(PageError::PageSizeTooLarge { max: max_size });
        }
        Ok(Self { number, size })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Rows to skip before this page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.size))
    }
}

/// One page of rows plus the count of all matching rows before paging.
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}
