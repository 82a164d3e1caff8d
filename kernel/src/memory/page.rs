//! First-fit page allocator over a word-packed bitmap.
//!
//! The allocator hands out contiguous runs of page indices and tracks
//! them with one bit per page. Allocation scans from the lowest index
//! for the first run that fits (first-fit); freeing validates the whole
//! range before touching the bitmap, so a failed call never leaves a
//! partial mutation behind. O(capacity × npages) worst case, which is
//! fine at the capacities this kernel is configured for.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::config::PAGE_SIZE;
use crate::error::{KernelError, KernelResult};

/// A contiguous run of page indices `[start, start + count)` allocated
/// as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    /// First page index of the run.
    pub start: usize,
    /// Number of pages in the run.
    pub count: usize,
}

impl PageRange {
    /// Create a range covering `count` pages from `start`.
    pub fn new(start: usize, count: usize) -> Self {
        PageRange { start, count }
    }

    /// One-past-the-end page index.
    pub fn end(&self) -> usize {
        self.start + self.count
    }

    /// Size of the range in bytes.
    pub fn byte_len(&self) -> usize {
        self.count * PAGE_SIZE
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// Bitmap page allocator.
pub struct PageAllocator {
    /// One bit per page, 1 = in use.
    bitmap: Vec<u64>,
    /// Number of pages managed.
    capacity: usize,
    /// Pages currently marked in use.
    used: usize,
}

impl PageAllocator {
    /// Create an allocator managing `capacity` pages, all free.
    pub fn new(capacity: usize) -> Self {
        PageAllocator {
            bitmap: vec![0; capacity.div_ceil(64)],
            capacity,
            used: 0,
        }
    }

    /// Allocate the lowest run of `npages` consecutive free pages.
    ///
    /// Fails with [`KernelError::OutOfMemory`] when no run fits, and
    /// with [`KernelError::InvalidRange`] for a zero-page request.
    /// On failure the bitmap is untouched.
    pub fn alloc(&mut self, npages: usize) -> KernelResult<PageRange> {
        if npages == 0 {
            return Err(KernelError::InvalidRange);
        }

        let mut start = 0;
        while start + npages <= self.capacity {
            match (start..start + npages).find(|&page| self.is_set(page)) {
                // Restart the scan just past the occupied page.
                Some(occupied) => start = occupied + 1,
                None => {
                    let range = PageRange::new(start, npages);
                    for page in range.start..range.end() {
                        self.set(page);
                    }
                    self.used += npages;
                    return Ok(range);
                }
            }
        }

        Err(KernelError::OutOfMemory)
    }

    /// Free every page in `range`.
    ///
    /// Fails with [`KernelError::InvalidRange`] when the range is empty,
    /// lies outside the table, or any page in it is already free
    /// (double-free). On failure the bitmap is untouched.
    pub fn free(&mut self, range: PageRange) -> KernelResult<()> {
        // Checked: a range with start + count past usize::MAX must land
        // in InvalidRange, not wrap (or panic) in end().
        let end = match range.start.checked_add(range.count) {
            Some(end) => end,
            None => return Err(KernelError::InvalidRange),
        };
        if range.count == 0 || end > self.capacity {
            return Err(KernelError::InvalidRange);
        }
        if (range.start..range.end()).any(|page| !self.is_set(page)) {
            return Err(KernelError::InvalidRange);
        }

        for page in range.start..range.end() {
            self.clear(page);
        }
        self.used -= range.count;
        Ok(())
    }

    /// Number of pages managed.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pages currently in use.
    pub fn used_pages(&self) -> usize {
        self.used
    }

    /// Pages currently free.
    pub fn free_pages(&self) -> usize {
        self.capacity - self.used
    }

    /// Whether a single page is marked in use.
    pub fn is_allocated(&self, page: usize) -> bool {
        page < self.capacity && self.is_set(page)
    }

    fn is_set(&self, page: usize) -> bool {
        self.bitmap[page / 64] >> (page % 64) & 1 == 1
    }

    fn set(&mut self, page: usize) {
        self.bitmap[page / 64] |= 1 << (page % 64);
    }

    fn clear(&mut self, page: usize) {
        self.bitmap[page / 64] &= !(1 << (page % 64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_fit_prefers_lowest_run() {
        let mut alloc = PageAllocator::new(16);
        let a = alloc.alloc(4).unwrap();
        let b = alloc.alloc(4).unwrap();
        assert_eq!(a, PageRange::new(0, 4));
        assert_eq!(b, PageRange::new(4, 4));

        // Freeing the first run reopens the lowest hole.
        alloc.free(a).unwrap();
        let c = alloc.alloc(2).unwrap();
        assert_eq!(c, PageRange::new(0, 2));
    }

    #[test]
    fn alloc_skips_occupied_holes() {
        let mut alloc = PageAllocator::new(8);
        let a = alloc.alloc(2).unwrap();
        let b = alloc.alloc(2).unwrap();
        alloc.free(a).unwrap();

        // A 3-page request does not fit in the 2-page hole at 0.
        let c = alloc.alloc(3).unwrap();
        assert_eq!(c, PageRange::new(4, 3));
        assert_eq!(b, PageRange::new(2, 2));
    }

    #[test]
    fn zero_page_request_is_invalid() {
        let mut alloc = PageAllocator::new(8);
        assert_eq!(alloc.alloc(0), Err(KernelError::InvalidRange));
        assert_eq!(alloc.used_pages(), 0);
    }

    #[test]
    fn fragmented_table_reports_out_of_memory() {
        let mut alloc = PageAllocator::new(8);
        // Occupy every other pair, leaving 2-page holes only.
        let a = alloc.alloc(2).unwrap();
        let _b = alloc.alloc(2).unwrap();
        let c = alloc.alloc(2).unwrap();
        let _d = alloc.alloc(2).unwrap();
        alloc.free(a).unwrap();
        alloc.free(c).unwrap();

        let used_before = alloc.used_pages();
        assert_eq!(alloc.alloc(3), Err(KernelError::OutOfMemory));
        assert_eq!(alloc.used_pages(), used_before);
        // The holes are still allocatable.
        assert_eq!(alloc.alloc(2).unwrap(), PageRange::new(0, 2));
    }

    #[test]
    fn double_free_leaves_bitmap_unchanged() {
        let mut alloc = PageAllocator::new(8);
        let a = alloc.alloc(3).unwrap();
        let b = alloc.alloc(2).unwrap();
        alloc.free(a).unwrap();

        assert_eq!(alloc.free(a), Err(KernelError::InvalidRange));
        // Partially-free ranges are rejected without clearing the used part.
        assert_eq!(
            alloc.free(PageRange::new(2, 2)),
            Err(KernelError::InvalidRange)
        );
        assert!(alloc.is_allocated(b.start));
        assert_eq!(alloc.used_pages(), 2);
    }

    #[test]
    fn out_of_bounds_free_is_invalid() {
        let mut alloc = PageAllocator::new(8);
        assert_eq!(
            alloc.free(PageRange::new(6, 4)),
            Err(KernelError::InvalidRange)
        );
        assert_eq!(
            alloc.free(PageRange::new(0, 0)),
            Err(KernelError::InvalidRange)
        );
    }

    #[test]
    fn overflowing_range_free_is_invalid() {
        let mut alloc = PageAllocator::new(8);
        let live = alloc.alloc(2).unwrap();

        // start + count wraps usize; must be rejected, not wrapped into
        // a small in-bounds end.
        assert_eq!(
            alloc.free(PageRange::new(usize::MAX - 1, 4)),
            Err(KernelError::InvalidRange)
        );
        assert_eq!(
            alloc.free(PageRange::new(usize::MAX, 3)),
            Err(KernelError::InvalidRange)
        );
        // Accounting untouched by the rejected frees.
        assert_eq!(alloc.used_pages(), 2);
        alloc.free(live).unwrap();
        assert_eq!(alloc.used_pages(), 0);
    }

    #[test]
    fn accounting_tracks_outstanding_allocations() {
        let mut alloc = PageAllocator::new(64);
        let mut live = Vec::new();
        for npages in [1usize, 5, 2, 8, 3] {
            live.push(alloc.alloc(npages).unwrap());
        }
        let total: usize = live.iter().map(|r| r.count).sum();
        assert_eq!(alloc.used_pages(), total);

        let freed = live.remove(1);
        alloc.free(freed).unwrap();
        let total: usize = live.iter().map(|r| r.count).sum();
        assert_eq!(alloc.used_pages(), total);
        assert_eq!(alloc.free_pages(), 64 - total);
    }

    #[test]
    fn byte_len_uses_page_size() {
        assert_eq!(PageRange::new(0, 2).byte_len(), 2 * PAGE_SIZE);
    }
}
