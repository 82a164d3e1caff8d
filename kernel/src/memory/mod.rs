//! Memory management.
//!
//! Page-granular allocation over a fixed-size bitmap. There is no
//! virtual-address translation here; a "page" is purely a unit of
//! ownership accounting.

pub mod page;

pub use page::{PageAllocator, PageRange};
