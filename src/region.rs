//! Scoped allocation regions backing marshalled native data.
//!
//! A [`Region`] is an arena of native-addressable memory. Everything carved
//! from it is released in one step when the region is closed (dropped).
//! References handed out borrow the region, so safe code cannot keep using
//! marshalled memory after the region is gone.
//!
//! Three lifetime classes exist:
//!
//! - [`Scope::Call`]: opened right before one native call and closed right
//!   after it. Never outlives the creating call.
//! - [`Scope::Operation`]: owned by one pending asynchronous operation and
//!   closed by the path that resolves it.
//! - [`Scope::Resource`]: owned by a resource whose handle depends on memory
//!   the binding layer allocated. Only reachable through [`Region::promote`].

use std::alloc::Layout;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::ptr::{self, NonNull};

use bumpalo::Bump;

use crate::error::{Error, Result};
use crate::ffi::WGPUStringView;

/// Lifetime class of a [`Region`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Lives for one synchronous native call.
    Call,
    /// Lives until one pending operation resolves.
    Operation,
    /// Lives as long as the resource that owns it.
    Resource,
}

/// An arena of native memory with an explicit lifetime.
pub struct Region {
    bump: Bump,
    retained: RefCell<Vec<Box<dyn Any + Send>>>,
    scope: Scope,
}

impl Region {
    fn open(scope: Scope) -> Self {
        log::trace!("opening {:?} region", scope);
        Self {
            bump: Bump::new(),
            retained: RefCell::new(Vec::new()),
            scope,
        }
    }

    /// Open a call-scoped region.
    pub fn call() -> Self {
        Self::open(Scope::Call)
    }

    /// Open an operation-scoped region.
    pub fn operation() -> Self {
        Self::open(Scope::Operation)
    }

    /// The lifetime class of this region.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Turn an operation-scoped region into a resource-scoped one.
    ///
    /// Call-scoped regions cannot be promoted, and a resource-scoped region
    /// is already promoted.
    pub fn promote(mut self) -> Result<Self> {
        if self.scope != Scope::Operation {
            return Err(Error::InvalidArgument(format!(
                "cannot promote a {:?} region",
                self.scope
            )));
        }
        log::trace!(
            "promoting operation region ({} bytes) to resource scope",
            self.allocated_bytes()
        );
        self.scope = Scope::Resource;
        Ok(self)
    }

    /// Total bytes reserved by the arena.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }

    /// Carve `size` bytes aligned to `align`.
    pub fn allocate(&self, size: usize, align: usize) -> Result<NonNull<u8>> {
        let layout = Layout::from_size_align(size, align)
            .map_err(|e| Error::InvalidArgument(format!("bad layout {size}/{align}: {e}")))?;
        Ok(self.bump.alloc_layout(layout))
    }

    /// Copy a native struct into the region.
    pub fn alloc<T: Copy>(&self, value: T) -> &mut T {
        self.bump.alloc(value)
    }

    /// Copy a slice of native values into the region.
    ///
    /// An empty slice yields a null pointer and a zero count.
    pub fn slice<T: Copy>(&self, items: &[T]) -> (*const T, usize) {
        if items.is_empty() {
            return (ptr::null(), 0);
        }
        let copied: &[T] = self.bump.alloc_slice_copy(items);
        (copied.as_ptr(), copied.len())
    }

    /// Lay out `len` native structs contiguously, writing element `i` at
    /// `base + i * size_of::<T>()`.
    ///
    /// A zero length yields a null pointer and a zero count, not a
    /// zero-length allocation.
    pub fn array<T: Copy>(
        &self,
        len: usize,
        mut element: impl FnMut(usize) -> Result<T>,
    ) -> Result<(*const T, usize)> {
        if len == 0 {
            return Ok((ptr::null(), 0));
        }
        let layout = Layout::array::<T>(len)
            .map_err(|e| Error::InvalidArgument(format!("array of {len} elements: {e}")))?;
        let base = self.bump.alloc_layout(layout).cast::<T>().as_ptr();
        for i in 0..len {
            let value = element(i)?;
            // SAFETY: `base` has room for `len` elements of `T`.
            unsafe { base.add(i).write(value) };
        }
        Ok((base.cast_const(), len))
    }

    /// Copy a string as UTF-8 bytes and return an explicit-length view.
    ///
    /// No NUL terminator is written or counted. The empty string yields
    /// `{NULL, 0}`.
    pub fn str_view(&self, s: &str) -> WGPUStringView {
        if s.is_empty() {
            return WGPUStringView::EMPTY;
        }
        let bytes: &[u8] = self.bump.alloc_slice_copy(s.as_bytes());
        WGPUStringView {
            data: bytes.as_ptr().cast(),
            length: bytes.len(),
        }
    }

    /// Marshal an optional string; `None` yields the null view.
    pub fn opt_str_view(&self, s: Option<&str>) -> WGPUStringView {
        match s {
            Some(s) => self.str_view(s),
            None => WGPUStringView::NULL,
        }
    }

    /// Keep an owned value alive until the region closes and return a
    /// pointer to it that stays stable for that long.
    pub fn retain<T: Send + 'static>(&self, value: T) -> *const T {
        let boxed = Box::new(value);
        let ptr: *const T = &*boxed;
        self.retained.borrow_mut().push(boxed);
        ptr
    }

    /// Release everything allocated from this region.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        log::trace!(
            "closing {:?} region ({} bytes, {} retained values)",
            self.scope,
            self.bump.allocated_bytes(),
            self.retained.get_mut().len()
        );
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("scope", &self.scope)
            .field("allocated_bytes", &self.bump.allocated_bytes())
            .finish()
    }
}
