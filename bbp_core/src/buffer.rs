use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::NonNull;

/// Alignment for direct buffers. Page-aligned so the memory is usable
/// for O_DIRECT file I/O and zero-copy network paths.
const DIRECT_ALIGNMENT: usize = 4096;

/// Memory placement of a buffer.
///
/// Direct buffers are page-aligned raw allocations suitable for kernel
/// bypass I/O; indirect buffers live on the ordinary heap. The two kinds
/// are pooled separately and never substituted for one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Page-aligned allocation for direct I/O
    Direct,
    /// Plain heap allocation
    Indirect,
}

/// A fixed-capacity, reusable byte buffer.
///
/// The capacity is chosen at allocation time and never changes. A logical
/// length tracks how many bytes have been written; clearing the buffer
/// resets the length to zero but does not zero the bytes, so a buffer
/// recycled through the pool may carry stale content past its length.
pub struct PooledBuffer {
    storage: Storage,
    len: usize,
}

enum Storage {
    Heap(Box<[u8]>),
    Aligned(AlignedBytes),
}

impl PooledBuffer {
    /// Allocate a fresh buffer of exactly `capacity` bytes.
    ///
    /// The reported capacity is always exactly the requested size, never
    /// rounded up by the allocator.
    pub fn allocate(capacity: usize, kind: BufferKind) -> Self {
        let storage = match kind {
            BufferKind::Direct => Storage::Aligned(AlignedBytes::allocate(capacity)),
            BufferKind::Indirect => Storage::Heap(vec![0u8; capacity].into_boxed_slice()),
        };
        Self { storage, len: 0 }
    }

    /// Total number of bytes this buffer can hold
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Heap(bytes) => bytes.len(),
            Storage::Aligned(bytes) => bytes.capacity(),
        }
    }

    /// Memory placement of this buffer
    pub fn kind(&self) -> BufferKind {
        match &self.storage {
            Storage::Heap(_) => BufferKind::Indirect,
            Storage::Aligned(_) => BufferKind::Direct,
        }
    }

    /// True for page-aligned direct buffers
    pub fn is_direct(&self) -> bool {
        self.kind() == BufferKind::Direct
    }

    /// Number of bytes currently written
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no bytes have been written since the last clear
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reset the logical length to zero.
    ///
    /// The underlying bytes are left as-is; only the write position moves.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append `src` after the bytes already written.
    ///
    /// # Panics
    ///
    /// Panics if the write would exceed the buffer's capacity.
    pub fn put_slice(&mut self, src: &[u8]) {
        let start = self.len;
        let end = start + src.len();
        assert!(
            end <= self.capacity(),
            "write of {} bytes at offset {start} exceeds buffer capacity {}",
            src.len(),
            self.capacity()
        );
        self.raw_mut()[start..end].copy_from_slice(src);
        self.len = end;
    }

    /// The bytes written so far
    pub fn as_slice(&self) -> &[u8] {
        &self.raw()[..self.len]
    }

    /// Mutable view of the bytes written so far
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let len = self.len;
        &mut self.raw_mut()[..len]
    }

    fn raw(&self) -> &[u8] {
        match &self.storage {
            Storage::Heap(bytes) => bytes,
            Storage::Aligned(bytes) => bytes.as_slice(),
        }
    }

    fn raw_mut(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Storage::Heap(bytes) => bytes,
            Storage::Aligned(bytes) => bytes.as_mut_slice(),
        }
    }
}

impl fmt::Debug for PooledBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("kind", &self.kind())
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Page-aligned raw allocation backing direct buffers.
struct AlignedBytes {
    ptr: NonNull<u8>,
    capacity: usize,
}

// The allocation is uniquely owned through &mut access, same as Box<[u8]>.
unsafe impl Send for AlignedBytes {}
unsafe impl Sync for AlignedBytes {}

impl AlignedBytes {
    fn allocate(capacity: usize) -> Self {
        if capacity == 0 {
            return Self {
                ptr: NonNull::dangling(),
                capacity: 0,
            };
        }
        let layout = Layout::from_size_align(capacity, DIRECT_ALIGNMENT)
            .expect("buffer capacity exceeds maximum allocation size");
        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(raw) else {
            alloc::handle_alloc_error(layout);
        };
        Self { ptr, capacity }
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr is valid for capacity bytes for the lifetime of self
        // (or dangling with capacity 0, which is a valid empty slice).
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.capacity) }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, plus &mut self guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.capacity) }
    }
}

impl Drop for AlignedBytes {
    fn drop(&mut self) {
        if self.capacity != 0 {
            // SAFETY: allocated in `allocate` with this exact layout.
            unsafe {
                let layout = Layout::from_size_align_unchecked(self.capacity, DIRECT_ALIGNMENT);
                alloc::dealloc(self.ptr.as_ptr(), layout);
            }
        }
    }
}
