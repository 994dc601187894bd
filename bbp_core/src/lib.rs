//! Size-classed, lock-free buffer pool.
//!
//! [`ArrayBufferPool`] hands out fixed-capacity [`PooledBuffer`]s and takes
//! them back for reuse, avoiding repeated allocation of short-lived memory
//! blocks on packet send/receive paths. Buffers are grouped into size
//! classes at fixed increments, with separate pools for direct
//! (page-aligned) and indirect (heap) buffers.

pub mod bucket;
pub mod buffer;
pub mod logging;
pub mod pool;

pub use bucket::Bucket;
pub use buffer::{BufferKind, PooledBuffer};
pub use pool::{ArrayBufferPool, PoolConfigError};
pub use pool::{DEFAULT_INCREMENT, DEFAULT_MAX_SIZE, DEFAULT_MIN_SIZE};
