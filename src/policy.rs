//! Policies controlling how the record buffer grows.
//!
//! Each record must fit into the reader's buffer as a whole. When a record
//! is larger than the current buffer, the reader asks its `BufPolicy` for a
//! new size. Returning `None` makes the reader fail with the `BufferLimit`
//! error variant instead of growing further.
//!
//! # Example
//!
//! ```no_run
//! use fasta2fastq::fasta::Reader;
//! use fasta2fastq::policy::DoubleUntilLimited;
//!
//! // double up to 128 MiB, then grow linearly, give up at 1 GiB
//! let policy = DoubleUntilLimited::new(1 << 27, 1 << 30);
//! let mut reader = Reader::from_path("reads.fna").unwrap().set_policy(policy);
//! // (...)
//! ```

/// Decides how the internal buffer should grow when a record does not fit.
pub trait BufPolicy {
    /// Takes the current buffer size in bytes and returns the size it
    /// should grow to, or `None` if the limit has been reached.
    fn grow_to(&mut self, current_size: usize) -> Option<usize>;
}

/// Default policy: the buffer doubles until it reaches 8 MiB, afterwards
/// it grows in steps of 8 MiB without any upper limit.
pub struct StdPolicy;

impl BufPolicy for StdPolicy {
    fn grow_to(&mut self, current_size: usize) -> Option<usize> {
        Some(if current_size < 1 << 23 {
            current_size * 2
        } else {
            current_size + (1 << 23)
        })
    }
}

/// Doubles the buffer until the given size (in bytes) is reached,
/// then grows linearly in steps of that size. No upper limit.
pub struct DoubleUntil(pub usize);

impl BufPolicy for DoubleUntil {
    fn grow_to(&mut self, current_size: usize) -> Option<usize> {
        Some(if current_size < self.0 {
            current_size * 2
        } else {
            current_size + self.0
        })
    }
}

/// Like [`DoubleUntil`](struct.DoubleUntil.html), but additionally imposes
/// a hard limit. Growing beyond `limit` bytes returns `None`, and readers
/// will report a `BufferLimit` error.
pub struct DoubleUntilLimited {
    double_until: usize,
    limit: usize,
}

impl DoubleUntilLimited {
    pub fn new(double_until: usize, limit: usize) -> Self {
        DoubleUntilLimited {
            double_until,
            limit,
        }
    }
}

impl BufPolicy for DoubleUntilLimited {
    fn grow_to(&mut self, current_size: usize) -> Option<usize> {
        let new_size = if current_size < self.double_until {
            current_size * 2
        } else {
            current_size + self.double_until
        };
        if new_size <= self.limit {
            Some(new_size)
        } else {
            None
        }
    }
}
