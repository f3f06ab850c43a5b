//! Merge a FASTA file and its companion QUAL file into FASTQ (Phred+33).
//!
//! Older sequencers emit base calls and per-base quality scores as two
//! separate files: a FASTA file with the sequences and a QUAL file with
//! whitespace-separated integer scores under the same `>` headers. This
//! crate pairs the two streams record by record and writes standard
//! four-line FASTQ.
//!
//! Both parsers are streaming and forward-only: records borrow from the
//! reader's internal buffer ([`fasta::RefRecord`](fasta/struct.RefRecord.html),
//! [`qual::RefRecord`](qual/struct.RefRecord.html)), and only one record
//! per input is held in memory at a time. The buffer grows automatically
//! if a record does not fit; how it grows can be configured via the
//! [`policy`](policy) module.
//!
//! # Example
//!
//! ```
//! use fasta2fastq::{fasta, qual, pair};
//!
//! let fasta_in = &b">r1\nACGT\n"[..];
//! let qual_in = &b">r1\n10 20 30 40\n"[..];
//!
//! let mut out = vec![];
//! let n = pair::convert(
//!     fasta::Reader::new(fasta_in),
//!     qual::Reader::new(qual_in),
//!     &mut out,
//! ).unwrap();
//!
//! assert_eq!(n, 1);
//! assert_eq!(out.as_slice(), &b"@r1\nACGT\n+\n+5?I\n"[..]);
//! ```
//!
//! The pairing step validates that both files describe the same records:
//! identifiers must agree, the number of quality scores must equal the
//! sequence length, and both files must end after the same record. Any
//! violation aborts the run with an error naming the 1-based record index
//! and the conflicting values; nothing is ever silently repaired.

extern crate buffer_redux;
extern crate memchr;

#[macro_use]
extern crate serde_derive;
extern crate serde;

use std::io;
use std::str::{self, Utf8Error};

macro_rules! try_opt {
    ($expr: expr) => {
        match $expr {
            Ok(item) => item,
            Err(e) => return Some(Err(::std::convert::From::from(e))),
        }
    };
}

mod core;
pub mod fasta;
pub mod fastq;
pub mod pair;
pub mod phred;
pub mod policy;
pub mod qual;

pub use crate::core::Position;

/// Header-line accessors shared by FASTA, QUAL and paired records.
///
/// The ID is the token directly after `>` up to the first whitespace
/// character; the description is the remainder of the header line, if any.
pub trait Record {
    /// Returns the full header line of the record, without `>`.
    fn head(&self) -> &[u8];

    fn id_bytes(&self) -> &[u8] {
        self.head()
            .split(|b| b.is_ascii_whitespace())
            .next()
            .unwrap()
    }

    /// Returns the record ID (everything before the first whitespace)
    /// as string slice.
    fn id(&self) -> Result<&str, Utf8Error> {
        str::from_utf8(self.id_bytes())
    }

    fn desc_bytes(&self) -> Option<&[u8]> {
        self.head()
            .splitn(2, |b| b.is_ascii_whitespace())
            .nth(1)
    }

    /// Returns the description following the ID, if present.
    fn desc(&self) -> Option<Result<&str, Utf8Error>> {
        self.desc_bytes().map(str::from_utf8)
    }
}

/// Remove a final '\r' from a byte slice
#[inline]
fn trim_cr(line: &[u8]) -> &[u8] {
    if let Some((&b'\r', remaining)) = line.split_last() {
        remaining
    } else {
        line
    }
}

/// Makes sure the buffer is full after this call (unless EOF reached)
/// code adapted from `io::Read::read_exact`
fn fill_buf<R>(
    reader: &mut buffer_redux::BufReader<R, buffer_redux::policy::StdPolicy>,
) -> io::Result<usize>
where
    R: io::Read,
{
    let initial_size = reader.buffer().len();
    let mut num_read = 0;
    while initial_size + num_read < reader.capacity() {
        match reader.read_into_buf() {
            Ok(0) => break,
            Ok(n) => num_read += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(num_read)
}
