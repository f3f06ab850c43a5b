//! FASTA reading
//!
//! # Example
//!
//! ```
//! use fasta2fastq::fasta::Reader;
//! use fasta2fastq::Record;
//!
//! let input = b">id1 desc
//! ACGT
//! ACGT
//! >id2
//! TGCA
//! ";
//!
//! let mut reader = Reader::new(&input[..]);
//!
//! while let Some(record) = reader.next() {
//!     let record = record.expect("Error reading record");
//!     println!("{}: {} bp", record.id().unwrap(), record.owned_seq().len());
//! }
//! ```
//!
//! # Details on parsing behaviour
//!
//! * The parser handles UNIX (LF) and Windows (CRLF) line endings, but not
//!   old Mac-style (CR) endings.
//! * Empty lines before the first header are ignored. The first non-empty
//!   line must start with `>`, otherwise `Error::InvalidStart` is returned.
//! * Sequence lines may wrap at any width.
//! * A header that is not followed by at least one sequence line is an
//!   error (`Error::EmptyRecord`). Two-file FASTA/QUAL data has no use for
//!   empty records, and a missing sequence almost always indicates a
//!   truncated or corrupted file.
//! * Whitespace at the end of header and sequence lines is not removed.
//! * Empty input results in `None` being returned immediately.
//! * After an error has been returned, `next()` returns `None`.

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::fs::File;
use std::io;
use std::iter;
use std::path::Path;
use std::slice;

use crate::core::{BlockReader, BufferPosition, ScanError};
use crate::policy::{BufPolicy, StdPolicy};
use crate::trim_cr;
use crate::Record;

pub use crate::core::Position;

/// Parser for FASTA files.
pub struct Reader<R: io::Read, P = StdPolicy> {
    inner: BlockReader<R, P>,
}

impl<R> Reader<R, StdPolicy>
where
    R: io::Read,
{
    /// Creates a new reader with the default buffer size of 64 KiB
    ///
    /// # Example:
    ///
    /// ```
    /// use fasta2fastq::fasta::Reader;
    /// use fasta2fastq::Record;
    /// let fasta = b">id\nSEQUENCE";
    ///
    /// let mut reader = Reader::new(&fasta[..]);
    /// let record = reader.next().unwrap().unwrap();
    /// assert_eq!(record.id(), Ok("id"))
    /// ```
    #[inline]
    pub fn new(reader: R) -> Reader<R, StdPolicy> {
        Reader {
            inner: BlockReader::new(reader),
        }
    }

    /// Creates a new reader with a given buffer capacity. The minimum
    /// allowed capacity is 3.
    #[inline]
    pub fn with_capacity(reader: R, capacity: usize) -> Reader<R, StdPolicy> {
        Reader {
            inner: BlockReader::with_capacity(reader, capacity),
        }
    }
}

impl Reader<File, StdPolicy> {
    /// Creates a reader from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Reader<File>> {
        File::open(path).map(Reader::new)
    }
}

impl<R, P> Reader<R, P>
where
    R: io::Read,
    P: BufPolicy,
{
    /// Returns a reader with the given buffer policy applied
    #[inline]
    pub fn set_policy<T: BufPolicy>(self, policy: T) -> Reader<R, T> {
        Reader {
            inner: self.inner.set_policy(policy),
        }
    }

    /// Returns the `BufPolicy` of the reader
    #[inline]
    pub fn policy(&self) -> &P {
        self.inner.policy()
    }

    /// Searches the next FASTA record and returns a
    /// [RefRecord](struct.RefRecord.html) that borrows its data from the
    /// underlying buffer of this reader.
    pub fn next(&mut self) -> Option<Result<RefRecord, Error>> {
        match self.inner.next_block()? {
            Ok(()) => {}
            Err(e) => return Some(Err(e.into())),
        }

        if self.inner.buf_pos().num_lines() == 0 {
            let (id, line) = {
                let rec = RefRecord {
                    buffer: self.inner.buf(),
                    buf_pos: self.inner.buf_pos(),
                };
                let id = String::from_utf8_lossy(rec.id_bytes()).into_owned();
                let line = self.inner.position().map_or(0, Position::line);
                (id, line)
            };
            self.inner.finish();
            return Some(Err(Error::EmptyRecord { id, line }));
        }

        Some(Ok(RefRecord {
            buffer: self.inner.buf(),
            buf_pos: self.inner.buf_pos(),
        }))
    }

    /// Returns the position of the record returned by the last `next()`
    /// call, or `None` if no record has been read yet.
    #[inline]
    pub fn position(&self) -> Option<&Position> {
        self.inner.position()
    }

    /// Returns a borrowed iterator over all FASTA records. The records
    /// are owned (`OwnedRecord`), this is therefore slower than using
    /// `Reader::next()`.
    pub fn records(&mut self) -> RecordsIter<R, P> {
        RecordsIter { rdr: self }
    }

    /// Returns an iterator over all FASTA records like `Reader::records()`,
    /// but with the difference that it owns the underlying reader.
    pub fn into_records(self) -> RecordsIntoIter<R, P> {
        RecordsIntoIter { rdr: self }
    }
}

/// Borrowed iterator of `OwnedRecord`
pub struct RecordsIter<'a, R, P = StdPolicy>
where
    P: 'a,
    R: io::Read + 'a,
{
    rdr: &'a mut Reader<R, P>,
}

impl<'a, R, P> Iterator for RecordsIter<'a, R, P>
where
    P: BufPolicy + 'a,
    R: io::Read + 'a,
{
    type Item = Result<OwnedRecord, Error>;
    fn next(&mut self) -> Option<Self::Item> {
        self.rdr.next().map(|rec| rec.map(|r| r.to_owned_record()))
    }
}

/// Iterator of `OwnedRecord` that owns the underlying reader
pub struct RecordsIntoIter<R: io::Read, P = StdPolicy> {
    rdr: Reader<R, P>,
}

impl<R, P> Iterator for RecordsIntoIter<R, P>
where
    P: BufPolicy,
    R: io::Read,
{
    type Item = Result<OwnedRecord, Error>;
    fn next(&mut self) -> Option<Self::Item> {
        self.rdr.next().map(|rec| rec.map(|r| r.to_owned_record()))
    }
}

/// FASTA parsing error
#[derive(Debug)]
pub enum Error {
    /// io::Error
    Io(io::Error),
    /// First non-empty line does not start with `>`
    InvalidStart {
        /// line number (1-based)
        line: usize,
        /// byte that was found instead
        found: u8,
    },
    /// A record header without any sequence line
    EmptyRecord {
        /// record ID
        id: String,
        /// line number of the header (1-based)
        line: u64,
    },
    /// Size limit of the buffer was reached, which happens if
    /// `BufPolicy::grow_to()` returned `None`. This does not happen with
    /// the default policy.
    BufferLimit,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref e) => e.fmt(f),
            Error::InvalidStart { line, found } => write!(
                f,
                "FASTA parse error: expected '>' but found '{}' at file start, line {}.",
                (found as char).escape_default(),
                line
            ),
            Error::EmptyRecord { ref id, line } => write!(
                f,
                "FASTA parse error: record '{}' at line {} has no sequence lines.",
                id, line
            ),
            Error::BufferLimit => write!(f, "FASTA parse error: buffer limit reached."),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<ScanError> for Error {
    fn from(e: ScanError) -> Error {
        match e {
            ScanError::Io(e) => Error::Io(e),
            ScanError::InvalidStart { line, found } => Error::InvalidStart { line, found },
            ScanError::BufferLimit => Error::BufferLimit,
        }
    }
}

/// A FASTA record that borrows data from a buffer.
#[derive(Debug, Clone)]
pub struct RefRecord<'a> {
    buffer: &'a [u8],
    buf_pos: &'a BufferPosition,
}

impl<'a> Record for RefRecord<'a> {
    #[inline]
    fn head(&self) -> &[u8] {
        trim_cr(&self.buffer[self.buf_pos.start + 1..*self.buf_pos.line_ends.first().unwrap()])
    }
}

impl<'a> RefRecord<'a> {
    /// Returns an iterator over all sequence lines, line terminators
    /// stripped.
    #[inline]
    pub fn seq_lines(&self) -> SeqLines {
        SeqLines {
            data: self.buffer,
            len: self.buf_pos.num_lines(),
            pos_iter: self
                .buf_pos
                .line_ends
                .iter()
                .zip(self.buf_pos.line_ends.iter().skip(1)),
        }
    }

    /// Returns the number of sequence lines.
    #[inline]
    pub fn num_seq_lines(&self) -> usize {
        self.seq_lines().len()
    }

    /// Returns the total sequence length without allocating.
    #[inline]
    pub fn seq_len(&self) -> usize {
        self.seq_lines().map(|l| l.len()).sum()
    }

    /// Returns the full sequence. If the sequence consists of a single
    /// line, it is borrowed from the underlying buffer; with multiple
    /// lines, an owned copy is created (see `owned_seq()`).
    pub fn full_seq(&self) -> Cow<[u8]> {
        let mut lines = self.seq_lines();
        if lines.len() == 1 {
            lines.next().unwrap().into()
        } else {
            self.owned_seq().into()
        }
    }

    /// Returns the concatenated sequence as owned `Vec`, line breaks
    /// removed.
    pub fn owned_seq(&self) -> Vec<u8> {
        let mut seq = Vec::new();
        for segment in self.seq_lines() {
            seq.extend(segment);
        }
        seq
    }

    /// Creates an owned copy of the record.
    pub fn to_owned_record(&self) -> OwnedRecord {
        OwnedRecord {
            head: self.head().to_vec(),
            seq: self.owned_seq(),
        }
    }
}

/// Iterator over the sequence lines of a FASTA record.
pub struct SeqLines<'a> {
    data: &'a [u8],
    len: usize,
    pos_iter: iter::Zip<slice::Iter<'a, usize>, iter::Skip<slice::Iter<'a, usize>>>,
}

impl<'a> Iterator for SeqLines<'a> {
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<&'a [u8]> {
        self.pos_iter
            .next()
            .map(|(start, next_start)| trim_cr(&self.data[*start + 1..*next_start]))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let l = self.len();
        (l, Some(l))
    }
}

impl<'a> ExactSizeIterator for SeqLines<'a> {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }
}

/// A FASTA record that owns its data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedRecord {
    pub head: Vec<u8>,
    pub seq: Vec<u8>,
}

impl Record for OwnedRecord {
    #[inline]
    fn head(&self) -> &[u8] {
        &self.head
    }
}

impl OwnedRecord {
    /// Returns the sequence as byte slice
    #[inline]
    pub fn seq(&self) -> &[u8] {
        &self.seq
    }
}
