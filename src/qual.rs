//! QUAL reading
//!
//! QUAL files use the FASTA header grammar, but the body lines hold
//! whitespace-separated decimal Phred scores instead of sequence
//! characters, one score per base, possibly wrapped across lines:
//!
//! ```text
//! >read1
//! 40 40 38 37 35 35 40
//! 39 40
//! ```
//!
//! # Example
//!
//! ```
//! use fasta2fastq::qual::Reader;
//! use fasta2fastq::Record;
//!
//! let input = b">id1\n40 40 38\n37 35\n";
//!
//! let mut reader = Reader::new(&input[..]);
//! let record = reader.next().unwrap().unwrap();
//! assert_eq!(record.id(), Ok("id1"));
//! assert_eq!(record.scores().unwrap(), vec![40, 40, 38, 37, 35]);
//! ```
//!
//! The outer parsing behaviour (line endings, leading empty lines,
//! `InvalidStart`, `EmptyRecord`, `None` after errors) is identical to the
//! [`fasta`](../fasta/index.html) module. Scores are parsed as unsigned
//! integers on access; a token that is not a non-negative decimal integer
//! fails with `Error::InvalidScore`. Whether a score is a *valid Phred+33*
//! score is not checked here but by the [`phred`](../phred/index.html)
//! encoder.

use std::error;
use std::fmt;
use std::fs::File;
use std::io;
use std::iter;
use std::path::Path;
use std::slice;
use std::str;

use crate::core::{BlockReader, BufferPosition, ScanError};
use crate::policy::{BufPolicy, StdPolicy};
use crate::trim_cr;
use crate::Record;

pub use crate::core::Position;

/// Parser for QUAL files.
pub struct Reader<R: io::Read, P = StdPolicy> {
    inner: BlockReader<R, P>,
}

impl<R> Reader<R, StdPolicy>
where
    R: io::Read,
{
    /// Creates a new reader with the default buffer size of 64 KiB
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

    /// Searches the next QUAL record and returns a
    /// [RefRecord](struct.RefRecord.html) that borrows its data from the
    /// underlying buffer of this reader. The scores are not parsed yet;
    /// this happens on demand via `RefRecord::scores()`.
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

    /// Returns a borrowed iterator over all QUAL records with their scores
    /// parsed (`OwnedRecord`).
    pub fn records(&mut self) -> RecordsIter<R, P> {
        RecordsIter { rdr: self }
    }

    /// Like `Reader::records()`, but owns the underlying reader.
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
        self.rdr
            .next()
            .map(|rec| rec.and_then(|r| r.to_owned_record()))
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
        self.rdr
            .next()
            .map(|rec| rec.and_then(|r| r.to_owned_record()))
    }
}

/// QUAL parsing error
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
    /// A record header without any score line
    EmptyRecord {
        /// record ID
        id: String,
        /// line number of the header (1-based)
        line: u64,
    },
    /// A body token that is not a non-negative decimal integer
    InvalidScore {
        /// record ID
        id: String,
        /// the offending token
        token: String,
    },
    /// A record whose body lines contain no score tokens at all
    NoScores {
        /// record ID
        id: String,
    },
    /// Size limit of the buffer was reached (`BufPolicy::grow_to()`
    /// returned `None`)
    BufferLimit,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref e) => e.fmt(f),
            Error::InvalidStart { line, found } => write!(
                f,
                "QUAL parse error: expected '>' but found '{}' at file start, line {}.",
                (found as char).escape_default(),
                line
            ),
            Error::EmptyRecord { ref id, line } => write!(
                f,
                "QUAL parse error: record '{}' at line {} has no score lines.",
                id, line
            ),
            Error::InvalidScore { ref id, ref token } => write!(
                f,
                "QUAL parse error: invalid quality score '{}' in record '{}'.",
                token, id
            ),
            Error::NoScores { ref id } => write!(
                f,
                "QUAL parse error: record '{}' contains no quality scores.",
                id
            ),
            Error::BufferLimit => write!(f, "QUAL parse error: buffer limit reached."),
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

/// A QUAL record that borrows data from a buffer. Score parsing is
/// deferred until `scores()` / `scores_into()` is called.
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
    /// Returns an iterator over the raw score lines, line terminators
    /// stripped.
    #[inline]
    pub fn score_lines(&self) -> ScoreLines {
        ScoreLines {
            data: self.buffer,
            len: self.buf_pos.num_lines(),
            pos_iter: self
                .buf_pos
                .line_ends
                .iter()
                .zip(self.buf_pos.line_ends.iter().skip(1)),
        }
    }

    /// Parses all score tokens of the record into `out` (which is cleared
    /// first). Fails on the first token that is not a non-negative decimal
    /// integer, and if the record contains no tokens at all.
    pub fn scores_into(&self, out: &mut Vec<u32>) -> Result<(), Error> {
        out.clear();
        for line in self.score_lines() {
            for token in line
                .split(|b| b.is_ascii_whitespace())
                .filter(|t| !t.is_empty())
            {
                let score = str::from_utf8(token)
                    .ok()
                    .and_then(|t| t.parse::<u32>().ok())
                    .ok_or_else(|| Error::InvalidScore {
                        id: String::from_utf8_lossy(self.id_bytes()).into_owned(),
                        token: String::from_utf8_lossy(token).into_owned(),
                    })?;
                out.push(score);
            }
        }
        if out.is_empty() {
            return Err(Error::NoScores {
                id: String::from_utf8_lossy(self.id_bytes()).into_owned(),
            });
        }
        Ok(())
    }

    /// Parses all score tokens of the record into a new `Vec`.
    pub fn scores(&self) -> Result<Vec<u32>, Error> {
        let mut scores = Vec::new();
        self.scores_into(&mut scores)?;
        Ok(scores)
    }

    /// Creates an owned copy of the record with its scores parsed.
    pub fn to_owned_record(&self) -> Result<OwnedRecord, Error> {
        Ok(OwnedRecord {
            head: self.head().to_vec(),
            scores: self.scores()?,
        })
    }
}

/// Iterator over the raw score lines of a QUAL record.
pub struct ScoreLines<'a> {
    data: &'a [u8],
    len: usize,
    pos_iter: iter::Zip<slice::Iter<'a, usize>, iter::Skip<slice::Iter<'a, usize>>>,
}

impl<'a> Iterator for ScoreLines<'a> {
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

impl<'a> ExactSizeIterator for ScoreLines<'a> {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }
}

/// A QUAL record that owns its data, scores already parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedRecord {
    pub head: Vec<u8>,
    pub scores: Vec<u32>,
}

impl Record for OwnedRecord {
    #[inline]
    fn head(&self) -> &[u8] {
        &self.head
    }
}

impl OwnedRecord {
    /// Returns the parsed scores
    #[inline]
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }
}
