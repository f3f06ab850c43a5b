//! Lockstep pairing of a FASTA stream with its companion QUAL stream.
//!
//! Records are paired strictly by position: the Nth sequence record is
//! matched with the Nth quality record. The pairing is validated at every
//! step — the identifiers must be equal and the number of quality scores
//! must equal the sequence length — and both inputs must end after the
//! same record. The first violation aborts the stream; no partially
//! validated record is ever emitted.
//!
//! # Example
//!
//! ```
//! use fasta2fastq::{fasta, qual, pair};
//!
//! let fasta_in = &b">r1\nAC\n>r2\nGT\n"[..];
//! let qual_in = &b">r1\n30 30\n>r2\n20 20\n"[..];
//!
//! let mut pairs = pair::PairedReader::new(fasta_in, qual_in);
//! let mut out = vec![];
//! while let Some(pair) = pairs.next() {
//!     pair.unwrap().write_fastq(&mut out).unwrap();
//! }
//!
//! assert_eq!(out.as_slice(), &b"@r1\nAC\n+\n??\n@r2\nGT\n+\n55\n"[..]);
//! ```

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::policy::{BufPolicy, StdPolicy};
use crate::{fasta, fastq, phred, qual, Record};

/// The two input streams of the pairing step, used to report which one
/// ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Fasta,
    Qual,
}

impl Input {
    fn other(self) -> Input {
        match self {
            Input::Fasta => Input::Qual,
            Input::Qual => Input::Fasta,
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Input::Fasta => f.write_str("FASTA"),
            Input::Qual => f.write_str("QUAL"),
        }
    }
}

/// Pairing error. Every variant that refers to a record carries its
/// 1-based index, counting pairs from the start of the inputs.
#[derive(Debug)]
pub enum Error {
    /// Error of the FASTA parser
    Fasta(fasta::Error),
    /// Error of the QUAL parser
    Qual(qual::Error),
    /// io::Error while writing output
    Io(io::Error),
    /// The records at the same position carry different identifiers
    IdMismatch {
        fasta_id: String,
        qual_id: String,
        /// 1-based record index
        record: u64,
    },
    /// The number of quality scores differs from the sequence length
    LengthMismatch {
        seq_len: usize,
        num_scores: usize,
        /// 1-based record index
        record: u64,
    },
    /// One input ended while the other still has records
    Truncated {
        /// the stream that was exhausted early
        exhausted: Input,
        /// 1-based index of the first record without a mate
        record: u64,
    },
    /// A score could not be encoded as Phred+33
    Score {
        err: phred::Error,
        /// 1-based record index
        record: u64,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Fasta(ref e) => e.fmt(f),
            Error::Qual(ref e) => e.fmt(f),
            Error::Io(ref e) => e.fmt(f),
            Error::IdMismatch {
                ref fasta_id,
                ref qual_id,
                record,
            } => write!(
                f,
                "record identifiers do not match at record {}: '{}' (FASTA) vs. '{}' (QUAL).",
                record, fasta_id, qual_id
            ),
            Error::LengthMismatch {
                seq_len,
                num_scores,
                record,
            } => write!(
                f,
                "sequence and quality lengths differ at record {}: {} bases vs. {} scores.",
                record, seq_len, num_scores
            ),
            Error::Truncated { exhausted, record } => write!(
                f,
                "truncated input: the {} input ended before record {}, but the {} input continues.",
                exhausted,
                record,
                exhausted.other()
            ),
            Error::Score { ref err, record } => {
                write!(f, "cannot encode record {}: {}", record, err)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Fasta(ref e) => Some(e),
            Error::Qual(ref e) => Some(e),
            Error::Io(ref e) => Some(e),
            Error::Score { ref err, .. } => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

/// One validated sequence/quality pair. Only exists between being produced
/// by [`PairedReader::next`](struct.PairedReader.html#method.next) and the
/// next call; the sequence data borrows from the FASTA reader's buffer.
#[derive(Debug)]
pub struct PairedRecord<'a> {
    seq: fasta::RefRecord<'a>,
    scores: Vec<u32>,
    record: u64,
}

impl<'a> Record for PairedRecord<'a> {
    #[inline]
    fn head(&self) -> &[u8] {
        self.seq.head()
    }
}

impl<'a> PairedRecord<'a> {
    /// Returns the full sequence, line breaks removed. Borrows from the
    /// reader's buffer if the sequence occupied a single line.
    #[inline]
    pub fn full_seq(&self) -> Cow<[u8]> {
        self.seq.full_seq()
    }

    /// Returns the per-base quality scores; guaranteed to have the same
    /// length as the sequence.
    #[inline]
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    /// Returns the 1-based index of this pair within the inputs.
    #[inline]
    pub fn index(&self) -> u64 {
        self.record
    }

    /// Encodes the scores as Phred+33 and writes the record as a four-line
    /// FASTQ block. The header line is taken from the FASTA record.
    pub fn write_fastq<W: io::Write>(&self, writer: W) -> Result<(), Error> {
        let mut qual = Vec::with_capacity(self.scores.len());
        phred::encode_into(&self.scores, &mut qual).map_err(|err| Error::Score {
            err,
            record: self.record,
        })?;
        fastq::write_to(writer, self.head(), &self.full_seq(), &qual)?;
        Ok(())
    }
}

/// Reader advancing a FASTA and a QUAL stream in lockstep, one record
/// from each per step.
pub struct PairedReader<R: io::Read, S: io::Read, P = StdPolicy, Q = StdPolicy> {
    fasta: fasta::Reader<R, P>,
    qual: qual::Reader<S, Q>,
    record: u64,
    finished: bool,
}

impl<R, S> PairedReader<R, S>
where
    R: io::Read,
    S: io::Read,
{
    /// Creates a paired reader over two raw input sources.
    pub fn new(fasta: R, qual: S) -> PairedReader<R, S> {
        PairedReader::from_readers(fasta::Reader::new(fasta), qual::Reader::new(qual))
    }
}

impl PairedReader<File, File> {
    /// Creates a paired reader from a FASTA and a QUAL file path.
    pub fn from_paths<A: AsRef<Path>, B: AsRef<Path>>(
        fasta: A,
        qual: B,
    ) -> io::Result<PairedReader<File, File>> {
        Ok(PairedReader::from_readers(
            fasta::Reader::from_path(fasta)?,
            qual::Reader::from_path(qual)?,
        ))
    }
}

impl<R, S, P, Q> PairedReader<R, S, P, Q>
where
    R: io::Read,
    S: io::Read,
    P: BufPolicy,
    Q: BufPolicy,
{
    /// Creates a paired reader from two already configured readers.
    pub fn from_readers(
        fasta: fasta::Reader<R, P>,
        qual: qual::Reader<S, Q>,
    ) -> PairedReader<R, S, P, Q> {
        PairedReader {
            fasta,
            qual,
            record: 0,
            finished: false,
        }
    }

    /// Advances both inputs by one record and returns the validated pair.
    ///
    /// `None` means both inputs ended after the same record. After any
    /// error, `None` is returned on all further calls; no more bytes are
    /// read from either input.
    pub fn next(&mut self) -> Option<Result<PairedRecord, Error>> {
        if self.finished {
            return None;
        }
        self.record += 1;

        let seq_rec = match self.fasta.next() {
            Some(Ok(rec)) => Some(rec),
            Some(Err(e)) => {
                self.finished = true;
                return Some(Err(Error::Fasta(e)));
            }
            None => None,
        };
        let qual_rec = match self.qual.next() {
            Some(Ok(rec)) => Some(rec),
            Some(Err(e)) => {
                self.finished = true;
                return Some(Err(Error::Qual(e)));
            }
            None => None,
        };

        let (seq_rec, qual_rec) = match (seq_rec, qual_rec) {
            (Some(s), Some(q)) => (s, q),
            (None, None) => {
                self.finished = true;
                return None;
            }
            (Some(_), None) => {
                self.finished = true;
                return Some(Err(Error::Truncated {
                    exhausted: Input::Qual,
                    record: self.record,
                }));
            }
            (None, Some(_)) => {
                self.finished = true;
                return Some(Err(Error::Truncated {
                    exhausted: Input::Fasta,
                    record: self.record,
                }));
            }
        };

        if seq_rec.id_bytes() != qual_rec.id_bytes() {
            let err = Error::IdMismatch {
                fasta_id: String::from_utf8_lossy(seq_rec.id_bytes()).into_owned(),
                qual_id: String::from_utf8_lossy(qual_rec.id_bytes()).into_owned(),
                record: self.record,
            };
            self.finished = true;
            return Some(Err(err));
        }

        let scores = match qual_rec.scores() {
            Ok(scores) => scores,
            Err(e) => {
                self.finished = true;
                return Some(Err(Error::Qual(e)));
            }
        };

        let seq_len = seq_rec.seq_len();
        if seq_len != scores.len() {
            self.finished = true;
            return Some(Err(Error::LengthMismatch {
                seq_len,
                num_scores: scores.len(),
                record: self.record,
            }));
        }

        Some(Ok(PairedRecord {
            seq: seq_rec,
            scores,
            record: self.record,
        }))
    }
}

/// Runs the whole pipeline: pairs every record of the two inputs, encodes
/// the scores as Phred+33 and writes four-line FASTQ blocks to `writer`.
/// Each record is written out completely before the next one is read.
///
/// Returns the number of records written.
pub fn convert<R, S, P, Q, W>(
    fasta: fasta::Reader<R, P>,
    qual: qual::Reader<S, Q>,
    mut writer: W,
) -> Result<u64, Error>
where
    R: io::Read,
    S: io::Read,
    P: BufPolicy,
    Q: BufPolicy,
    W: io::Write,
{
    let mut pairs = PairedReader::from_readers(fasta, qual);
    let mut written = 0;
    while let Some(pair) = pairs.next() {
        pair?.write_fastq(&mut writer)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
