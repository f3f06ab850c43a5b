//! Phred+33 quality score encoding and decoding.
//!
//! A Phred score `s` maps to the ASCII character `s + 33`, so the valid
//! score range is 0 (`!`) to 93 (`~`), covering the printable ASCII
//! alphabet used by FASTQ quality strings.

use std::error;
use std::fmt;

/// ASCII offset of the Phred+33 encoding
pub const OFFSET: u8 = 33;

/// Largest encodable score (`~` = ASCII 126)
pub const MAX_SCORE: u32 = 93;

/// Encoding/decoding error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Score outside the closed range [0, 93]
    OutOfRange {
        /// the offending score
        score: u32,
        /// position within the score sequence (0-based)
        index: usize,
    },
    /// Quality character outside `!`..=`~`
    InvalidChar {
        /// the offending byte
        byte: u8,
        /// position within the quality string (0-based)
        index: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::OutOfRange { score, index } => write!(
                f,
                "quality score {} out of range 0..={} (score no. {}).",
                score,
                MAX_SCORE,
                index + 1
            ),
            Error::InvalidChar { byte, index } => write!(
                f,
                "invalid quality character '{}' (char no. {}).",
                (byte as char).escape_default(),
                index + 1
            ),
        }
    }
}

impl error::Error for Error {}

/// Appends the Phred+33 encoding of `scores` to `out`. The number of
/// appended bytes equals `scores.len()`; nothing is appended past the
/// first out-of-range score.
pub fn encode_into(scores: &[u32], out: &mut Vec<u8>) -> Result<(), Error> {
    out.reserve(scores.len());
    for (index, &score) in scores.iter().enumerate() {
        if score > MAX_SCORE {
            return Err(Error::OutOfRange { score, index });
        }
        out.push(score as u8 + OFFSET);
    }
    Ok(())
}

/// Returns the Phred+33 encoding of `scores` as a new `Vec`.
pub fn encode(scores: &[u32]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(scores.len());
    encode_into(scores, &mut out)?;
    Ok(out)
}

/// Decodes a Phred+33 quality string back into scores; the exact inverse
/// of [`encode`](fn.encode.html).
pub fn decode(qual: &[u8]) -> Result<Vec<u32>, Error> {
    qual.iter()
        .enumerate()
        .map(|(index, &byte)| {
            if (OFFSET..=OFFSET + MAX_SCORE as u8).contains(&byte) {
                Ok(u32::from(byte - OFFSET))
            } else {
                Err(Error::InvalidChar { byte, index })
            }
        })
        .collect()
}
