//! Shared scanner for `>`-delimited record blocks.
//!
//! FASTA and QUAL share the same outer grammar: a header line starting
//! with `>`, followed by body lines up to the next header or end of input.
//! `BlockReader` locates one complete block at a time in its internal
//! buffer; the `fasta` and `qual` fronts interpret the body bytes.

use std::io::{self, BufRead};

use memchr::Memchr;

use crate::fill_buf;
use crate::policy::{BufPolicy, StdPolicy};

const BUFSIZE: usize = 64 * 1024;

/// Holds the line number and byte offset of a record within the input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    line: u64,
    byte: u64,
}

impl Position {
    pub fn new(line: u64, byte: u64) -> Position {
        Position { line, byte }
    }

    /// Line number of the record header (starting with 1)
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Byte offset of the record within the input
    pub fn byte(&self) -> u64 {
        self.byte
    }
}

/// Location of one record block within the scanner's buffer.
///
/// `start` is the index of the `>` byte. `line_ends` holds the index of
/// each line terminator of the block: the first entry belongs to the
/// header line, every further entry to one body line. The final entry
/// also marks the end of the block (it may point one past the buffer end
/// if the input does not end with a newline).
#[derive(Clone, Debug)]
pub(crate) struct BufferPosition {
    pub(crate) start: usize,
    pub(crate) line_ends: Vec<usize>,
}

impl BufferPosition {
    #[inline]
    fn is_new(&self) -> bool {
        self.line_ends.is_empty()
    }

    /// Number of body lines in the block
    #[inline]
    pub(crate) fn num_lines(&self) -> usize {
        self.line_ends.len().saturating_sub(1)
    }
}

/// Errors of the block scanner, wrapped into `fasta::Error` / `qual::Error`
/// by the parser fronts.
#[derive(Debug)]
pub(crate) enum ScanError {
    Io(io::Error),
    /// First non-empty line does not start with `>`
    InvalidStart { line: usize, found: u8 },
    /// The buffer policy refused to grow the buffer any further
    BufferLimit,
}

impl From<io::Error> for ScanError {
    fn from(e: io::Error) -> ScanError {
        ScanError::Io(e)
    }
}

/// Streaming scanner yielding one `>`-block at a time.
///
/// Forward-only and non-restartable; after `next_block` returned a
/// complete block, its bytes stay valid in `buf()` until the next call.
pub(crate) struct BlockReader<R: io::Read, P = StdPolicy> {
    buffer: buffer_redux::BufReader<R>,
    buf_pos: BufferPosition,
    position: Position,
    search_pos: usize,
    finished: bool,
    buf_policy: P,
}

impl<R> BlockReader<R, StdPolicy>
where
    R: io::Read,
{
    pub(crate) fn new(reader: R) -> BlockReader<R, StdPolicy> {
        BlockReader::with_capacity(reader, BUFSIZE)
    }

    pub(crate) fn with_capacity(reader: R, capacity: usize) -> BlockReader<R, StdPolicy> {
        assert!(capacity >= 3);
        BlockReader {
            buffer: buffer_redux::BufReader::with_capacity(capacity, reader),
            buf_pos: BufferPosition {
                start: 0,
                line_ends: Vec::with_capacity(2),
            },
            position: Position::new(0, 0),
            search_pos: 0,
            finished: false,
            buf_policy: StdPolicy,
        }
    }
}

impl<R, P> BlockReader<R, P>
where
    R: io::Read,
    P: BufPolicy,
{
    pub(crate) fn set_policy<T: BufPolicy>(self, policy: T) -> BlockReader<R, T> {
        BlockReader {
            buffer: self.buffer,
            buf_pos: self.buf_pos,
            position: self.position,
            search_pos: self.search_pos,
            finished: self.finished,
            buf_policy: policy,
        }
    }

    pub(crate) fn policy(&self) -> &P {
        &self.buf_policy
    }

    /// Locates the next complete block. Returns `None` at the end of the
    /// input (or after an error or a call to `finish`).
    pub(crate) fn next_block(&mut self) -> Option<Result<(), ScanError>> {
        if self.finished || !self.initialized() && !try_opt!(self.init()) {
            return None;
        }

        if !self.buf_pos.is_new() {
            self.start_next();
        }

        if !try_opt!(self.search()) && !try_opt!(self.next_complete()) {
            return None;
        }

        Some(Ok(()))
    }

    /// Stops the scanner; every further `next_block` call returns `None`.
    /// Called by the fronts when a record-level error makes continuing
    /// pointless.
    pub(crate) fn finish(&mut self) {
        self.finished = true;
    }

    #[inline(always)]
    pub(crate) fn buf(&self) -> &[u8] {
        self.buffer.buffer()
    }

    #[inline(always)]
    pub(crate) fn buf_pos(&self) -> &BufferPosition {
        &self.buf_pos
    }

    /// Position of the block found by the last `next_block` call,
    /// `None` if no block has been read yet.
    pub(crate) fn position(&self) -> Option<&Position> {
        if self.buf_pos.is_new() {
            return None;
        }
        Some(&self.position)
    }

    #[inline(always)]
    fn initialized(&self) -> bool {
        self.position.line != 0
    }

    // Sets starting points for the next block
    #[inline]
    fn start_next(&mut self) {
        self.position.line += self.buf_pos.line_ends.len() as u64;
        self.position.byte += (self.search_pos - self.buf_pos.start) as u64;
        self.buf_pos.start = self.search_pos;
        self.buf_pos.line_ends.clear();
    }

    // Moves to the first header, skipping empty lines
    fn init(&mut self) -> Result<bool, ScanError> {
        if let Some((line_num, pos, byte)) = self.first_byte()? {
            if byte == b'>' {
                self.buf_pos.start = pos;
                self.position.byte = pos as u64;
                self.position.line = line_num as u64;
                self.search_pos = pos + 1;
                return Ok(true);
            } else {
                self.finished = true;
                return Err(ScanError::InvalidStart {
                    line: line_num,
                    found: byte,
                });
            }
        }
        self.finished = true;
        Ok(false)
    }

    fn first_byte(&mut self) -> Result<Option<(usize, usize, u8)>, ScanError> {
        let mut line_num = 0;

        while fill_buf(&mut self.buffer)? > 0 {
            let mut pos = 0;

            for line in self.buf().split(|b| *b == b'\n') {
                line_num += 1;
                if !line.is_empty() && line != b"\r" {
                    return Ok(Some((line_num, pos, line[0])));
                }
                pos += line.len() + 1;
            }
            self.buffer.consume(pos - 1);
        }
        Ok(None)
    }

    /// Searches the end of the current block and returns true if found;
    /// false if the end of the buffer was reached first.
    #[inline]
    fn search(&mut self) -> Result<bool, ScanError> {
        if self._search() {
            return Ok(true);
        }

        // nothing found
        if self.buf().len() < self.buffer.capacity() {
            // EOF reached, there will be no next block
            self.finished = true;
            self.buf_pos.line_ends.push(self.search_pos);
            return Ok(true);
        }

        Ok(false)
    }

    // returns true if the block end was found, false if the end of the
    // buffer was reached
    #[inline]
    fn _search(&mut self) -> bool {
        let bufsize = self.buf().len();

        for pos in Memchr::new(b'\n', &self.buffer.buffer()[self.search_pos..]) {
            let pos = self.search_pos + pos;
            let next_line_start = pos + 1;

            if next_line_start == bufsize {
                // cannot check the next byte -> treat as incomplete
                self.search_pos = pos; // make sure the last byte is searched again
                return false;
            }

            self.buf_pos.line_ends.push(pos);
            if self.buf()[next_line_start] == b'>' {
                // complete block was found
                self.search_pos = next_line_start;
                return true;
            }
        }

        // block end not found
        self.search_pos = bufsize;

        false
    }

    /// Called when the end of the buffer was reached before the block was
    /// complete. Incomplete bytes are moved to the start of the buffer; if
    /// the block still does not fit, the buffer is enlarged. Afterwards
    /// the position is always complete.
    fn next_complete(&mut self) -> Result<bool, ScanError> {
        loop {
            if self.buf_pos.start == 0 {
                // first block of the buffer -> buffer too small
                self.grow()?;
            } else {
                // not the first block -> the buffer may be large enough
                self.make_room();
            }

            fill_buf(&mut self.buffer)?;

            if self.search()? {
                return Ok(true);
            }
        }
    }

    fn grow(&mut self) -> Result<(), ScanError> {
        let cap = self.buffer.capacity();
        let new_size = self.buf_policy.grow_to(cap).ok_or(ScanError::BufferLimit)?;
        let additional = new_size - cap;
        self.buffer.reserve(additional);
        Ok(())
    }

    // moves incomplete bytes to the start of the buffer
    fn make_room(&mut self) {
        let consumed = self.buf_pos.start;
        self.buffer.consume(consumed);
        self.buffer.make_room();
        self.buf_pos.start = 0;
        self.search_pos -= consumed;
        for e in &mut self.buf_pos.line_ends {
            *e -= consumed;
        }
    }
}
