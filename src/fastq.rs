//! FASTQ writing
//!
//! Free functions emitting the fixed four-line FASTQ block:
//!
//! ```text
//! @<id> <description>
//! <sequence>
//! +
//! <quality string>
//! ```
//!
//! The separator line is always a bare `+`; the header is never repeated
//! there. No validation happens here; callers are expected to pass a
//! quality string of the same length as the sequence (the
//! [`pair`](../pair/index.html) module guarantees this).

use std::io;

/// Writes one FASTQ record. The sequence must not contain line breaks.
#[inline]
pub fn write_to<W: io::Write>(
    mut writer: W,
    head: &[u8],
    seq: &[u8],
    qual: &[u8],
) -> io::Result<()> {
    writer.write_all(b"@")?;
    writer.write_all(head)?;
    writer.write_all(b"\n")?;
    writer.write_all(seq)?;
    writer.write_all(b"\n+\n")?;
    writer.write_all(qual)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Writes one FASTQ record with ID and description supplied separately
/// instead of a whole header line.
#[inline]
pub fn write_parts<W: io::Write>(
    mut writer: W,
    id: &[u8],
    desc: Option<&[u8]>,
    seq: &[u8],
    qual: &[u8],
) -> io::Result<()> {
    writer.write_all(b"@")?;
    writer.write_all(id)?;
    if let Some(d) = desc {
        writer.write_all(b" ")?;
        writer.write_all(d)?;
    }
    writer.write_all(b"\n")?;
    writer.write_all(seq)?;
    writer.write_all(b"\n+\n")?;
    writer.write_all(qual)?;
    writer.write_all(b"\n")?;
    Ok(())
}
