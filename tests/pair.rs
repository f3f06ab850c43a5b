#[macro_use]
extern crate matches;

use fasta2fastq::pair::{self, Error, Input, PairedReader};
use fasta2fastq::{fasta, phred, qual, Record};

fn run(fasta_in: &[u8], qual_in: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = vec![];
    pair::convert(
        fasta::Reader::new(fasta_in),
        qual::Reader::new(qual_in),
        &mut out,
    )?;
    Ok(out)
}

#[test]
fn single_record() {
    let out = run(b">r1\nACGT\n", b">r1\n10 20 30 40\n").unwrap();
    assert_eq!(out.as_slice(), &b"@r1\nACGT\n+\n+5?I\n"[..]);
}

#[test]
fn description_is_preserved() {
    let out = run(b">r1 some desc\nAC\n", b">r1 other desc\n1 2\n").unwrap();
    assert_eq!(out.as_slice(), &b"@r1 some desc\nAC\n+\n\"#\n"[..]);
}

#[test]
fn wrapped_lines_pair_by_total_length() {
    // sequence and scores wrap at different widths
    let out = run(b">r1\nACG\nT\n", b">r1\n10 20\n30 40\n").unwrap();
    assert_eq!(out.as_slice(), &b"@r1\nACGT\n+\n+5?I\n"[..]);
}

#[test]
fn multiple_records_and_count() {
    let mut out = vec![];
    let n = pair::convert(
        fasta::Reader::new(&b">r1\nAC\n>r2\nGT\n"[..]),
        qual::Reader::new(&b">r1\n30 30\n>r2\n20 20\n"[..]),
        &mut out,
    )
    .unwrap();
    assert_eq!(n, 2);
    assert_eq!(out.as_slice(), &b"@r1\nAC\n+\n??\n@r2\nGT\n+\n55\n"[..]);
}

#[test]
fn quality_string_matches_sequence_length() {
    let mut pairs = PairedReader::new(
        &b">r1\nACCGT\nAA\n"[..],
        &b">r1\n10 10 10 10 10 10 10\n"[..],
    );
    let pair = pairs.next().unwrap().unwrap();
    assert_eq!(pair.full_seq().len(), pair.scores().len());
    assert_eq!(pair.index(), 1);

    let mut out = vec![];
    pair.write_fastq(&mut out).unwrap();
    let lines: Vec<&[u8]> = out.split(|b| *b == b'\n').collect();
    assert_eq!(lines[1].len(), lines[3].len());
}

#[test]
fn empty_inputs_produce_empty_output() {
    let mut out = vec![];
    let n = pair::convert(
        fasta::Reader::new(&b""[..]),
        qual::Reader::new(&b""[..]),
        &mut out,
    )
    .unwrap();
    assert_eq!(n, 0);
    assert!(out.is_empty());
}

#[test]
fn rerun_is_byte_identical() {
    let fasta_in = &b">r1 d\nACGT\nAC\n>r2\nGG\n"[..];
    let qual_in = &b">r1 d\n1 2 3 4 5 6\n>r2\n7 8\n"[..];
    let first = run(fasta_in, qual_in).unwrap();
    let second = run(fasta_in, qual_in).unwrap();
    assert_eq!(first, second);
}

#[test]
fn truncated_qual_stream() {
    let mut pairs = PairedReader::new(&b">r1\nAC\n>r2\nGT\n"[..], &b">r1\n10 20\n"[..]);
    pairs.next().unwrap().unwrap();
    let err = pairs.next().unwrap().unwrap_err();
    assert_matches!(
        err,
        Error::Truncated {
            exhausted: Input::Qual,
            record: 2
        }
    );
    let msg = format!("{}", err);
    assert!(msg.contains("QUAL"), "message: {}", msg);
    assert!(msg.contains("record 2"), "message: {}", msg);
    assert!(pairs.next().is_none());
}

#[test]
fn truncated_fasta_stream() {
    let mut pairs = PairedReader::new(&b">r1\nAC\n"[..], &b">r1\n10 20\n>r2\n10 20\n"[..]);
    pairs.next().unwrap().unwrap();
    let err = pairs.next().unwrap().unwrap_err();
    assert_matches!(
        err,
        Error::Truncated {
            exhausted: Input::Fasta,
            record: 2
        }
    );
}

#[test]
fn identifier_mismatch() {
    let mut pairs = PairedReader::new(&b">r1\nAC\n"[..], &b">r2\n10 20\n"[..]);
    let err = pairs.next().unwrap().unwrap_err();
    match err {
        Error::IdMismatch {
            ref fasta_id,
            ref qual_id,
            record,
        } => {
            assert_eq!(fasta_id, "r1");
            assert_eq!(qual_id, "r2");
            assert_eq!(record, 1);
        }
        e => panic!("unexpected error: {:?}", e),
    }
    let msg = format!("{}", err);
    assert!(msg.contains("r1") && msg.contains("r2") && msg.contains("record 1"));
    assert!(pairs.next().is_none());
}

#[test]
fn length_mismatch() {
    let mut pairs = PairedReader::new(&b">r1\nACG\n"[..], &b">r1\n10 20\n"[..]);
    let err = pairs.next().unwrap().unwrap_err();
    assert_matches!(
        err,
        Error::LengthMismatch {
            seq_len: 3,
            num_scores: 2,
            record: 1
        }
    );
    let msg = format!("{}", err);
    assert!(msg.contains('3') && msg.contains('2'));
    assert!(pairs.next().is_none());
}

#[test]
fn score_out_of_range() {
    let err = run(b">r1\nAC\n", b">r1\n10 94\n").unwrap_err();
    assert_matches!(
        err,
        Error::Score {
            err: phred::Error::OutOfRange {
                score: 94,
                index: 1
            },
            record: 1
        }
    );
    assert!(format!("{}", err).contains("94"));
}

#[test]
fn qual_parse_error_is_wrapped() {
    let err = run(b">r1\nAC\n", b">r1\n10 abc\n").unwrap_err();
    assert_matches!(err, Error::Qual(qual::Error::InvalidScore { .. }));
}

#[test]
fn fasta_parse_error_is_wrapped() {
    let err = run(b"no header\n", b">r1\n10\n").unwrap_err();
    assert_matches!(err, Error::Fasta(fasta::Error::InvalidStart { .. }));
}

#[test]
fn desc_and_id_accessors() {
    let mut pairs = PairedReader::new(&b">r1 d e f\nA\n"[..], &b">r1\n10\n"[..]);
    let pair = pairs.next().unwrap().unwrap();
    assert_eq!(pair.id(), Ok("r1"));
    assert_eq!(pair.desc(), Some(Ok("d e f")));
    assert_eq!(pair.scores(), &[10]);
}
