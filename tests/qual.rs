#[macro_use]
extern crate matches;

use fasta2fastq::qual::{self, Error};
use fasta2fastq::Record;

const QUAL: &[&[u8]; 5] = &[
    b">read1 sample one",
    b"10 20 30",
    b"40 50",
    b">read2",
    b"0 93",
];

fn concat_lines(lines: &[&[u8]], terminator: &[u8]) -> Vec<u8> {
    lines
        .iter()
        .flat_map(|s| s.iter().chain(terminator))
        .cloned()
        .collect()
}

#[test]
fn reader_parses_wrapped_scores() {
    let expected = [
        (Ok("read1"), Some(Ok("sample one")), vec![10, 20, 30, 40, 50]),
        (Ok("read2"), None, vec![0, 93]),
    ];
    let lterms: [&[u8]; 2] = [b"\n", b"\r\n"];

    for t in &lterms {
        let qual = concat_lines(QUAL, t);

        for cap in 3..100 {
            let mut reader = qual::Reader::with_capacity(qual.as_slice(), cap);
            for (id, desc, scores) in &expected {
                let record = reader
                    .next()
                    .unwrap()
                    .unwrap_or_else(|e| panic!("error at cap. {}: {}", cap, e));

                assert_eq!(record.id(), *id, "ID mismatch at cap. {}", cap);
                assert_eq!(record.desc(), *desc, "desc mismatch at cap. {}", cap);
                assert_eq!(&record.scores().unwrap(), scores, "score mismatch at cap. {}", cap);
            }
            assert!(reader.next().is_none());
        }
    }
}

#[test]
fn tabs_and_multiple_spaces_separate_tokens() {
    let mut reader = qual::Reader::new(&b">r1\n5\t6  7\n"[..]);
    let record = reader.next().unwrap().unwrap();
    assert_eq!(record.scores().unwrap(), vec![5, 6, 7]);
}

#[test]
fn invalid_score_token() {
    let mut reader = qual::Reader::new(&b">r1\n10 2x 30\n"[..]);
    let record = reader.next().unwrap().unwrap();
    let err = record.scores().unwrap_err();
    match err {
        Error::InvalidScore { ref id, ref token } => {
            assert_eq!(id, "r1");
            assert_eq!(token, "2x");
        }
        e => panic!("unexpected error: {:?}", e),
    }
    assert!(format!("{}", err).contains("2x"));
}

#[test]
fn negative_score_is_invalid() {
    let mut reader = qual::Reader::new(&b">r1\n-5 10\n"[..]);
    let record = reader.next().unwrap().unwrap();
    assert_matches!(record.scores().unwrap_err(), Error::InvalidScore { .. });
}

#[test]
fn record_without_score_lines() {
    let mut reader = qual::Reader::new(&b">r1\n>r2\n10\n"[..]);
    let err = reader.next().unwrap().unwrap_err();
    assert_matches!(err, Error::EmptyRecord { .. });
    assert!(reader.next().is_none());
}

#[test]
fn record_with_blank_score_line_only() {
    let mut reader = qual::Reader::new(&b">r1\n \n"[..]);
    let record = reader.next().unwrap().unwrap();
    assert_matches!(record.scores().unwrap_err(), Error::NoScores { .. });
}

#[test]
fn invalid_start() {
    let mut reader = qual::Reader::new(&b"10 20\n"[..]);
    let err = reader.next().unwrap().unwrap_err();
    assert_matches!(err, Error::InvalidStart { line: 1, found: b'1' });
    assert!(reader.next().is_none());
}

#[test]
fn owned_record_iterator() {
    let mut reader = qual::Reader::new(&b">a\n1 2\n>b\n3\n"[..]);
    let records: Result<Vec<_>, _> = reader.records().collect();
    assert_eq!(
        records.unwrap(),
        vec![
            qual::OwnedRecord {
                head: b"a".to_vec(),
                scores: vec![1, 2]
            },
            qual::OwnedRecord {
                head: b"b".to_vec(),
                scores: vec![3]
            },
        ]
    );
}

#[test]
fn owned_iterator_surfaces_parse_error() {
    let mut reader = qual::Reader::new(&b">a\nxx\n>b\n3\n"[..]);
    let mut records = reader.records();
    assert!(records.next().unwrap().is_err());
}
