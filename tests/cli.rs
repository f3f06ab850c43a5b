use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn write_inputs(dir: &tempfile::TempDir, fasta: &str, qual: &str) -> (std::path::PathBuf, std::path::PathBuf) {
    let fasta_path = dir.path().join("reads.fna");
    let qual_path = dir.path().join("reads.qual");
    fs::write(&fasta_path, fasta).unwrap();
    fs::write(&qual_path, qual).unwrap();
    (fasta_path, qual_path)
}

#[test]
fn converts_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let (fasta, qual) = write_inputs(&dir, ">r1\nACGT\n", ">r1\n10 20 30 40\n");

    Command::cargo_bin("fasta2fastq")
        .unwrap()
        .arg(&fasta)
        .arg(&qual)
        .assert()
        .success()
        .stdout("@r1\nACGT\n+\n+5?I\n");
}

#[test]
fn writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let (fasta, qual) = write_inputs(&dir, ">r1\nAC\n", ">r1\n0 93\n");
    let out = dir.path().join("reads.fastq");

    Command::cargo_bin("fasta2fastq")
        .unwrap()
        .arg(&fasta)
        .arg(&qual)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(fs::read(&out).unwrap(), b"@r1\nAC\n+\n!~\n");
}

#[test]
fn identifier_mismatch_fails_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let (fasta, qual) = write_inputs(&dir, ">r1\nAC\n", ">r2\n10 20\n");

    Command::cargo_bin("fasta2fastq")
        .unwrap()
        .arg(&fasta)
        .arg(&qual)
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("r1")
                .and(predicate::str::contains("r2"))
                .and(predicate::str::contains("record 1")),
        );
}

#[test]
fn truncated_qual_names_the_stream() {
    let dir = tempfile::tempdir().unwrap();
    let (fasta, qual) = write_inputs(&dir, ">r1\nAC\n>r2\nGT\n", ">r1\n10 20\n");

    Command::cargo_bin("fasta2fastq")
        .unwrap()
        .arg(&fasta)
        .arg(&qual)
        .assert()
        .failure()
        .stderr(predicate::str::contains("QUAL").and(predicate::str::contains("record 2")));
}

#[test]
fn missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (fasta, _) = write_inputs(&dir, ">r1\nAC\n", "");

    Command::cargo_bin("fasta2fastq")
        .unwrap()
        .arg(&fasta)
        .arg(dir.path().join("nonexistent.qual"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not open QUAL file"));
}

#[test]
fn requires_both_positional_arguments() {
    Command::cargo_bin("fasta2fastq")
        .unwrap()
        .assert()
        .failure();
}
