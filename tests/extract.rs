//! Running `zst-extract` against stdout

use std::{
    fs,
    io::{BufRead, BufReader, Read},
    process::{Command, Stdio},
};

#[test]
fn stops_quietly_when_the_reader_goes_away() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("games.pgn.zst");
    let data = b"[Event \"Rated Blitz game\"]\n1. e4 e5 2. Nf3 Nc6 1-0\n\n".repeat(200_000);
    fs::write(&input, zstd::encode_all(&data[..], 3).unwrap()).unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_zst-extract"))
        .arg(&input)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // Behave like `head -1`: take one line, then close the pipe.
    let mut first = String::new();
    BufReader::new(child.stdout.take().unwrap())
        .read_line(&mut first)
        .unwrap();
    assert_eq!(first, "[Event \"Rated Blitz game\"]\n");

    let mut stderr = String::new();
    child
        .stderr
        .take()
        .unwrap()
        .read_to_string(&mut stderr)
        .unwrap();
    let status = child.wait().unwrap();

    assert!(status.success(), "exit {status}: {stderr}");
    assert!(stderr.is_empty(), "{stderr}");
}

#[test]
fn writes_everything_to_stdout() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("games.pgn.zst");
    let data = b"1. d4 d5 2. c4 e6 1/2-1/2\n".repeat(1000);
    fs::write(&input, zstd::encode_all(&data[..], 3).unwrap()).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_zst-extract"))
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stdout == data);
}
