mod common;

use anyhow::Result;
use assert_cmd::Command;
use hound::WavReader;
use predicates::prelude::*;
use tempfile::tempdir;

use common::write_tone;

fn emospeech() -> Command {
    Command::cargo_bin("emospeech").expect("binary is built")
}

#[test]
fn inspect_prints_split_size() -> Result<()> {
    let root = tempdir()?;
    emospeech()
        .args(["inspect", "--split", "validation", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("196 items"));
    Ok(())
}

#[test]
fn inspect_resolves_index_to_path() -> Result<()> {
    let root = tempdir()?;
    emospeech()
        .args(["inspect", "--index", "99", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("m2/dis-m2-b2.wav"))
        .stdout(predicate::str::contains("0 (disgusto)"));
    Ok(())
}

#[test]
fn negative_index_is_rejected() -> Result<()> {
    let root = tempdir()?;
    emospeech()
        .args(["inspect", "--index=-1", "--root"])
        .arg(root.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
    Ok(())
}

#[test]
fn extract_reports_json_summary() -> Result<()> {
    let root = tempdir()?;
    write_tone(&root.path().join("m1/dis-m1-b1.wav"), 440.0, 0.5, 1)?;
    let output = emospeech()
        .args([
            "extract",
            "--index",
            "0",
            "--json",
            "--mode",
            "both",
            "--sample-rate",
            "8000",
            "--audio-length",
            "1",
            "--n-fft",
            "256",
            "--hop-length",
            "128",
            "--n-mels",
            "32",
            "--root",
        ])
        .arg(root.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let summary: serde_json::Value = serde_json::from_slice(&output)?;
    assert_eq!(summary["label"], 0);
    assert_eq!(summary["emotion"], "disgusto");
    assert_eq!(summary["audio"]["shape"], serde_json::json!([1, 8000]));
    assert_eq!(summary["log_mel"]["shape"][1], 32);
    Ok(())
}

#[test]
fn scan_fails_when_files_are_missing() -> Result<()> {
    let root = tempdir()?;
    for name in ["03a01Wa.wav", "03a01Fa.wav"] {
        write_tone(&root.path().join(name), 250.0, 0.2, 1)?;
    }
    emospeech()
        .args(["scan", "--corpus", "emodb", "--split", "all", "--mode", "raw", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("scanned 2 items, 0 failed"));

    let empty = tempdir()?;
    emospeech()
        .args(["scan", "--split", "validation", "--mode", "raw", "--jobs", "2", "--root"])
        .arg(empty.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("196 failed"));
    Ok(())
}

#[test]
fn render_writes_fixed_length_wav() -> Result<()> {
    let root = tempdir()?;
    write_tone(&root.path().join("m1/dis-m1-b1.wav"), 440.0, 0.5, 2)?;
    let out = root.path().join("rendered.wav");
    emospeech()
        .args(["render", "--index", "0", "--mode", "raw", "--audio-length", "2", "--root"])
        .arg(root.path())
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let reader = WavReader::open(&out)?;
    assert_eq!(reader.spec().sample_rate, 16_000);
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.duration(), 32_000);
    Ok(())
}
